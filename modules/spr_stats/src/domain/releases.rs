use chrono::{DateTime, Utc};

use crate::contract::model::Release;
use crate::domain::error::DomainError;

/// Releases marked as the one currently in production.
pub fn current_releases(releases: &[Release]) -> Vec<Release> {
    releases.iter().filter(|r| r.current).cloned().collect()
}

/// Scheduled releases: dated after `now` and not yet current.
pub fn future_releases(releases: &[Release], now: DateTime<Utc>) -> Vec<Release> {
    releases
        .iter()
        .filter(|r| !r.current && r.date.is_some_and(|d| d > now))
        .cloned()
        .collect()
}

/// A release may only become current if its territory has no current release yet and its
/// date is not in the future. Non-current releases are always accepted.
pub fn validate_new_release(
    candidate: &Release,
    existing: &[Release],
    now: DateTime<Utc>,
) -> Result<(), DomainError> {
    if !candidate.current {
        return Ok(());
    }
    if existing
        .iter()
        .any(|r| r.current && r.territory == candidate.territory && r.id != candidate.id)
    {
        return Err(DomainError::production_release_exists(
            candidate.territory.clone(),
        ));
    }
    match candidate.date {
        Some(date) if date > now => Err(DomainError::production_is_future(date)),
        _ => Ok(()),
    }
}

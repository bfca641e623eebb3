use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::contract::model::{OwnershipShare, Release, Spr, User, UserShare, UserSummary, UserTally};
use crate::domain::error::DomainError;
use crate::domain::ports::TrackerSource;
use crate::domain::{filter, releases, roster, stats};

/// Domain service: fetches a fresh snapshot from the source on every call and derives
/// statistics from it. Depends only on the source port, not on infra types.
#[derive(Clone)]
pub struct Service {
    source: Arc<dyn TrackerSource>,
}

impl Service {
    pub fn new(source: Arc<dyn TrackerSource>) -> Self {
        Self { source }
    }

    // --- source access ---

    async fn records(&self) -> Result<Vec<Spr>, DomainError> {
        self.source
            .fetch_all_records()
            .await
            .map_err(|e| DomainError::source(format!("{e:#}")))
    }

    async fn users(&self) -> Result<Vec<User>, DomainError> {
        self.source
            .fetch_all_users()
            .await
            .map_err(|e| DomainError::source(format!("{e:#}")))
    }

    async fn releases(&self) -> Result<Vec<Release>, DomainError> {
        self.source
            .fetch_all_releases()
            .await
            .map_err(|e| DomainError::source(format!("{e:#}")))
    }

    /// Resolve `login` against the roster and load the records in one go.
    async fn user_and_records(&self, login: &str) -> Result<(User, Vec<Spr>), DomainError> {
        let (users, records) = tokio::try_join!(self.users(), self.records())?;
        let user = users
            .into_iter()
            .find(|u| !login.is_empty() && u.login == login)
            .ok_or_else(|| DomainError::user_not_found(login))?;
        Ok((user, records))
    }

    // --- users ---

    #[instrument(name = "spr_stats.service.list_users", skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let users = self.users().await?;
        let kept = roster::sanitize(&users);
        debug!("Roster has {} users, {} after sanitizing", users.len(), kept.len());
        Ok(kept)
    }

    // --- per-user statistics ---

    #[instrument(name = "spr_stats.service.open_sprs", skip(self))]
    pub async fn open_sprs(&self, login: &str) -> Result<Vec<Spr>, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        let open: Vec<Spr> = filter::open_records_of(&user, &records)
            .into_iter()
            .cloned()
            .collect();
        debug!("Found {} open records", open.len());
        Ok(open)
    }

    #[instrument(name = "spr_stats.service.reviewed_sprs", skip(self))]
    pub async fn reviewed_sprs(&self, login: &str) -> Result<Vec<Spr>, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        Ok(filter::reviewed_records_of(&user, &records)
            .into_iter()
            .cloned()
            .collect())
    }

    #[instrument(name = "spr_stats.service.count_open", skip(self))]
    pub async fn count_open(&self, login: &str) -> Result<usize, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        Ok(stats::count_open(&user, &records))
    }

    #[instrument(name = "spr_stats.service.count_reviewed", skip(self))]
    pub async fn count_reviewed(&self, login: &str) -> Result<usize, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        Ok(stats::count_reviewed(&user, &records))
    }

    #[instrument(name = "spr_stats.service.ownership", skip(self))]
    pub async fn ownership(&self, login: &str) -> Result<OwnershipShare, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        Ok(stats::percentage_owned(&user, &records))
    }

    #[instrument(name = "spr_stats.service.user_summary", skip(self))]
    pub async fn user_summary(&self, login: &str) -> Result<UserSummary, DomainError> {
        let (user, records) = self.user_and_records(login).await?;
        Ok(stats::user_summary(&user, &records))
    }

    // --- roster-wide statistics ---

    #[instrument(name = "spr_stats.service.all_open_sprs", skip(self))]
    pub async fn all_open_sprs(&self) -> Result<Vec<Spr>, DomainError> {
        let records = self.records().await?;
        let open: Vec<Spr> = filter::open_records(&records).into_iter().cloned().collect();
        debug!("{} of {} records are open", open.len(), records.len());
        Ok(open)
    }

    #[instrument(name = "spr_stats.service.all_reviewed_sprs", skip(self))]
    pub async fn all_reviewed_sprs(&self) -> Result<Vec<Spr>, DomainError> {
        let records = self.records().await?;
        Ok(filter::reviewed_records(&records)
            .into_iter()
            .cloned()
            .collect())
    }

    #[instrument(name = "spr_stats.service.open_counts", skip(self))]
    pub async fn open_counts(&self) -> Result<Vec<UserTally>, DomainError> {
        let (users, records) = tokio::try_join!(self.users(), self.records())?;
        Ok(stats::open_counts_by_user(&roster::sanitize(&users), &records))
    }

    #[instrument(name = "spr_stats.service.ownership_breakdown", skip(self))]
    pub async fn ownership_breakdown(&self) -> Result<Vec<UserShare>, DomainError> {
        let (users, records) = tokio::try_join!(self.users(), self.records())?;
        let breakdown = stats::ownership_breakdown(&users, &records);
        debug!(
            "Computed ownership for {} users over {} records",
            breakdown.len(),
            records.len()
        );
        Ok(breakdown)
    }

    #[instrument(name = "spr_stats.service.ownership_chart", skip(self))]
    pub async fn ownership_chart(&self) -> Result<Vec<UserSummary>, DomainError> {
        let (users, records) = tokio::try_join!(self.users(), self.records())?;
        Ok(stats::ownership_chart(&users, &records))
    }

    // --- releases ---

    #[instrument(name = "spr_stats.service.current_releases", skip(self))]
    pub async fn current_releases(&self) -> Result<Vec<Release>, DomainError> {
        Ok(releases::current_releases(&self.releases().await?))
    }

    #[instrument(name = "spr_stats.service.future_releases", skip(self))]
    pub async fn future_releases(&self) -> Result<Vec<Release>, DomainError> {
        Ok(releases::future_releases(&self.releases().await?, Utc::now()))
    }

    #[instrument(
        name = "spr_stats.service.validate_release",
        skip(self, release),
        fields(territory = %release.territory, current = release.current)
    )]
    pub async fn validate_release(&self, release: &Release) -> Result<(), DomainError> {
        let existing = self.releases().await?;
        releases::validate_new_release(release, &existing, Utc::now())?;
        info!("Release accepted");
        Ok(())
    }
}

use std::collections::HashMap;

use crate::contract::model::{OwnershipShare, Spr, User, UserShare, UserSummary, UserTally};
use crate::domain::filter::{open_records_of, records_owned_by, reviewed_records_of};
use crate::domain::roster::sanitize;

/// Number of open records owned by `user`.
pub fn count_open(user: &User, records: &[Spr]) -> usize {
    open_records_of(user, records).len()
}

/// Number of reviewed records owned by `user`.
pub fn count_reviewed(user: &User, records: &[Spr]) -> usize {
    reviewed_records_of(user, records).len()
}

/// Share of `records` owned by `user`.
///
/// `total` counts every record, unassigned ones included, so shares of all roster users
/// may add up to less than 100.
pub fn percentage_owned(user: &User, records: &[Spr]) -> OwnershipShare {
    let total = records.len();
    let owned_by_user = records_owned_by(user, records).len();
    OwnershipShare {
        total,
        owned_by_user,
        percentage: rounded_percentage(owned_by_user, total),
    }
}

/// `round(100 * part / whole)` with halves rounded up; 0 for an empty whole.
fn rounded_percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let (part, whole) = (part as u128, whole as u128);
    let pct = (200 * part + whole) / (2 * whole);
    u32::try_from(pct).unwrap_or(u32::MAX)
}

/// Open-record count for every user of `users`, in roster order.
///
/// Users owning nothing get 0; records whose owner is not on the roster are ignored.
pub fn open_counts_by_user(users: &[User], records: &[Spr]) -> Vec<UserTally> {
    let mut open_by_login: HashMap<&str, usize> = HashMap::new();
    for login in records
        .iter()
        .filter(|r| r.resolution.is_some_and(|res| res.is_open()))
        .filter_map(Spr::owner_login)
    {
        *open_by_login.entry(login).or_default() += 1;
    }

    users
        .iter()
        .map(|u| UserTally {
            login: u.login.clone(),
            open: open_by_login.get(u.login.as_str()).copied().unwrap_or(0),
        })
        .collect()
}

/// [`percentage_owned`] for every account left after [`sanitize`].
pub fn ownership_breakdown(users: &[User], records: &[Spr]) -> Vec<UserShare> {
    sanitize(users)
        .into_iter()
        .map(|u| UserShare {
            login: u.login.clone(),
            share: percentage_owned(&u, records),
        })
        .collect()
}

/// Open and reviewed counts plus ownership share of `user`.
pub fn user_summary(user: &User, records: &[Spr]) -> UserSummary {
    UserSummary {
        login: user.login.clone(),
        name: user.display_name(),
        open: count_open(user, records),
        reviewed: count_reviewed(user, records),
        share: percentage_owned(user, records),
    }
}

/// [`user_summary`] for every account left after [`sanitize`], in roster order.
pub fn ownership_chart(users: &[User], records: &[Spr]) -> Vec<UserSummary> {
    sanitize(users)
        .iter()
        .map(|u| user_summary(u, records))
        .collect()
}

//! Record selection by owner and resolution state.
//!
//! All functions keep input order, never fail and skip records whose owner does not
//! resolve to a login.

use crate::contract::model::{Spr, User};

/// Open records (`NEW`, `PARTIALLY_FIXED`, `DUPLICATE`) owned by `user`.
pub fn open_records_of<'a>(user: &User, records: &'a [Spr]) -> Vec<&'a Spr> {
    records
        .iter()
        .filter(|r| r.is_owned_by(&user.login))
        .filter(|r| r.resolution.is_some_and(|res| res.is_open()))
        .collect()
}

/// Records owned by `user` whose resolution is `REVIEWED`.
pub fn reviewed_records_of<'a>(user: &User, records: &'a [Spr]) -> Vec<&'a Spr> {
    records
        .iter()
        .filter(|r| r.is_owned_by(&user.login))
        .filter(|r| r.resolution.is_some_and(|res| res.is_reviewed()))
        .collect()
}

/// Every record owned by `user`, whatever its resolution.
pub fn records_owned_by<'a>(user: &User, records: &'a [Spr]) -> Vec<&'a Spr> {
    records
        .iter()
        .filter(|r| r.is_owned_by(&user.login))
        .collect()
}

/// Open records of any owner, including unassigned ones.
pub fn open_records(records: &[Spr]) -> Vec<&Spr> {
    records
        .iter()
        .filter(|r| r.resolution.is_some_and(|res| res.is_open()))
        .collect()
}

/// Reviewed records of any owner.
pub fn reviewed_records(records: &[Spr]) -> Vec<&Spr> {
    records
        .iter()
        .filter(|r| r.resolution.is_some_and(|res| res.is_reviewed()))
        .collect()
}

use async_trait::async_trait;

use crate::contract::model::{Release, Spr, User};

/// Port for the domain layer: read-only snapshots of the tracker's data store.
/// Every call returns the full current list; nothing is cached behind it.
#[async_trait]
pub trait TrackerSource: Send + Sync {
    async fn fetch_all_records(&self) -> anyhow::Result<Vec<Spr>>;
    async fn fetch_all_users(&self) -> anyhow::Result<Vec<User>>;
    async fn fetch_all_releases(&self) -> anyhow::Result<Vec<Release>>;
}

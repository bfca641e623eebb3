use async_trait::async_trait;

use crate::contract::{
    error::SprStatsError,
    model::{OwnershipShare, Release, Spr, User, UserShare, UserSummary, UserTally},
};

/// Public API trait for the spr_stats module that other modules can use
#[async_trait]
pub trait SprStatsApi: Send + Sync {
    /// Roster without system/seed accounts
    async fn list_users(&self) -> Result<Vec<User>, SprStatsError>;

    /// Open records owned by `login`
    async fn open_sprs(&self, login: &str) -> Result<Vec<Spr>, SprStatsError>;

    /// Reviewed records owned by `login`
    async fn reviewed_sprs(&self, login: &str) -> Result<Vec<Spr>, SprStatsError>;

    /// Share of all records owned by `login`
    async fn ownership(&self, login: &str) -> Result<OwnershipShare, SprStatsError>;

    /// Open/reviewed counts and share for one user
    async fn user_summary(&self, login: &str) -> Result<UserSummary, SprStatsError>;

    /// Open counts for every roster user
    async fn open_counts(&self) -> Result<Vec<UserTally>, SprStatsError>;

    /// Ownership share for every roster user
    async fn ownership_breakdown(&self) -> Result<Vec<UserShare>, SprStatsError>;

    /// Open records of every owner
    async fn all_open_sprs(&self) -> Result<Vec<Spr>, SprStatsError>;

    /// Reviewed records of every owner
    async fn all_reviewed_sprs(&self) -> Result<Vec<Spr>, SprStatsError>;

    /// Open/reviewed counts and share for every roster user
    async fn ownership_chart(&self) -> Result<Vec<UserSummary>, SprStatsError>;

    async fn current_releases(&self) -> Result<Vec<Release>, SprStatsError>;

    async fn future_releases(&self) -> Result<Vec<Release>, SprStatsError>;

    /// Check that `release` may be added next to the releases already known
    async fn validate_release(&self, release: Release) -> Result<(), SprStatsError>;
}

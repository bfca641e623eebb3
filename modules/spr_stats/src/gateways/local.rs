use async_trait::async_trait;
use std::sync::Arc;

use crate::contract::{
    client::SprStatsApi,
    error::SprStatsError,
    model::{OwnershipShare, Release, Spr, User, UserShare, UserSummary, UserTally},
};
use crate::domain::service::Service;

/// Local implementation of the SprStatsApi trait that delegates to the domain service
pub struct SprStatsLocalClient {
    service: Arc<Service>,
}

impl SprStatsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl SprStatsApi for SprStatsLocalClient {
    async fn list_users(&self) -> Result<Vec<User>, SprStatsError> {
        self.service.list_users().await.map_err(Into::into)
    }

    async fn open_sprs(&self, login: &str) -> Result<Vec<Spr>, SprStatsError> {
        self.service.open_sprs(login).await.map_err(Into::into)
    }

    async fn reviewed_sprs(&self, login: &str) -> Result<Vec<Spr>, SprStatsError> {
        self.service.reviewed_sprs(login).await.map_err(Into::into)
    }

    async fn ownership(&self, login: &str) -> Result<OwnershipShare, SprStatsError> {
        self.service.ownership(login).await.map_err(Into::into)
    }

    async fn user_summary(&self, login: &str) -> Result<UserSummary, SprStatsError> {
        self.service.user_summary(login).await.map_err(Into::into)
    }

    async fn open_counts(&self) -> Result<Vec<UserTally>, SprStatsError> {
        self.service.open_counts().await.map_err(Into::into)
    }

    async fn ownership_breakdown(&self) -> Result<Vec<UserShare>, SprStatsError> {
        self.service.ownership_breakdown().await.map_err(Into::into)
    }

    async fn all_open_sprs(&self) -> Result<Vec<Spr>, SprStatsError> {
        self.service.all_open_sprs().await.map_err(Into::into)
    }

    async fn all_reviewed_sprs(&self) -> Result<Vec<Spr>, SprStatsError> {
        self.service.all_reviewed_sprs().await.map_err(Into::into)
    }

    async fn ownership_chart(&self) -> Result<Vec<UserSummary>, SprStatsError> {
        self.service.ownership_chart().await.map_err(Into::into)
    }

    async fn current_releases(&self) -> Result<Vec<Release>, SprStatsError> {
        self.service.current_releases().await.map_err(Into::into)
    }

    async fn future_releases(&self) -> Result<Vec<Release>, SprStatsError> {
        self.service.future_releases().await.map_err(Into::into)
    }

    async fn validate_release(&self, release: Release) -> Result<(), SprStatsError> {
        self.service
            .validate_release(&release)
            .await
            .map_err(Into::into)
    }
}

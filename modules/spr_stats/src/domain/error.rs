use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::contract::model::Territory;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {login}")]
    UserNotFound { login: String },

    #[error("A current release already exists for territory {territory}")]
    ProductionReleaseExists { territory: Territory },

    #[error("A current release cannot be dated in the future: {date}")]
    ProductionIsFuture { date: DateTime<Utc> },

    #[error("Tracker source error: {message}")]
    Source { message: String },
}

impl DomainError {
    pub fn user_not_found(login: impl Into<String>) -> Self {
        Self::UserNotFound {
            login: login.into(),
        }
    }

    pub fn production_release_exists(territory: Territory) -> Self {
        Self::ProductionReleaseExists { territory }
    }

    pub fn production_is_future(date: DateTime<Utc>) -> Self {
        Self::ProductionIsFuture { date }
    }

    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SprStatsError {
    #[error("User not found: {login}")]
    NotFound { login: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Tracker source unavailable")]
    Unavailable,
}

impl SprStatsError {
    pub fn not_found(login: impl Into<String>) -> Self {
        Self::NotFound {
            login: login.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::Unavailable
    }
}

impl From<crate::domain::error::DomainError> for SprStatsError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            UserNotFound { login } => Self::not_found(login),
            ProductionReleaseExists { territory } => Self::conflict(format!(
                "a current release already exists for territory {territory}"
            )),
            ProductionIsFuture { date } => {
                Self::validation(format!("a current release cannot be dated in the future: {date}"))
            }
            Source { .. } => Self::unavailable(),
        }
    }
}

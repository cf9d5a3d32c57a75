use thiserror::Error;

use crate::domain::DomainError;
use crate::ports::{ConfigError, RepositoryError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Validation(#[from] DomainError),

    #[error("Application error: {0}")]
    Application(String),

    #[error("API URL not configured")]
    ApiUrlNotConfigured,
}

impl AppError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::Repository(RepositoryError::NotFound(_)))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;

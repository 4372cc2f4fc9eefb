//! Configuration errors

use relay_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or converting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

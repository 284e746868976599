//! Command implementations.

pub mod login;
pub mod restaurant;
pub mod search;
pub mod user;

use std::path::PathBuf;

use forkful_client::{ApiError, ConfigError, CredentialError};
use thiserror::Error;

/// Errors that end a command with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Already shown to the user as a notification.
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid draft file {path}: {source}")]
    Draft {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CliError {
    /// Whether the error was already reported through a notification.
    pub const fn already_reported(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

//! Errors surfaced by backend operations.

use forkful_core::ValidationError;
use thiserror::Error;

use crate::auth::CredentialError;

/// Errors that can occur when running a backend operation.
///
/// None of these are fatal: each one becomes a transient notification and
/// the operation can be retried by triggering it again.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Token acquisition failed; passed through from the provider.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Transport failure or any non-2xx status. The backend's error body is
    /// deliberately not surfaced.
    #[error("Failed to {operation}")]
    RequestFailed {
        /// Operation name, e.g. `update restaurant`.
        operation: &'static str,
    },

    /// The form was rejected before any request was attempted.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ApiError {
    /// A uniform request failure for `operation`.
    #[must_use]
    pub const fn request_failed(operation: &'static str) -> Self {
        Self::RequestFailed { operation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_display() {
        let err = ApiError::request_failed("update restaurant");
        assert_eq!(err.to_string(), "Failed to update restaurant");
    }

    #[test]
    fn test_credential_error_is_transparent() {
        let err = ApiError::from(CredentialError::Missing);
        assert_eq!(err.to_string(), CredentialError::Missing.to_string());
    }
}

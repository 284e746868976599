//! Credential acquisition.
//!
//! Every backend request borrows a bearer token from a [`CredentialProvider`]
//! for the duration of that one request. Providers own the token lifecycle
//! (refresh, expiry); the rest of the client never mutates credentials.
//!
//! # Providers
//!
//! - [`StaticCredentials`] - a fixed token, e.g. from `FORKFUL_ACCESS_TOKEN`
//! - [`Auth0Credentials`] - refresh-token grant with an in-memory token cache
//!
//! # Login
//!
//! [`pkce`] builds the authorization URL for the code flow, and
//! [`exchange_code`] trades the returned code for tokens.

mod auth0;
pub mod pkce;

pub use auth0::{Auth0Credentials, TokenSet, UserInfo, exchange_code, fetch_user_info};

use std::future::Future;

use secrecy::SecretString;
use thiserror::Error;

use crate::config::ClientConfig;

/// Errors raised while acquiring a credential.
///
/// Propagated unchanged through every operation.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// No token or refresh token is configured.
    #[error("No credential available - login required")]
    Missing,

    /// The identity provider rejected the grant.
    #[error("Token request rejected: {0}")]
    Rejected(String),

    /// The identity provider could not be reached.
    #[error("Identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The identity provider answered with something unexpected.
    #[error("Identity provider response error: {0}")]
    Response(String),
}

/// Supplies short-lived bearer tokens on demand.
pub trait CredentialProvider: Send + Sync {
    /// Get a token valid for at least one request.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] if no token can be produced.
    fn access_token(&self) -> impl Future<Output = Result<SecretString, CredentialError>> + Send;
}

/// A fixed bearer token.
#[derive(Clone)]
pub struct StaticCredentials {
    token: SecretString,
}

impl StaticCredentials {
    /// Wrap an existing token.
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl CredentialProvider for StaticCredentials {
    async fn access_token(&self) -> Result<SecretString, CredentialError> {
        Ok(self.token.clone())
    }
}

/// The provider selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredCredentials {
    /// `FORKFUL_ACCESS_TOKEN` is set.
    Static(StaticCredentials),
    /// Tokens come from Auth0.
    Auth0(Auth0Credentials),
}

impl ConfiguredCredentials {
    /// Pick a provider: a fixed token wins over the Auth0 refresh flow.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Response` if the Auth0 domain is not a URL.
    pub fn from_config(config: &ClientConfig) -> Result<Self, CredentialError> {
        if let Some(token) = &config.auth0.access_token {
            return Ok(Self::Static(StaticCredentials::new(token.clone())));
        }
        Auth0Credentials::new(config).map(Self::Auth0)
    }
}

impl CredentialProvider for ConfiguredCredentials {
    async fn access_token(&self) -> Result<SecretString, CredentialError> {
        match self {
            Self::Static(provider) => provider.access_token().await,
            Self::Auth0(provider) => provider.access_token().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[tokio::test]
    async fn test_static_credentials_returns_token() {
        let provider = StaticCredentials::new(SecretString::from("tok-123"));
        let token = provider.access_token().await.expect("token");
        assert_eq!(token.expose_secret(), "tok-123");
    }

    #[test]
    fn test_static_credentials_debug_redacts() {
        let provider = StaticCredentials::new(SecretString::from("tok-123"));
        let debug_output = format!("{provider:?}");
        assert!(!debug_output.contains("tok-123"));
    }

    #[test]
    fn test_credential_error_display() {
        assert_eq!(
            CredentialError::Missing.to_string(),
            "No credential available - login required"
        );
        assert_eq!(
            CredentialError::Rejected("invalid_grant".to_string()).to_string(),
            "Token request rejected: invalid_grant"
        );
    }
}

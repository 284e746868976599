//! Client configuration loaded from environment variables.
//!
//! Read once at startup. A missing required variable is fatal.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FORKFUL_API_BASE_URL` - Base URL of the restaurant backend
//! - `AUTH0_DOMAIN` - Auth0 tenant domain (e.g., forkful.eu.auth0.com)
//! - `AUTH0_CLIENT_ID` - Auth0 application client ID
//! - `AUTH0_CALLBACK_URL` - Redirect URI registered for the application
//! - `AUTH0_AUDIENCE` - API audience the access tokens are issued for
//!
//! ## Optional
//! - `FORKFUL_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `AUTH0_REFRESH_TOKEN` - Refresh token used to mint access tokens
//! - `FORKFUL_ACCESS_TOKEN` - Fixed access token (takes precedence over the refresh token)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: &str = "30";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL every API path is resolved against
    pub api_base_url: Url,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Identity provider configuration
    pub auth0: Auth0Config,
}

/// Auth0 configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct Auth0Config {
    /// Tenant domain, e.g. `forkful.eu.auth0.com`
    pub domain: String,
    /// Application client ID
    pub client_id: String,
    /// Redirect URI for the authorization code flow
    pub callback_url: Url,
    /// API audience
    pub audience: String,
    /// Long-lived refresh token
    pub refresh_token: Option<SecretString>,
    /// Fixed access token
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for Auth0Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0Config")
            .field("domain", &self.domain)
            .field("client_id", &self.client_id)
            .field("callback_url", &self.callback_url.as_str())
            .field("audience", &self.audience)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Auth0Config {
    /// Base URL of the tenant, e.g. `https://forkful.eu.auth0.com/`.
    ///
    /// A bare domain gets the `https` scheme; an explicit scheme is kept.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the domain does not form a URL.
    pub fn issuer(&self) -> Result<Url, ConfigError> {
        let domain = self.domain.trim_end_matches('/');
        let base = if domain.starts_with("https://") || domain.starts_with("http://") {
            format!("{domain}/")
        } else {
            format!("https://{domain}/")
        };
        Url::parse(&base)
            .map_err(|e| ConfigError::InvalidEnvVar("AUTH0_DOMAIN".to_string(), e.to_string()))
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_base_url = env.url("FORKFUL_API_BASE_URL")?;
        let http_timeout = env
            .or_default("FORKFUL_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("FORKFUL_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let auth0 = Auth0Config {
            domain: env.required("AUTH0_DOMAIN")?,
            client_id: env.required("AUTH0_CLIENT_ID")?,
            callback_url: env.url("AUTH0_CALLBACK_URL")?,
            audience: env.required("AUTH0_AUDIENCE")?,
            refresh_token: env.optional("AUTH0_REFRESH_TOKEN").map(SecretString::from),
            access_token: env.optional("FORKFUL_ACCESS_TOKEN").map(SecretString::from),
        };

        Ok(Self {
            api_base_url,
            http_timeout,
            auth0,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required absolute http(s) URL.
    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        let raw = self.required(key)?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }
}

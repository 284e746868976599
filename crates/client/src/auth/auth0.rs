//! Auth0 token and identity endpoints.
//!
//! Access tokens are minted from a refresh token and cached in memory until
//! they are within a minute of expiry.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{CredentialError, CredentialProvider};
use crate::config::{Auth0Config, ClientConfig};

/// Seconds before expiry at which a cached token is no longer handed out.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Tokens obtained from the Auth0 token endpoint.
#[derive(Debug, Clone)]
pub struct TokenSet {
    /// Bearer token for API requests.
    pub access_token: SecretString,
    /// Refresh token, when `offline_access` was granted.
    pub refresh_token: Option<SecretString>,
    /// Unix timestamp when the access token expires.
    pub expires_at: i64,
}

impl TokenSet {
    /// Check if the access token has expired (or is about to).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() >= self.expires_at - EXPIRY_BUFFER_SECS
    }
}

/// Profile claims returned by the `/userinfo` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserInfo {
    /// Subject identifier, e.g. `auth0|64f0...`.
    pub sub: Option<String>,
    /// Email address, when the `email` scope was granted.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
enum TokenRequest<'a> {
    RefreshToken {
        client_id: &'a str,
        refresh_token: &'a str,
    },
    AuthorizationCode {
        client_id: &'a str,
        code: &'a str,
        code_verifier: &'a str,
        redirect_uri: &'a str,
    },
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    /// Token lifetime in seconds.
    expires_in: i64,
}

#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Credential provider backed by the Auth0 refresh-token grant.
#[derive(Clone)]
pub struct Auth0Credentials {
    inner: Arc<Auth0CredentialsInner>,
}

struct Auth0CredentialsInner {
    client: reqwest::Client,
    issuer: Url,
    client_id: String,
    refresh_token: RwLock<Option<SecretString>>,
    /// In-memory token cache
    token: RwLock<Option<TokenSet>>,
}

impl std::fmt::Debug for Auth0Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth0Credentials")
            .field("issuer", &self.inner.issuer.as_str())
            .field("client_id", &self.inner.client_id)
            .finish_non_exhaustive()
    }
}

impl Auth0Credentials {
    /// Create a provider from configuration, seeded with the configured
    /// refresh token (if any).
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Response` if the domain is not a valid URL,
    /// or `CredentialError::Transport` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, CredentialError> {
        let issuer = config
            .auth0
            .issuer()
            .map_err(|e| CredentialError::Response(e.to_string()))?;
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(Auth0CredentialsInner {
                client,
                issuer,
                client_id: config.auth0.client_id.clone(),
                refresh_token: RwLock::new(config.auth0.refresh_token.clone()),
                token: RwLock::new(None),
            }),
        })
    }

    /// Seed the cache with tokens from a completed login.
    pub async fn set_tokens(&self, tokens: TokenSet) {
        if let Some(refresh) = &tokens.refresh_token {
            *self.inner.refresh_token.write().await = Some(refresh.clone());
        }
        *self.inner.token.write().await = Some(tokens);
    }

    /// Mint a new access token from the stored refresh token.
    ///
    /// # Errors
    ///
    /// Returns `CredentialError::Missing` without a refresh token, or
    /// `CredentialError::Rejected` if Auth0 refuses the grant.
    #[instrument(skip(self), fields(issuer = %self.inner.issuer))]
    pub async fn refresh(&self) -> Result<SecretString, CredentialError> {
        let refresh_token = self
            .inner
            .refresh_token
            .read()
            .await
            .clone()
            .ok_or(CredentialError::Missing)?;

        let tokens = request_tokens(
            &self.inner.client,
            &self.inner.issuer,
            &TokenRequest::RefreshToken {
                client_id: &self.inner.client_id,
                refresh_token: refresh_token.expose_secret(),
            },
        )
        .await?;

        debug!(expires_at = tokens.expires_at, "Access token refreshed");
        let access_token = tokens.access_token.clone();
        self.set_tokens(tokens).await;
        Ok(access_token)
    }

    /// Resolve the signed-in identity from the `/userinfo` endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`CredentialError`] if no token is available or the endpoint
    /// rejects it.
    pub async fn user_info(&self) -> Result<UserInfo, CredentialError> {
        let token = self.access_token().await?;
        fetch_user_info(&self.inner.client, &self.inner.issuer, &token).await
    }
}

impl CredentialProvider for Auth0Credentials {
    async fn access_token(&self) -> Result<SecretString, CredentialError> {
        if let Some(token) = self.inner.token.read().await.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.clone());
        }

        self.refresh().await
    }
}

/// Exchange an authorization code (with its PKCE verifier) for tokens.
///
/// # Errors
///
/// Returns `CredentialError::Rejected` if Auth0 refuses the code.
#[instrument(skip(client, code, code_verifier), fields(domain = %config.domain))]
pub async fn exchange_code(
    client: &reqwest::Client,
    config: &Auth0Config,
    code: &str,
    code_verifier: &SecretString,
) -> Result<TokenSet, CredentialError> {
    let issuer = config
        .issuer()
        .map_err(|e| CredentialError::Response(e.to_string()))?;

    request_tokens(
        client,
        &issuer,
        &TokenRequest::AuthorizationCode {
            client_id: &config.client_id,
            code,
            code_verifier: code_verifier.expose_secret(),
            redirect_uri: config.callback_url.as_str(),
        },
    )
    .await
}

/// Resolve the identity behind `token` from the tenant's `/userinfo`
/// endpoint.
///
/// # Errors
///
/// Returns `CredentialError::Rejected` if the endpoint refuses the token.
#[instrument(skip(client, token), fields(issuer = %issuer))]
pub async fn fetch_user_info(
    client: &reqwest::Client,
    issuer: &Url,
    token: &SecretString,
) -> Result<UserInfo, CredentialError> {
    let url = join(issuer, "userinfo")?;

    let response = client
        .get(url)
        .bearer_auth(token.expose_secret())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        warn!(%status, "userinfo request rejected");
        return Err(CredentialError::Rejected(format!("userinfo returned {status}")));
    }

    response
        .json()
        .await
        .map_err(|e| CredentialError::Response(e.to_string()))
}

async fn request_tokens(
    client: &reqwest::Client,
    issuer: &Url,
    request: &TokenRequest<'_>,
) -> Result<TokenSet, CredentialError> {
    let now = chrono::Utc::now().timestamp();
    let url = join(issuer, "oauth/token")?;

    let response = client.post(url).json(request).send().await?;
    let status = response.status();

    if status.is_success() {
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| CredentialError::Response(e.to_string()))?;

        return Ok(TokenSet {
            access_token: SecretString::from(body.access_token),
            refresh_token: body.refresh_token.map(SecretString::from),
            expires_at: now + body.expires_in,
        });
    }

    let error = response
        .json::<TokenErrorResponse>()
        .await
        .ok()
        .and_then(|e| e.error_description.or(e.error))
        .unwrap_or_else(|| format!("HTTP {status}"));

    Err(CredentialError::Rejected(error))
}

fn join(issuer: &Url, path: &str) -> Result<Url, CredentialError> {
    issuer
        .join(path)
        .map_err(|e| CredentialError::Response(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_set_expiry_buffer() {
        let now = chrono::Utc::now().timestamp();

        let valid = TokenSet {
            access_token: SecretString::from("a"),
            refresh_token: None,
            expires_at: now + 3600,
        };
        assert!(!valid.is_expired());

        let almost = TokenSet {
            access_token: SecretString::from("a"),
            refresh_token: None,
            expires_at: now + 30,
        };
        assert!(almost.is_expired());
    }

    #[test]
    fn test_token_request_shapes() {
        let refresh = serde_json::to_value(TokenRequest::RefreshToken {
            client_id: "cid",
            refresh_token: "rt",
        })
        .expect("serialize");
        assert_eq!(
            refresh,
            serde_json::json!({"grant_type": "refresh_token", "client_id": "cid", "refresh_token": "rt"})
        );

        let code = serde_json::to_value(TokenRequest::AuthorizationCode {
            client_id: "cid",
            code: "abc",
            code_verifier: "ver",
            redirect_uri: "http://localhost:5173/auth-callback",
        })
        .expect("serialize");
        assert_eq!(code["grant_type"], "authorization_code");
        assert_eq!(code["code_verifier"], "ver");
    }

    #[test]
    fn test_user_info_tolerates_missing_email() {
        let info: UserInfo =
            serde_json::from_str(r#"{"sub": "auth0|abc"}"#).expect("deserialize");
        assert_eq!(info.sub.as_deref(), Some("auth0|abc"));
        assert!(info.email.is_none());
    }
}

//! Authorization code flow with PKCE (RFC 7636).
//!
//! The login URL sends the user to Auth0; Auth0 redirects back to the
//! configured callback URL with a `code` that [`super::exchange_code`] trades
//! for tokens using the verifier generated here.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use url::Url;

use crate::config::{Auth0Config, ConfigError};

/// Scopes requested at login; `offline_access` yields a refresh token.
const LOGIN_SCOPES: &str = "openid profile email offline_access";

/// A PKCE verifier and its S256 challenge.
pub struct Pkce {
    verifier: SecretString,
    challenge: String,
}

impl Pkce {
    /// Generate a fresh verifier from 32 random bytes.
    #[must_use]
    pub fn generate() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self::from_verifier(SecretString::from(URL_SAFE_NO_PAD.encode(bytes)))
    }

    /// Rebuild the pair from a known verifier.
    #[must_use]
    pub fn from_verifier(verifier: SecretString) -> Self {
        let digest = Sha256::digest(verifier.expose_secret().as_bytes());
        let challenge = URL_SAFE_NO_PAD.encode(digest);
        Self {
            verifier,
            challenge,
        }
    }

    /// The secret verifier, sent with the code exchange.
    #[must_use]
    pub const fn verifier(&self) -> &SecretString {
        &self.verifier
    }

    /// The public challenge, sent with the authorization request.
    #[must_use]
    pub fn challenge(&self) -> &str {
        &self.challenge
    }
}

/// An opaque value to correlate the callback with this login attempt.
#[must_use]
pub fn random_state() -> String {
    let bytes: [u8; 16] = rand::random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Build the Auth0 `/authorize` URL for the code flow.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` if the domain does not form a URL.
pub fn authorize_url(config: &Auth0Config, pkce: &Pkce, state: &str) -> Result<Url, ConfigError> {
    let mut url = config
        .issuer()?
        .join("authorize")
        .map_err(|e| ConfigError::InvalidEnvVar("AUTH0_DOMAIN".to_string(), e.to_string()))?;

    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", config.callback_url.as_str())
        .append_pair("audience", &config.audience)
        .append_pair("scope", LOGIN_SCOPES)
        .append_pair("code_challenge", pkce.challenge())
        .append_pair("code_challenge_method", "S256")
        .append_pair("state", state);

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> Auth0Config {
        Auth0Config {
            domain: "forkful.eu.auth0.com".to_string(),
            client_id: "client-abc".to_string(),
            callback_url: Url::parse("http://localhost:5173/auth-callback").unwrap(),
            audience: "forkful-api".to_string(),
            refresh_token: None,
            access_token: None,
        }
    }

    #[test]
    fn test_challenge_matches_rfc_example() {
        // RFC 7636 appendix B
        let pkce = Pkce::from_verifier(SecretString::from(
            "dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk",
        ));
        assert_eq!(
            pkce.challenge(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM"
        );
    }

    #[test]
    fn test_generated_verifier_length() {
        let pkce = Pkce::generate();
        // 32 bytes -> 43 base64url characters
        assert_eq!(pkce.verifier().expose_secret().len(), 43);
        assert_ne!(
            Pkce::generate().challenge(),
            pkce.challenge(),
            "verifiers must be random"
        );
    }

    #[test]
    fn test_authorize_url_parameters() {
        let pkce = Pkce::generate();
        let url = authorize_url(&config(), &pkce, "xyz").unwrap();

        assert_eq!(url.host_str(), Some("forkful.eu.auth0.com"));
        assert_eq!(url.path(), "/authorize");

        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();
        assert_eq!(params["client_id"], "client-abc");
        assert_eq!(params["redirect_uri"], "http://localhost:5173/auth-callback");
        assert_eq!(params["audience"], "forkful-api");
        assert_eq!(params["code_challenge"], pkce.challenge());
        assert_eq!(params["code_challenge_method"], "S256");
        assert_eq!(params["state"], "xyz");
        assert!(params["scope"].contains("offline_access"));
    }
}

//! Sign-in and first-login provisioning.
//!
//! ```bash
//! # Print the authorization URL and the PKCE verifier to use with it
//! forkful login
//!
//! # Trade the code from the callback URL for tokens, then provision
//! forkful login --code <CODE> --verifier <VERIFIER>
//!
//! # Provision with the configured tokens
//! forkful callback
//! ```

use std::sync::Arc;

use forkful_client::auth::pkce::{self, Pkce};
use forkful_client::auth::{Auth0Credentials, exchange_code, fetch_user_info};
use forkful_client::{ClientConfig, ConfiguredCredentials, CredentialProvider, Identity, ProvisioningGuard};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info};

use super::CliError;
use crate::render::{self, Format};
use crate::session::Session;

/// Start a login: print the URL to open and the verifier to keep.
///
/// # Errors
///
/// Returns `CliError::Config` if the Auth0 domain does not form a URL.
pub fn start(config: &ClientConfig) -> Result<(), CliError> {
    let pkce = Pkce::generate();
    let state = pkce::random_state();
    let url = pkce::authorize_url(&config.auth0, &pkce, &state)?;

    render::line(format_args!("Open this URL to sign in:\n\n  {url}\n"));
    render::line(format_args!(
        "Then run:\n\n  forkful login --code <CODE> --verifier {}",
        pkce.verifier().expose_secret()
    ));
    Ok(())
}

/// Finish a login: exchange the code, then provision and navigate home.
///
/// # Errors
///
/// Returns `CliError::Credential` if Auth0 rejects the code.
pub async fn finish(
    config: ClientConfig,
    code: &str,
    verifier: String,
    format: Format,
) -> Result<(), CliError> {
    let http = http_client(&config)?;
    let tokens = exchange_code(&http, &config.auth0, code, &SecretString::from(verifier)).await?;
    info!("Signed in");

    if let Some(refresh) = &tokens.refresh_token {
        render::line(format_args!(
            "export AUTH0_REFRESH_TOKEN={}",
            refresh.expose_secret()
        ));
    }

    let credentials = Auth0Credentials::new(&config)?;
    credentials.set_tokens(tokens).await;

    let session =
        Session::with_credentials(config, ConfiguredCredentials::Auth0(credentials), format)?;
    callback(&session).await
}

/// Resolve the signed-in identity and run first-login provisioning.
///
/// Provisioning failures are silent; navigation home always happens.
///
/// # Errors
///
/// Returns `CliError::Credential` if the identity cannot be resolved.
pub async fn callback(session: &Session) -> Result<(), CliError> {
    let token = session.executor.credentials().access_token().await?;
    let issuer = session.config.auth0.issuer()?;
    let info = fetch_user_info(&http_client(&session.config)?, &issuer, &token).await?;

    let guard = ProvisioningGuard::new(Arc::clone(&session.users));
    if let Some(handle) = guard.on_identity_resolved(&Identity::from(info)) {
        // Keep the process alive until the create call settles.
        if let Err(e) = handle.await? {
            debug!(error = %e, "Provisioning did not complete");
        }
    }
    Ok(())
}

fn http_client(config: &ClientConfig) -> Result<reqwest::Client, CliError> {
    Ok(reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()?)
}

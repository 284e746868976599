//! First-login provisioning.
//!
//! After the login callback the identity provider reports the signed-in
//! identity, possibly several times before it settles. [`ProvisioningGuard`]
//! creates the backend user record on the first report that carries both a
//! subject id and an email, and never again for the lifetime of the guard.
//! Navigation to the landing view happens on every report regardless.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use forkful_core::{CreateUserRequest, Email, SubjectId};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::{CredentialProvider, UserInfo};
use crate::effects::{Effects, View};
use crate::error::ApiError;
use crate::hooks::MyUserApi;

/// An identity as reported by the identity provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub sub: Option<String>,
    pub email: Option<String>,
}

impl From<UserInfo> for Identity {
    fn from(info: UserInfo) -> Self {
        Self {
            sub: info.sub,
            email: info.email,
        }
    }
}

impl Identity {
    /// The create-user request, once both fields are present and the email
    /// parses.
    ///
    /// An email the provider reports but [`Email::parse`] rejects is not sent
    /// to the backend. The report is treated like one without an email, so the
    /// latch stays armed for a later, usable report.
    fn create_request(&self) -> Option<CreateUserRequest> {
        let sub = self.sub.as_deref().filter(|s| !s.trim().is_empty())?;
        let email = self.email.as_deref()?;
        match Email::parse(email) {
            Ok(email) => Some(CreateUserRequest {
                auth0_id: SubjectId::new(sub),
                email,
            }),
            Err(e) => {
                warn!(error = %e, "Identity email is not usable; skipping provisioning");
                None
            }
        }
    }
}

/// One-shot latch around the create-user call.
pub struct ProvisioningGuard<C, E: ?Sized> {
    api: Arc<MyUserApi<C, E>>,
    attempted: AtomicBool,
}

impl<C, E: ?Sized> std::fmt::Debug for ProvisioningGuard<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningGuard")
            .field("attempted", &self.attempted.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<C, E> ProvisioningGuard<C, E>
where
    C: CredentialProvider + 'static,
    E: Effects + ?Sized + 'static,
{
    #[must_use]
    pub const fn new(api: Arc<MyUserApi<C, E>>) -> Self {
        Self {
            api,
            attempted: AtomicBool::new(false),
        }
    }

    /// Whether the create-user call has been triggered.
    #[must_use]
    pub fn attempted(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }

    /// Handle an identity report.
    ///
    /// Triggers the create-user call at most once per guard and returns its
    /// handle when this report was the one that triggered it. The latch is
    /// set before the call is spawned, so a report arriving while the call is
    /// in flight does not trigger a second one. Always navigates home.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_identity_resolved(&self, identity: &Identity) -> Option<JoinHandle<Result<(), ApiError>>> {
        let handle = identity.create_request().and_then(|request| {
            if self.attempted.swap(true, Ordering::AcqRel) {
                debug!("User already provisioned in this session");
                return None;
            }

            info!(auth0_id = %request.auth0_id, "Provisioning backend user");
            let api = Arc::clone(&self.api);
            Some(tokio::spawn(async move {
                api.create_my_user(&request).await
            }))
        });

        self.api.effects().navigate(View::Home);
        handle
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::auth::StaticCredentials;
    use crate::executor::RequestExecutor;
    use crate::hooks::testing::{Fired, Recorder};

    fn guard() -> (ProvisioningGuard<StaticCredentials, Recorder>, Arc<Recorder>) {
        let effects = Arc::new(Recorder::default());
        let executor = RequestExecutor::with_client(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9").expect("url"),
            StaticCredentials::new(SecretString::from("tok")),
        );
        let api = Arc::new(MyUserApi::new(executor, Arc::clone(&effects)));
        (ProvisioningGuard::new(api), effects)
    }

    fn identity() -> Identity {
        Identity {
            sub: Some("auth0|abc".to_string()),
            email: Some("ana@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn test_triggers_once_and_always_navigates() {
        let (guard, effects) = guard();

        let first = guard.on_identity_resolved(&identity());
        let second = guard.on_identity_resolved(&identity());

        assert!(first.is_some());
        assert!(second.is_none());
        assert!(guard.attempted());

        // The backend is unreachable; the failure stays silent.
        let result = first.expect("spawned").await.expect("joined");
        assert!(result.is_err());
        assert_eq!(
            effects.take(),
            [Fired::Navigate(View::Home), Fired::Navigate(View::Home)]
        );
    }

    #[tokio::test]
    async fn test_incomplete_identity_only_navigates() {
        let (guard, effects) = guard();

        let pending = Identity {
            sub: Some("auth0|abc".to_string()),
            email: None,
        };
        assert!(guard.on_identity_resolved(&pending).is_none());
        assert!(!guard.attempted());
        assert_eq!(effects.take(), [Fired::Navigate(View::Home)]);

        // The latch is still armed for the settled identity.
        assert!(guard.on_identity_resolved(&identity()).is_some());
    }

    #[tokio::test]
    async fn test_unusable_email_keeps_latch_armed() {
        let (guard, effects) = guard();

        let malformed = Identity {
            sub: Some("auth0|abc".to_string()),
            email: Some("ana@".to_string()),
        };
        assert!(guard.on_identity_resolved(&malformed).is_none());
        assert!(!guard.attempted());
        assert_eq!(effects.take(), [Fired::Navigate(View::Home)]);

        assert!(guard.on_identity_resolved(&identity()).is_some());
        assert!(guard.attempted());
    }
}

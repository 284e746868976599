//! Operations on the signed-in user's own record (`/api/my/user`).

use std::sync::Arc;

use forkful_core::{CreateUserRequest, ProfileDraft, UpdateUserRequest, User};
use tracing::instrument;

use super::{Operation, Settlement};
use crate::auth::CredentialProvider;
use crate::effects::Effects;
use crate::error::ApiError;
use crate::executor::{ApiRequest, Method, Payload, RequestExecutor};

const MY_USER_PATH: &str = "/api/my/user";

/// The signed-in user's profile.
pub struct MyUserApi<C, E: ?Sized> {
    executor: RequestExecutor<C>,
    effects: Arc<E>,
    get: Operation<User>,
    create: Operation<()>,
    update: Operation<User>,
}

impl<C, E: ?Sized> std::fmt::Debug for MyUserApi<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyUserApi")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<C, E> MyUserApi<C, E>
where
    C: CredentialProvider,
    E: Effects + ?Sized,
{
    #[must_use]
    pub fn new(executor: RequestExecutor<C>, effects: Arc<E>) -> Self {
        Self {
            executor,
            effects,
            get: Operation::new(Settlement::read()),
            // First-login provisioning happens behind the user's back.
            create: Operation::new(Settlement::silent()),
            update: Operation::new(Settlement::write_and_reload("User profile updated!")),
        }
    }

    /// The effects sink settlements report to.
    #[must_use]
    pub const fn effects(&self) -> &Arc<E> {
        &self.effects
    }

    /// State of [`get_my_user`](Self::get_my_user).
    #[must_use]
    pub const fn get_state(&self) -> &Operation<User> {
        &self.get
    }

    /// State of [`create_my_user`](Self::create_my_user).
    #[must_use]
    pub const fn create_state(&self) -> &Operation<()> {
        &self.create
    }

    /// State of [`update_my_user`](Self::update_my_user).
    #[must_use]
    pub const fn update_state(&self) -> &Operation<User> {
        &self.update
    }

    /// Load the signed-in user's record.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the token or the request fails; the error
    /// has already been notified.
    #[instrument(skip(self))]
    pub async fn get_my_user(&self) -> Result<User, ApiError> {
        self.get.begin();
        let result = self
            .executor
            .fetch(ApiRequest::get("fetch user", MY_USER_PATH).json_content())
            .await;
        self.get.settle(result, &*self.effects)
    }

    /// Register the signed-in identity with the backend.
    ///
    /// The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the token or the request fails. Nothing is
    /// notified.
    #[instrument(skip(self, request), fields(auth0_id = %request.auth0_id))]
    pub async fn create_my_user(&self, request: &CreateUserRequest) -> Result<(), ApiError> {
        self.create.begin();
        let result = self.send_json("create user", Method::Post, request).await;
        self.create.settle(result, &*self.effects)
    }

    /// Validate the profile form and save it.
    ///
    /// Only the six editable fields are sent; the email never changes here.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` (before any request) if a required
    /// field is blank, otherwise any request failure.
    #[instrument(skip(self, draft))]
    pub async fn update_my_user(&self, draft: &ProfileDraft) -> Result<User, ApiError> {
        let request: UpdateUserRequest = match draft.validate() {
            Ok(request) => request,
            Err(err) => return Err(self.update.reject(err.into(), &*self.effects)),
        };

        self.update.begin();
        let result = self.fetch_json("update user", Method::Put, &request).await;
        self.update.settle(result, &*self.effects)
    }

    async fn send_json<B: serde::Serialize>(
        &self,
        operation: &'static str,
        method: Method,
        body: &B,
    ) -> Result<(), ApiError> {
        let request = json_request(operation, method, body)?;
        self.executor.send(request).await
    }

    async fn fetch_json<B: serde::Serialize>(
        &self,
        operation: &'static str,
        method: Method,
        body: &B,
    ) -> Result<User, ApiError> {
        let request = json_request(operation, method, body)?;
        self.executor.fetch(request).await
    }
}

fn json_request<B: serde::Serialize>(
    operation: &'static str,
    method: Method,
    body: &B,
) -> Result<ApiRequest, ApiError> {
    let payload = Payload::json(body).map_err(|_| ApiError::request_failed(operation))?;
    Ok(ApiRequest::new(operation, method, MY_USER_PATH)
        .json_content()
        .payload(payload))
}

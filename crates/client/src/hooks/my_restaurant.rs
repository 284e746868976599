//! Operations on the signed-in user's restaurant (`/api/my/restaurant`).

use std::sync::Arc;

use forkful_core::{Restaurant, RestaurantDraft};
use tracing::instrument;

use super::{Operation, Settlement};
use crate::auth::CredentialProvider;
use crate::effects::Effects;
use crate::encoder::encode_restaurant;
use crate::error::ApiError;
use crate::executor::{ApiRequest, Method, Payload, RequestExecutor};

const MY_RESTAURANT_PATH: &str = "/api/my/restaurant";

/// The restaurant owned by the signed-in user.
pub struct MyRestaurantApi<C, E: ?Sized> {
    executor: RequestExecutor<C>,
    effects: Arc<E>,
    get: Operation<Restaurant>,
    create: Operation<Restaurant>,
    update: Operation<Restaurant>,
}

impl<C, E: ?Sized> std::fmt::Debug for MyRestaurantApi<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MyRestaurantApi")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<C, E> MyRestaurantApi<C, E>
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
            create: Operation::new(Settlement::write("Restaurant created successfully!")),
            update: Operation::new(Settlement::write_and_reload(
                "Restaurant updated successfully!",
            )),
        }
    }

    #[must_use]
    pub const fn get_state(&self) -> &Operation<Restaurant> {
        &self.get
    }

    #[must_use]
    pub const fn create_state(&self) -> &Operation<Restaurant> {
        &self.create
    }

    #[must_use]
    pub const fn update_state(&self) -> &Operation<Restaurant> {
        &self.update
    }

    /// Load the signed-in user's restaurant.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the token or the request fails, including
    /// when the user has no restaurant yet.
    #[instrument(skip(self))]
    pub async fn get_my_restaurant(&self) -> Result<Restaurant, ApiError> {
        self.get.begin();
        let result = self
            .executor
            .fetch(ApiRequest::get("fetch restaurant", MY_RESTAURANT_PATH))
            .await;
        self.get.settle(result, &*self.effects)
    }

    /// Validate the form and create the restaurant.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` before any request if the form is
    /// incomplete, otherwise any request failure.
    #[instrument(skip(self, draft), fields(restaurant = %draft.restaurant_name))]
    pub async fn create_my_restaurant(&self, draft: RestaurantDraft) -> Result<Restaurant, ApiError> {
        self.submit(&self.create, "create restaurant", Method::Post, draft)
            .await
    }

    /// Validate the form and replace the restaurant.
    ///
    /// Without a new image file the stored image is kept.
    ///
    /// # Errors
    ///
    /// Same as [`create_my_restaurant`](Self::create_my_restaurant).
    #[instrument(skip(self, draft), fields(restaurant = %draft.restaurant_name))]
    pub async fn update_my_restaurant(&self, draft: RestaurantDraft) -> Result<Restaurant, ApiError> {
        self.submit(&self.update, "update restaurant", Method::Put, draft)
            .await
    }

    async fn submit(
        &self,
        operation: &Operation<Restaurant>,
        name: &'static str,
        method: Method,
        draft: RestaurantDraft,
    ) -> Result<Restaurant, ApiError> {
        let validated = match draft.validate() {
            Ok(validated) => validated,
            Err(err) => return Err(operation.reject(err.into(), &*self.effects)),
        };

        operation.begin();
        let form = encode_restaurant(&validated);
        let request = ApiRequest::new(name, method, MY_RESTAURANT_PATH).payload(Payload::Multipart(form));
        let result = self.executor.fetch(request).await;
        operation.settle(result, &*self.effects)
    }
}

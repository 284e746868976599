//! City search (`/api/restaurant/search/{city}`).

use std::sync::Arc;

use forkful_core::{RestaurantSearchResponse, SearchQuery};
use tracing::instrument;

use super::{Operation, Settlement};
use crate::auth::CredentialProvider;
use crate::effects::Effects;
use crate::error::ApiError;
use crate::executor::{ApiRequest, RequestExecutor};

const SEARCH_PATH: &str = "/api/restaurant/search";

/// Restaurant search by city, one page at a time.
pub struct RestaurantSearchApi<C, E: ?Sized> {
    executor: RequestExecutor<C>,
    effects: Arc<E>,
    search: Operation<RestaurantSearchResponse>,
}

impl<C, E: ?Sized> std::fmt::Debug for RestaurantSearchApi<C, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestaurantSearchApi")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<C, E> RestaurantSearchApi<C, E>
where
    C: CredentialProvider,
    E: Effects + ?Sized,
{
    #[must_use]
    pub fn new(executor: RequestExecutor<C>, effects: Arc<E>) -> Self {
        Self {
            executor,
            effects,
            search: Operation::new(Settlement::read()),
        }
    }

    #[must_use]
    pub const fn search_state(&self) -> &Operation<RestaurantSearchResponse> {
        &self.search
    }

    /// Fetch one page (1-based) of restaurants delivering in `city`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` before any request for a blank city or
    /// page 0, otherwise any request failure.
    #[instrument(skip(self))]
    pub async fn search_restaurants(
        &self,
        city: &str,
        page: u32,
    ) -> Result<RestaurantSearchResponse, ApiError> {
        let query = match SearchQuery::new(city, page) {
            Ok(query) => query,
            Err(err) => return Err(self.search.reject(err.into(), &*self.effects)),
        };

        self.search.begin();
        let request = ApiRequest::get("get restaurants", SEARCH_PATH)
            .segment(query.city())
            .query("page", query.page().to_string());
        let result = self.executor.fetch(request).await;
        self.search.settle(result, &*self.effects)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::auth::StaticCredentials;
    use crate::hooks::testing::{Fired, Recorder};

    #[tokio::test]
    async fn test_blank_city_never_reaches_backend() {
        let effects = Arc::new(Recorder::default());
        let api = RestaurantSearchApi::new(
            RequestExecutor::with_client(
                reqwest::Client::new(),
                Url::parse("http://127.0.0.1:9").expect("url"),
                StaticCredentials::new(SecretString::from("tok")),
            ),
            Arc::clone(&effects),
        );

        let err = api.search_restaurants("  ", 1).await.expect_err("invalid");
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(matches!(
            effects.take().as_slice(),
            [Fired::Notify(n)] if n.message.contains("Search query is required")
        ));
    }
}

//! Integration tests for city search.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use forkful_client::{Notification, RequestExecutor, RestaurantSearchApi};
use forkful_integration_tests::{Effect, MockBackend, RecordingEffects, restaurant_json};
use serde_json::json;

#[tokio::test]
async fn test_search_path_and_paging() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::GET,
        "/api/restaurant/search/New%20York",
        StatusCode::OK,
        json!({
            "data": [restaurant_json()],
            "pagination": {"total": 11, "page": 2, "pages": 2}
        }),
    );

    let effects = Arc::new(RecordingEffects::default());
    let executor = RequestExecutor::new(&backend.config(), MockBackend::credentials()).expect("client");
    let api = RestaurantSearchApi::new(executor, Arc::clone(&effects));

    let results = api.search_restaurants("New York", 2).await.expect("results");
    assert_eq!(results.pagination.total, 11);
    assert_eq!(results.data.len(), 1);

    let request = backend.requests().pop().expect("one request");
    assert_eq!(request.query.as_deref(), Some("page=2"));
    assert_eq!(request.authorization(), Some("Bearer test-token"));
    assert!(effects.fired().is_empty());
    assert_eq!(
        api.search_state().state().data().map(|r| r.pagination.page),
        Some(2)
    );
}

#[tokio::test]
async fn test_search_failure_notifies() {
    let backend = MockBackend::start().await;
    let effects = Arc::new(RecordingEffects::default());
    let executor = RequestExecutor::new(&backend.config(), MockBackend::credentials()).expect("client");
    let api = RestaurantSearchApi::new(executor, Arc::clone(&effects));

    api.search_restaurants("Atlantis", 1).await.expect_err("404");
    assert_eq!(
        effects.fired(),
        [Effect::Notify(Notification::error("Failed to get restaurants"))]
    );
}

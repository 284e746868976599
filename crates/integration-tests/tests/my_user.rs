//! Integration tests for the signed-in user's profile operations.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use forkful_client::{
    ApiError, MyUserApi, Notification, OperationState, RequestExecutor, StaticCredentials,
};
use forkful_core::{CreateUserRequest, Email, ProfileDraft, SubjectId};
use forkful_integration_tests::{Effect, MockBackend, RecordingEffects, user_json};
use serde_json::json;

fn api(backend: &MockBackend) -> (MyUserApi<StaticCredentials, RecordingEffects>, Arc<RecordingEffects>) {
    let effects = Arc::new(RecordingEffects::default());
    let executor = RequestExecutor::new(&backend.config(), MockBackend::credentials()).expect("client");
    (MyUserApi::new(executor, Arc::clone(&effects)), effects)
}

fn ana() -> ProfileDraft {
    ProfileDraft {
        name: "Ana".to_string(),
        address_line1: "1 Main St".to_string(),
        city: "Metropolis".to_string(),
        state: "NY".to_string(),
        country: "US".to_string(),
        zip_code: "10001".to_string(),
    }
}

// =============================================================================
// Update Tests
// =============================================================================

#[tokio::test]
async fn test_profile_update_sends_six_fields_then_notifies_and_reloads() {
    let backend = MockBackend::start().await;
    backend.respond(Method::PUT, "/api/my/user", StatusCode::OK, user_json());
    let (api, effects) = api(&backend);

    let user = api.update_my_user(&ana()).await.expect("updated");
    assert_eq!(user.name.as_deref(), Some("Ana"));

    let puts = backend.requests_to(&Method::PUT, "/api/my/user");
    assert_eq!(puts.len(), 1, "exactly one PUT");
    let put = puts.first().expect("one PUT");
    assert_eq!(
        put.json(),
        &json!({
            "name": "Ana",
            "addressLine1": "1 Main St",
            "city": "Metropolis",
            "state": "NY",
            "country": "US",
            "zipCode": "10001"
        })
    );
    assert!(put.json().get("email").is_none());
    assert_eq!(put.content_type(), Some("application/json"));

    assert_eq!(
        effects.fired(),
        [
            Effect::Notify(Notification::success("User profile updated!")),
            Effect::Reload,
        ]
    );
    assert_eq!(api.update_state().state(), OperationState::Succeeded(user));
}

#[tokio::test]
async fn test_profile_update_failure_notifies_and_allows_retry() {
    let backend = MockBackend::start().await;
    backend.respond(
        Method::PUT,
        "/api/my/user",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"message": "boom"}),
    );
    let (api, effects) = api(&backend);

    let err = api.update_my_user(&ana()).await.expect_err("500");
    assert!(matches!(err, ApiError::RequestFailed { .. }));
    assert_eq!(
        effects.fired(),
        [Effect::Notify(Notification::error("Failed to update user"))]
    );
    assert_eq!(api.update_state().state(), OperationState::Idle);

    // A retry goes through once the backend recovers.
    backend.respond(Method::PUT, "/api/my/user", StatusCode::OK, user_json());
    api.update_my_user(&ana()).await.expect("retry succeeds");
    assert_eq!(backend.requests_to(&Method::PUT, "/api/my/user").len(), 2);
}

#[tokio::test]
async fn test_blank_profile_field_sends_nothing() {
    let backend = MockBackend::start().await;
    let (api, effects) = api(&backend);

    let mut draft = ana();
    draft.zip_code = "   ".to_string();

    let err = api.update_my_user(&draft).await.expect_err("invalid");
    assert!(matches!(err, ApiError::Validation(_)));
    assert!(backend.requests().is_empty());
    assert_eq!(effects.fired().len(), 1);
}

// =============================================================================
// Read / Create Tests
// =============================================================================

#[tokio::test]
async fn test_get_user_missing_record_notifies() {
    let backend = MockBackend::start().await;
    let (api, effects) = api(&backend);

    // Unconfigured routes answer 404.
    api.get_my_user().await.expect_err("404");
    assert_eq!(
        effects.fired(),
        [Effect::Notify(Notification::error("Failed to fetch user"))]
    );
}

#[tokio::test]
async fn test_create_user_body_and_silence() {
    let backend = MockBackend::start().await;
    backend.respond(Method::POST, "/api/my/user", StatusCode::CREATED, json!({}));
    let (api, effects) = api(&backend);

    let request = CreateUserRequest {
        auth0_id: SubjectId::new("auth0|abc"),
        email: Email::parse("ana@example.com").expect("email"),
    };
    api.create_my_user(&request).await.expect("created");

    let posts = backend.requests_to(&Method::POST, "/api/my/user");
    assert_eq!(
        posts.first().expect("one POST").json(),
        &json!({"auth0Id": "auth0|abc", "email": "ana@example.com"})
    );
    assert!(effects.fired().is_empty());
}

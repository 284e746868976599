//! Integration tests for Forkful.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p forkful-integration-tests
//! ```
//!
//! Every test runs against a [`MockBackend`]: an in-process axum server on
//! an ephemeral localhost port that records each request it receives and
//! answers with a canned status and JSON body. The same server stands in for
//! the Auth0 tenant (`/oauth/token`, `/userinfo`).
//!
//! # Test Categories
//!
//! - `executor` - Status handling, decoding, bearer auth
//! - `my_user` - Profile update and provisioning request bodies
//! - `my_restaurant` - Multipart encoding end to end
//! - `provisioning` - Create-once guard
//! - `auth0` - Refresh-token grant, caching, identity lookup
//! - `search` - City search paths and paging

#![allow(clippy::unwrap_used, clippy::missing_panics_doc, clippy::print_stderr)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use forkful_client::{ClientConfig, Effects, Notification, StaticCredentials, View};
use secrecy::SecretString;
use serde_json::Value;
use tokio::net::TcpListener;
use url::Url;

/// A multipart part as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl Part {
    /// The part's data as text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// A request body as received.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Multipart(Vec<Part>),
    Other(Vec<u8>),
}

/// One request the backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Recorded {
    /// The `Authorization` header, if any.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(axum::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// The JSON body; panics for any other body.
    #[must_use]
    pub fn json(&self) -> &Value {
        match &self.body {
            Body::Json(value) => value,
            other => panic!("expected a JSON body, got {other:?}"),
        }
    }

    /// The multipart parts; panics for any other body.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        match &self.body {
            Body::Multipart(parts) => parts,
            other => panic!("expected a multipart body, got {other:?}"),
        }
    }

    /// Text of the first multipart part named `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<String> {
        self.parts().iter().find(|p| p.name == name).map(Part::text)
    }
}

#[derive(Default)]
struct MockState {
    requests: Mutex<Vec<Recorded>>,
    routes: Mutex<HashMap<(Method, String), (StatusCode, Value)>>,
}

/// In-process stand-in for the restaurant backend and the Auth0 tenant.
pub struct MockBackend {
    base_url: Url,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Start a server on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(record)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock backend stopped: {e}");
            }
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}")).unwrap(),
            state,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.base_url
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, path.to_string()), (status, body));
    }

    /// Everything received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests matching `method path`.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    /// Client configuration pointing both the API and Auth0 at this server.
    #[must_use]
    pub fn config(&self) -> ClientConfig {
        self.config_with(&[])
    }

    /// Like [`config`](Self::config), with extra variables.
    #[must_use]
    pub fn config_with(&self, extra: &[(&str, &str)]) -> ClientConfig {
        let base = self.base_url.as_str().trim_end_matches('/').to_string();
        let vars: HashMap<String, String> = [
            ("FORKFUL_API_BASE_URL", base.as_str()),
            ("AUTH0_DOMAIN", base.as_str()),
            ("AUTH0_CLIENT_ID", "test-client"),
            ("AUTH0_CALLBACK_URL", "http://localhost:5173/auth-callback"),
            ("AUTH0_AUDIENCE", "forkful-api"),
            ("FORKFUL_HTTP_TIMEOUT_SECS", "5"),
        ]
        .into_iter()
        .chain(extra.iter().copied())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        ClientConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
    }

    /// A fixed test token.
    #[must_use]
    pub fn credentials() -> StaticCredentials {
        StaticCredentials::new(SecretString::from("test-token"))
    }
}

async fn record(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().map(ToOwned::to_owned);
    let headers = request.headers().clone();

    let is_multipart = headers
        .get(axum::http::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let body = if is_multipart {
        match read_multipart(request).await {
            Ok(parts) => Body::Multipart(parts),
            Err(response) => return response,
        }
    } else {
        let bytes = to_bytes(request.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        if bytes.is_empty() {
            Body::Empty
        } else {
            serde_json::from_slice(&bytes)
                .map_or_else(|_| Body::Other(bytes.to_vec()), Body::Json)
        }
    };

    state
        .requests
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(Recorded {
            method: method.clone(),
            path: path.clone(),
            query,
            headers,
            body,
        });

    let route = state
        .routes
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&(method, path))
        .cloned();

    match route {
        Some((status, body)) => (status, axum::Json(body)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            axum::Json(serde_json::json!({"message": "not found"})),
        )
            .into_response(),
    }
}

async fn read_multipart(request: Request) -> Result<Vec<Part>, Response> {
    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;

    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(ToOwned::to_owned);
        let content_type = field.content_type().map(ToOwned::to_owned);
        let data = field
            .bytes()
            .await
            .map_err(IntoResponse::into_response)?
            .to_vec();
        parts.push(Part {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(parts)
}

/// Side effects as they fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Notify(Notification),
    Reload,
    Navigate(View),
}

/// Effects sink that records instead of rendering.
#[derive(Debug, Default)]
pub struct RecordingEffects {
    fired: Mutex<Vec<Effect>>,
}

impl RecordingEffects {
    /// Effects fired so far, in order.
    #[must_use]
    pub fn fired(&self) -> Vec<Effect> {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn push(&self, effect: Effect) {
        self.fired
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(effect);
    }
}

impl Effects for RecordingEffects {
    fn notify(&self, notification: Notification) {
        self.push(Effect::Notify(notification));
    }

    fn reload(&self) {
        self.push(Effect::Reload);
    }

    fn navigate(&self, view: View) {
        self.push(Effect::Navigate(view));
    }
}

/// A JSON user record as the backend returns it.
#[must_use]
pub fn user_json() -> Value {
    serde_json::json!({
        "_id": "65f0c0ffee",
        "auth0Id": "auth0|abc",
        "email": "ana@example.com",
        "name": "Ana",
        "addressLine1": "1 Main St",
        "city": "Metropolis",
        "state": "NY",
        "country": "US",
        "zipCode": "10001"
    })
}

/// A JSON restaurant record as the backend returns it.
#[must_use]
pub fn restaurant_json() -> Value {
    serde_json::json!({
        "_id": "66a1b2c3",
        "user": "65f0c0ffee",
        "restaurantName": "Luigi's",
        "city": "Metropolis",
        "country": "US",
        "deliveryPrice": 450,
        "estimatedDeliveryTime": 30,
        "cuisines": ["Italian", "Pizza"],
        "menuItems": [
            {"_id": "m1", "name": "Margherita", "price": 999, "description": "Tomato and basil"}
        ],
        "imageUrl": "https://cdn.example/luigi.png",
        "lastUpdated": "2024-05-01T12:00:00Z"
    })
}

//! Authenticated request execution.
//!
//! [`RequestExecutor`] is the only place that talks to the restaurant
//! backend. Every request fetches a fresh token from the credential provider,
//! resolves its path against the configured base URL, and collapses every
//! failure mode (transport, non-2xx, undecodable body) into
//! [`ApiError::RequestFailed`] carrying the operation name.

use std::sync::Arc;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::auth::CredentialProvider;
use crate::config::ClientConfig;
use crate::encoder::FlatForm;
use crate::error::ApiError;

/// HTTP methods the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
        }
    }
}

/// Request body.
#[derive(Debug, Default)]
pub enum Payload {
    /// No body.
    #[default]
    Empty,
    /// A JSON document, sent with `Content-Type: application/json`.
    Json(serde_json::Value),
    /// A flattened multipart form; the boundary header is set by the client.
    Multipart(FlatForm),
}

impl Payload {
    /// Encode a typed value as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the value does not serialize.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Json)
    }
}

/// One backend call.
#[derive(Debug)]
pub struct ApiRequest {
    operation: &'static str,
    method: Method,
    path: String,
    segments: Vec<String>,
    query: Vec<(&'static str, String)>,
    headers: HeaderMap,
    payload: Payload,
}

impl ApiRequest {
    /// Start a request for `operation` (e.g. `fetch user`) at `path`.
    #[must_use]
    pub fn new(operation: &'static str, method: Method, path: impl Into<String>) -> Self {
        Self {
            operation,
            method,
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            payload: Payload::Empty,
        }
    }

    /// Shorthand for a GET.
    #[must_use]
    pub fn get(operation: &'static str, path: impl Into<String>) -> Self {
        Self::new(operation, Method::Get, path)
    }

    /// Append a percent-encoded path segment, e.g. a user-entered city.
    #[must_use]
    pub fn segment(mut self, value: impl Into<String>) -> Self {
        self.segments.push(value.into());
        self
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.query.push((key, value.into()));
        self
    }

    /// Add a header. `Authorization` is always overwritten with the bearer token.
    #[must_use]
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Mark this as a JSON exchange even when there is no body.
    #[must_use]
    pub fn json_content(self) -> Self {
        self.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Attach a body.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = payload;
        self
    }

    /// The operation name used in failures.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        self.operation
    }
}

/// Sends authenticated requests to the restaurant backend.
///
/// Cheap to clone; clones share the HTTP connection pool and the credential
/// provider.
pub struct RequestExecutor<C> {
    inner: Arc<RequestExecutorInner<C>>,
}

struct RequestExecutorInner<C> {
    client: reqwest::Client,
    base_url: Url,
    credentials: C,
}

impl<C> Clone for RequestExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for RequestExecutor<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl<C: CredentialProvider> RequestExecutor<C> {
    /// Create an executor from configuration.
    ///
    /// # Errors
    ///
    /// Returns `reqwest::Error` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, credentials: C) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self::with_client(client, config.api_base_url.clone(), credentials))
    }

    /// Create an executor around an existing HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: Url, credentials: C) -> Self {
        Self {
            inner: Arc::new(RequestExecutorInner {
                client,
                base_url,
                credentials,
            }),
        }
    }

    /// The configured credential provider.
    #[must_use]
    pub fn credentials(&self) -> &C {
        &self.inner.credentials
    }

    /// Send a request and decode the JSON response body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Credential` if no token could be obtained, or
    /// `ApiError::RequestFailed` for any transport, status or decode failure.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let operation = request.operation;
        let response = self.dispatch(request).await?;

        response.json().await.map_err(|e| {
            debug!(operation, error = %e, "Failed to decode response body");
            ApiError::request_failed(operation)
        })
    }

    /// Send a request whose response body is ignored.
    ///
    /// # Errors
    ///
    /// Same as [`fetch`](Self::fetch), minus decode failures.
    pub async fn send(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.dispatch(request).await.map(drop)
    }

    #[instrument(
        skip(self, request),
        fields(operation = request.operation, method = ?request.method, path = %request.path)
    )]
    async fn dispatch(&self, request: ApiRequest) -> Result<reqwest::Response, ApiError> {
        let ApiRequest {
            operation,
            method,
            path,
            segments,
            query,
            headers,
            payload,
        } = request;

        // Credential errors pass through unchanged.
        let token = self.inner.credentials.access_token().await?;
        let mut url = self.resolve(&path, &segments, operation)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(&query);
        }

        let builder = self
            .inner
            .client
            .request(method.into(), url)
            .headers(headers)
            .bearer_auth(token.expose_secret());

        let builder = match payload {
            Payload::Empty => builder,
            Payload::Json(body) => builder.json(&body),
            Payload::Multipart(form) => builder.multipart(form.into_multipart().map_err(|e| {
                debug!(operation, error = %e, "Failed to build multipart body");
                ApiError::request_failed(operation)
            })?),
        };

        let response = builder.send().await.map_err(|e| {
            debug!(operation, error = %e, "Request failed to send");
            ApiError::request_failed(operation)
        })?;

        let status = response.status();
        if !status.is_success() {
            debug!(operation, %status, "Backend rejected request");
            return Err(ApiError::request_failed(operation));
        }

        debug!(operation, %status, "Request succeeded");
        Ok(response)
    }

    fn resolve(
        &self,
        path: &str,
        segments: &[String],
        operation: &'static str,
    ) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = Url::parse(&format!("{base}/{path}")).map_err(|e| {
            debug!(operation, error = %e, "Invalid request URL");
            ApiError::request_failed(operation)
        })?;

        if !segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| ApiError::request_failed(operation))?
                .pop_if_empty()
                .extend(segments);
        }
        Ok(url)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::auth::StaticCredentials;

    fn executor(base: &str) -> RequestExecutor<StaticCredentials> {
        RequestExecutor::with_client(
            reqwest::Client::new(),
            Url::parse(base).unwrap(),
            StaticCredentials::new(SecretString::from("tok")),
        )
    }

    #[test]
    fn test_resolve_joins_paths() {
        let exec = executor("http://localhost:7000");
        assert_eq!(
            exec.resolve("/api/my/user", &[], "fetch user")
                .unwrap()
                .as_str(),
            "http://localhost:7000/api/my/user"
        );

        let exec = executor("https://api.forkful.test/v1/");
        assert_eq!(
            exec.resolve("api/my/restaurant", &[], "fetch restaurant")
                .unwrap()
                .as_str(),
            "https://api.forkful.test/v1/api/my/restaurant"
        );
    }

    #[test]
    fn test_segments_are_percent_encoded() {
        let exec = executor("http://localhost:7000/");
        let url = exec
            .resolve(
                "/api/restaurant/search",
                &["New York/Manhattan".to_string()],
                "get restaurants",
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:7000/api/restaurant/search/New%20York%2FManhattan"
        );
    }

    #[test]
    fn test_json_content_header() {
        let request = ApiRequest::get("fetch user", "/api/my/user").json_content();
        assert_eq!(
            request.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_failed() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let exec = executor("http://127.0.0.1:9");
        let err = exec
            .send(ApiRequest::get("fetch user", "/api/my/user"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApiError::RequestFailed {
                operation: "fetch user"
            }
        ));
    }
}

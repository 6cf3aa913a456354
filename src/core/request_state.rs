// src/core/request_state.rs
//! Request state wrapper: one network call exposed as `{data, error, loading}`.
//!
//! `send` never returns an error. Failures land in `error` and the call
//! resolves to `None`, so callers branch on the returned value.
//!
//! Every `send` takes a new generation number. A response that arrives for
//! an older generation than the latest one is dropped without touching the
//! state, so a slow superseded call can never overwrite a newer result.

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use super::transport::{ApiRequest, HttpMethod, MultipartForm, RequestBody, RequestError, Transport};
use crate::app_log;
use crate::types::Envelope;

/// Fixed part of a request: what every call from one hook shares.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub method: HttpMethod,
    pub base_url: String,
    pub url: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl RequestConfig {
    pub fn new(method: HttpMethod, base_url: impl Into<String>) -> Self {
        Self {
            method,
            base_url: base_url.into(),
            url: None,
            headers: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Per-call part of a request, merged over the `RequestConfig`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOverrides {
    pub url: Option<String>,
    pub body: RequestBody,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
}

impl RequestOverrides {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = RequestBody::Json(value);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot<T> {
    pub data: Option<T>,
    pub error: Option<RequestError>,
    pub loading: bool,
}

#[derive(Debug)]
struct Inner<T> {
    data: Option<T>,
    error: Option<RequestError>,
    loading: bool,
    generation: u64,
}

/// Clones share the same state, like several handles on one hook.
pub struct RequestState<T> {
    config: RequestConfig,
    transport: Arc<dyn Transport>,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for RequestState<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> RequestState<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    pub fn new(transport: Arc<dyn Transport>, config: RequestConfig) -> Self {
        Self {
            config,
            transport,
            inner: Arc::new(Mutex::new(Inner {
                data: None,
                error: None,
                loading: false,
                generation: 0,
            })),
        }
    }

    pub fn config(&self) -> &RequestConfig {
        &self.config
    }

    /// Merge the fixed configuration with `overrides`.
    pub fn build_request(&self, overrides: RequestOverrides) -> ApiRequest {
        let path = overrides
            .url
            .or_else(|| self.config.url.clone())
            .unwrap_or_default();

        let mut headers = self.config.headers.clone();
        headers.extend(overrides.headers);

        ApiRequest {
            method: self.config.method,
            url: join_url(&self.config.base_url, &path),
            headers,
            query: overrides.query,
            body: overrides.body,
        }
    }

    /// Issue one call. Returns the parsed body, or `None` on failure or when
    /// a newer call superseded this one while it was in flight.
    pub async fn send(&self, overrides: RequestOverrides) -> Option<T> {
        let request = self.build_request(overrides);
        let method = request.method;
        let url = request.url.clone();
        let generation = self.begin();

        let outcome = match self.transport.execute(request).await {
            Ok(body) => decode::<T>(&body),
            Err(error) => Err(error),
        };

        let mut inner = self.inner.lock();
        if inner.generation != generation {
            app_log!(
                debug,
                "Discarding superseded response for {} {} (generation {} < {})",
                method,
                url,
                generation,
                inner.generation
            );
            return None;
        }

        inner.loading = false;
        match outcome {
            Ok(data) => {
                inner.data = Some(data.clone());
                inner.error = None;
                Some(data)
            }
            Err(error) => {
                app_log!(warn, "{} {} failed: {}", method, url, error);
                inner.data = None;
                inner.error = Some(error);
                None
            }
        }
    }

    /// Record a failure detected before any network call.
    pub fn reject(&self, error: RequestError) -> Option<T> {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.loading = false;
        inner.data = None;
        app_log!(warn, "Request rejected before dispatch: {}", error);
        inner.error = Some(error);
        None
    }

    fn begin(&self) -> u64 {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        inner.loading = true;
        inner.data = None;
        inner.error = None;
        inner.generation
    }

    pub fn snapshot(&self) -> RequestSnapshot<T> {
        let inner = self.inner.lock();
        RequestSnapshot {
            data: inner.data.clone(),
            error: inner.error.clone(),
            loading: inner.loading,
        }
    }

    pub fn data(&self) -> Option<T> {
        self.inner.lock().data.clone()
    }

    pub fn error(&self) -> Option<RequestError> {
        self.inner.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.lock().loading
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }
}

/// Empty bodies (DELETE/PUT acknowledgements) decode as JSON `null`.
fn decode<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str::<Envelope<T>>(body)
        .map(Envelope::into_inner)
        .map_err(|e| RequestError::Decode(e.to_string()))
}

/// Join a base URL and a path; absolute URLs in `path` win.
pub fn join_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Echo(Result<String, RequestError>);

    #[async_trait]
    impl Transport for Echo {
        async fn execute(&self, _request: ApiRequest) -> Result<String, RequestError> {
            self.0.clone()
        }
    }

    fn state(result: Result<String, RequestError>) -> RequestState<Value> {
        RequestState::new(
            Arc::new(Echo(result)),
            RequestConfig::new(HttpMethod::Get, "http://api.test/"),
        )
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://api.test/", "/posts"), "http://api.test/posts");
        assert_eq!(join_url("http://api.test", "posts"), "http://api.test/posts");
        assert_eq!(join_url("http://api.test", ""), "http://api.test");
        assert_eq!(join_url("http://api.test", "https://other/x"), "https://other/x");
    }

    #[test]
    fn test_build_request_merges_config_and_overrides() {
        let state: RequestState<Value> = RequestState::new(
            Arc::new(Echo(Ok(String::new()))),
            RequestConfig::new(HttpMethod::Post, "http://api.test")
                .with_url("/posts")
                .with_header("Accept", "application/json"),
        );

        let fixed = state.build_request(RequestOverrides::default());
        assert_eq!(fixed.url, "http://api.test/posts");
        assert_eq!(fixed.method, HttpMethod::Post);

        let overridden = state.build_request(
            RequestOverrides::default()
                .url("/dashboard/d1")
                .query("access_token", "t")
                .header("X-Trace", "1"),
        );
        assert_eq!(overridden.url, "http://api.test/dashboard/d1");
        assert_eq!(overridden.query, vec![("access_token".to_string(), "t".to_string())]);
        assert_eq!(overridden.headers.len(), 2);
    }

    #[tokio::test]
    async fn test_success_sets_data() {
        let state = state(Ok(r#"{"data": {"ok": true}}"#.to_string()));
        let data = state.send(RequestOverrides::default()).await;
        assert_eq!(data, Some(serde_json::json!({"ok": true})));

        let snapshot = state.snapshot();
        assert!(!snapshot.loading);
        assert!(snapshot.error.is_none());
        assert_eq!(snapshot.data, data);
    }

    #[tokio::test]
    async fn test_failure_resolves_to_none() {
        let state = state(Err(RequestError::Status {
            status: 500,
            body: "boom".into(),
        }));
        assert!(state.send(RequestOverrides::default()).await.is_none());

        let snapshot = state.snapshot();
        assert!(snapshot.data.is_none());
        assert_eq!(snapshot.error.and_then(|e| e.status()), Some(500));
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let state = state(Ok(String::new()));
        assert_eq!(state.send(RequestOverrides::default()).await, Some(Value::Null));
    }

    #[tokio::test]
    async fn test_decode_failure() {
        let typed: RequestState<Vec<u64>> = RequestState::new(
            Arc::new(Echo(Ok("{\"nope\": 1}".to_string()))),
            RequestConfig::new(HttpMethod::Get, "http://api.test"),
        );
        assert!(typed.send(RequestOverrides::default()).await.is_none());
        assert!(matches!(typed.error(), Some(RequestError::Decode(_))));
    }

    #[test]
    fn test_reject_skips_network() {
        let state = state(Ok("{}".to_string()));
        assert!(state.reject(RequestError::MissingParameter("share")).is_none());
        assert_eq!(state.error(), Some(RequestError::MissingParameter("share")));
        assert_eq!(state.generation(), 1);
    }
}

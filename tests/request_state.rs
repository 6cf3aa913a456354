mod common;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::oneshot;

use common::{ScriptedTransport, BASE_URL};
use hireflow::core::{
    ApiRequest, HttpMethod, RequestConfig, RequestError, RequestOverrides, RequestState, Transport,
};
use hireflow::types::Language;
use hireflow::ServiceClient;

/// Each call waits until the test releases it, so responses can be made to
/// arrive in any order.
#[derive(Default)]
struct GatedTransport {
    gates: Mutex<VecDeque<oneshot::Receiver<Result<String, RequestError>>>>,
}

impl GatedTransport {
    fn gate(&self) -> oneshot::Sender<Result<String, RequestError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().push_back(rx);
        tx
    }
}

#[async_trait]
impl Transport for GatedTransport {
    async fn execute(&self, _request: ApiRequest) -> Result<String, RequestError> {
        let gate = self.gates.lock().pop_front();
        match gate {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RequestError::Transport("gate dropped".into()))),
            None => Err(RequestError::Transport("no gate".into())),
        }
    }
}

#[tokio::test]
async fn test_superseded_response_is_discarded() {
    let transport = Arc::new(GatedTransport::default());
    let first_gate = transport.gate();
    let second_gate = transport.gate();

    let state: RequestState<Value> = RequestState::new(
        transport.clone(),
        RequestConfig::new(HttpMethod::Get, BASE_URL).with_url("/share/s-1"),
    );

    let first = tokio::spawn({
        let state = state.clone();
        async move { state.send(RequestOverrides::default()).await }
    });
    // let the first call register before the second one starts
    while state.generation() < 1 {
        tokio::task::yield_now().await;
    }
    let second = tokio::spawn({
        let state = state.clone();
        async move { state.send(RequestOverrides::default()).await }
    });
    while state.generation() < 2 {
        tokio::task::yield_now().await;
    }
    assert!(state.is_loading());

    second_gate.send(Ok(json!({"n": 2}).to_string())).unwrap();
    assert_eq!(second.await.unwrap(), Some(json!({"n": 2})));
    assert!(!state.is_loading());

    first_gate.send(Ok(json!({"n": 1}).to_string())).unwrap();
    assert_eq!(first.await.unwrap(), None);

    let snapshot = state.snapshot();
    assert_eq!(snapshot.data, Some(json!({"n": 2})));
    assert!(snapshot.error.is_none());
}

#[tokio::test]
async fn test_loading_stays_until_latest_completes() {
    let transport = Arc::new(GatedTransport::default());
    let first_gate = transport.gate();
    let second_gate = transport.gate();

    let state: RequestState<Value> =
        RequestState::new(transport.clone(), RequestConfig::new(HttpMethod::Get, BASE_URL));

    let first = tokio::spawn({
        let state = state.clone();
        async move { state.send(RequestOverrides::default()).await }
    });
    while state.generation() < 1 {
        tokio::task::yield_now().await;
    }
    let second = tokio::spawn({
        let state = state.clone();
        async move { state.send(RequestOverrides::default()).await }
    });
    while state.generation() < 2 {
        tokio::task::yield_now().await;
    }

    first_gate
        .send(Err(RequestError::Transport("reset".into())))
        .unwrap();
    assert_eq!(first.await.unwrap(), None);
    assert!(state.is_loading());
    assert!(state.error().is_none());

    second_gate.send(Ok("[]".to_string())).unwrap();
    assert_eq!(second.await.unwrap(), Some(json!([])));
    assert!(!state.is_loading());
}

#[tokio::test]
async fn test_new_call_clears_previous_error() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Get, "/share/s-1", common::server_error());
    transport.on_json(
        HttpMethod::Get,
        "/share/s-1",
        json!({"data": {"id": 7, "title": "Backend Engineer", "skills": "[\"Rust\"]"}}),
    );
    let client = ServiceClient::new(transport.clone(), BASE_URL);
    let request = client.post_by_share("s-1");

    assert!(request.get().await.is_none());
    assert_eq!(request.snapshot().error.and_then(|e| e.status()), Some(500));

    let post = request.get().await.unwrap();
    assert_eq!(post.skills, vec!["Rust"]);
    let snapshot = request.snapshot();
    assert!(snapshot.error.is_none());
    assert_eq!(snapshot.data.map(|p| p.id), Some(7));
}

#[tokio::test]
async fn test_missing_parameters_skip_the_network() {
    let transport = ScriptedTransport::new();
    let client = ServiceClient::new(transport.clone(), BASE_URL);

    let share = client.post_by_share("  ");
    assert!(share.get().await.is_none());
    assert_eq!(
        share.snapshot().error,
        Some(RequestError::MissingParameter("share"))
    );

    let dashboard = client.dashboard("d-1", "");
    assert!(dashboard.get().await.is_none());
    assert_eq!(
        dashboard.snapshot().error,
        Some(RequestError::MissingParameter("access token"))
    );

    let delete = client.delete_post();
    assert!(delete.delete("", "secret").await.is_none());
    assert_eq!(
        delete.snapshot().error,
        Some(RequestError::MissingParameter("dashboard id"))
    );

    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_resource_paths() {
    let transport = ScriptedTransport::new();
    transport.on(HttpMethod::Post, "/interview/3", Ok(String::new()));
    transport.on(HttpMethod::Post, "/interview/3/es", Ok(String::new()));
    transport.on(HttpMethod::Put, "/applies/3", Ok(String::new()));
    transport.on(HttpMethod::Delete, "/applies/3", Ok(String::new()));
    transport.on_json(
        HttpMethod::Post,
        "/posts",
        json!({"share": "s-9", "dashboard": "d-9", "access_token": "tok"}),
    );
    let client = ServiceClient::new(transport.clone(), BASE_URL);

    assert_eq!(client.request_interview().request(3, None).await, Some(Value::Null));
    assert!(client
        .request_interview()
        .request(3, Some(Language::Es))
        .await
        .is_some());
    assert!(client.mark_favourite().toggle(3).await.is_some());
    assert!(client.delete_application().delete(3).await.is_some());

    let post = hireflow::types::NewPost {
        token: "sk-test".into(),
        title: "Backend Engineer".into(),
        description: "Build APIs".into(),
        skills: vec!["Rust".into()],
        city: "Paris".into(),
        min_experience: 3,
    };
    let created = client.create_post().create(&post).await.unwrap();
    assert_eq!(created.share, "s-9");

    let body = transport
        .requests()
        .into_iter()
        .find(|r| r.url.ends_with("/posts"))
        .map(|r| r.body)
        .unwrap();
    match body {
        hireflow::core::RequestBody::Json(value) => {
            assert_eq!(value["skills"], json!("[\"Rust\"]"));
            assert_eq!(value["min_experience"], json!(3));
        }
        other => panic!("expected json body, got {:?}", other),
    }
}

#[tokio::test]
async fn test_path_parameters_are_single_segments() {
    let transport = ScriptedTransport::new();
    transport.on_json(
        HttpMethod::Get,
        "/share/a%2Fb",
        json!({"data": {"id": 1, "title": "Backend Engineer"}}),
    );
    transport.on(HttpMethod::Get, "/share/x%3Fy", common::server_error());
    transport.on(HttpMethod::Delete, "/dashboard/d%2F1", Ok(String::new()));
    let client = ServiceClient::new(transport.clone(), BASE_URL);

    assert!(client.post_by_share("a/b").get().await.is_some());
    assert!(client.post_by_share("x?y").get().await.is_none());
    assert!(client.delete_post().delete("d/1", "secret").await.is_some());
    assert!(client.dashboard("..", "secret").get().await.is_none());

    let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/share/a%2Fb", BASE_URL),
            format!("{}/share/x%3Fy", BASE_URL),
            format!("{}/dashboard/d%2F1", BASE_URL),
        ]
    );
}

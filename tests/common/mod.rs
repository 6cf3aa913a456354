#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Arc;

use hireflow::core::{ApiRequest, HttpMethod, RequestError, Transport};
use hireflow::{DashboardController, DashboardSession, ServiceClient};

pub const BASE_URL: &str = "http://api.test";

struct Scripted {
    method: HttpMethod,
    path: String,
    responses: VecDeque<Result<String, RequestError>>,
}

/// In-memory backend. Responses are matched by method and path; queued
/// responses are consumed in order and the last one repeats.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<Vec<Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: HttpMethod, path: &str, response: Result<String, RequestError>) {
        let mut scripts = self.scripts.lock();
        match scripts
            .iter_mut()
            .find(|s| s.method == method && s.path == path)
        {
            Some(script) => script.responses.push_back(response),
            None => scripts.push(Scripted {
                method,
                path: path.to_string(),
                responses: VecDeque::from([response]),
            }),
        }
    }

    pub fn on_json(&self, method: HttpMethod, path: &str, body: Value) {
        self.on(method, path, Ok(body.to_string()));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub fn count(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{}{}", BASE_URL, path);
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<String, RequestError> {
        self.requests.lock().push(request.clone());

        let mut scripts = self.scripts.lock();
        let script = scripts.iter_mut().find(|s| {
            s.method == request.method && request.url == format!("{}{}", BASE_URL, s.path)
        });
        match script {
            Some(script) if script.responses.len() > 1 => script
                .responses
                .pop_front()
                .unwrap_or_else(|| Err(RequestError::Transport("empty script".into()))),
            Some(script) => script
                .responses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(RequestError::Transport("empty script".into()))),
            None => Err(RequestError::Status {
                status: 404,
                body: format!("no script for {} {}", request.method, request.url),
            }),
        }
    }
}

pub fn server_error() -> Result<String, RequestError> {
    Err(RequestError::Status {
        status: 500,
        body: "Internal Server Error".into(),
    })
}

pub fn applicant(id: u64, name: &str, ai_score: f64, skills_match: f64, experience: f64) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "0612345678",
        "resume_path": format!("resumes/{}.pdf", id),
        "is_favorite": 0,
        "detail": json!({
            "skills_match": skills_match,
            "ai_score": ai_score,
            "experience": experience,
            "skills": ["Rust", "Go"],
            "ai_summary": "Solid profile",
            "interview": {}
        }).to_string()
    })
}

pub fn dashboard(applicants: Vec<Value>) -> Value {
    json!({
        "data": {
            "id": 7,
            "title": "Backend Engineer",
            "description": "Build APIs",
            "skills": "[\"Rust\",\"Go\"]",
            "city": "Paris",
            "min_experience": 3,
            "created_at": "2025-01-15 09:30:00",
            "applies": applicants
        }
    })
}

pub fn controller(transport: Arc<ScriptedTransport>) -> DashboardController {
    let client = ServiceClient::new(transport, BASE_URL);
    DashboardController::new(client, DashboardSession::new("d-1", "secret"))
}

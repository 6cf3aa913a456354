// src/core/resources.rs
//! One client per backend resource. Each fixes method and path template on
//! top of a `RequestState` and exposes a narrow call.

use reqwest::Url;
use serde_json::Value;
use std::sync::Arc;

use super::request_state::{RequestConfig, RequestOverrides, RequestSnapshot, RequestState};
use super::transport::{HttpMethod, RequestError, Transport};
use crate::types::{ApplicationId, CreatedPost, DashboardData, JobPost, Language, NewPost};
use crate::validation::ValidApplication;

pub const POSTS_ENDPOINT: &str = "/posts";
pub const SHARE_ENDPOINT: &str = "/share";
pub const DASHBOARD_ENDPOINT: &str = "/dashboard";
pub const APPLIES_ENDPOINT: &str = "/applies";
pub const INTERVIEW_ENDPOINT: &str = "/interview";

const ACCESS_TOKEN_PARAM: &str = "access_token";

fn require(value: &str, name: &'static str) -> Result<(), RequestError> {
    if value.trim().is_empty() {
        Err(RequestError::MissingParameter(name))
    } else {
        Ok(())
    }
}

/// Percent-encode `value` as exactly one path segment. `.` and `..` would
/// collapse the path and count as missing.
fn path_segment(value: &str, name: &'static str) -> Result<String, RequestError> {
    require(value, name)?;
    let mut url = Url::parse("http://segment.invalid/")
        .map_err(|e| RequestError::Transport(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| RequestError::MissingParameter(name))?
        .clear()
        .push(value);
    let segment = url.path().trim_start_matches('/');
    if segment.is_empty() {
        return Err(RequestError::MissingParameter(name));
    }
    Ok(segment.to_string())
}

/// `POST /posts`
#[derive(Clone)]
pub struct CreatePost {
    state: RequestState<CreatedPost>,
}

impl CreatePost {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        let config = RequestConfig::new(HttpMethod::Post, base_url).with_url(POSTS_ENDPOINT);
        Self {
            state: RequestState::new(transport, config),
        }
    }

    pub async fn create(&self, post: &NewPost) -> Option<CreatedPost> {
        let body = match serde_json::to_value(post) {
            Ok(body) => body,
            Err(e) => return self.state.reject(RequestError::Decode(e.to_string())),
        };
        self.state.send(RequestOverrides::default().json(body)).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<CreatedPost> {
        self.state.snapshot()
    }
}

/// `GET /share/{share}`
#[derive(Clone)]
pub struct GetPostByShare {
    state: RequestState<JobPost>,
    share: String,
}

impl GetPostByShare {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str, share: impl Into<String>) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Get, base_url)),
            share: share.into(),
        }
    }

    pub async fn get(&self) -> Option<JobPost> {
        let share = match path_segment(&self.share, "share") {
            Ok(share) => share,
            Err(e) => return self.state.reject(e),
        };
        let url = format!("{}/{}", SHARE_ENDPOINT, share);
        self.state.send(RequestOverrides::default().url(url)).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<JobPost> {
        self.state.snapshot()
    }
}

/// `GET /dashboard/{id}?access_token=...`
#[derive(Clone)]
pub struct GetDashboard {
    state: RequestState<DashboardData>,
    dashboard_id: String,
    access_token: String,
}

impl GetDashboard {
    pub fn new(
        transport: Arc<dyn Transport>,
        base_url: &str,
        dashboard_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Get, base_url)),
            dashboard_id: dashboard_id.into(),
            access_token: access_token.into(),
        }
    }

    pub async fn get(&self) -> Option<DashboardData> {
        let dashboard_id = match path_segment(&self.dashboard_id, "dashboard id")
            .and_then(|id| require(&self.access_token, "access token").map(|_| id))
        {
            Ok(id) => id,
            Err(e) => return self.state.reject(e),
        };
        let overrides = RequestOverrides::default()
            .url(format!("{}/{}", DASHBOARD_ENDPOINT, dashboard_id))
            .query(ACCESS_TOKEN_PARAM, self.access_token.clone());
        self.state.send(overrides).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<DashboardData> {
        self.state.snapshot()
    }
}

/// `DELETE /dashboard/{id}?access_token=...`
#[derive(Clone)]
pub struct DeletePost {
    state: RequestState<Value>,
}

impl DeletePost {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Delete, base_url)),
        }
    }

    pub async fn delete(&self, dashboard_id: &str, access_token: &str) -> Option<Value> {
        let dashboard_id = match path_segment(dashboard_id, "dashboard id")
            .and_then(|id| require(access_token, "access token").map(|_| id))
        {
            Ok(id) => id,
            Err(e) => return self.state.reject(e),
        };
        let overrides = RequestOverrides::default()
            .url(format!("{}/{}", DASHBOARD_ENDPOINT, dashboard_id))
            .query(ACCESS_TOKEN_PARAM, access_token);
        self.state.send(overrides).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<Value> {
        self.state.snapshot()
    }
}

/// `POST /applies` as multipart form data.
#[derive(Clone)]
pub struct SubmitApplication {
    state: RequestState<Value>,
}

impl SubmitApplication {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        // reqwest writes the multipart content type with its boundary
        let config = RequestConfig::new(HttpMethod::Post, base_url).with_url(APPLIES_ENDPOINT);
        Self {
            state: RequestState::new(transport, config),
        }
    }

    pub async fn submit(&self, application: &ValidApplication) -> Option<Value> {
        self.state
            .send(RequestOverrides::default().multipart(application.to_multipart()))
            .await
    }

    pub fn snapshot(&self) -> RequestSnapshot<Value> {
        self.state.snapshot()
    }
}

/// `DELETE /applies/{id}`
#[derive(Clone)]
pub struct DeleteApplication {
    state: RequestState<Value>,
}

impl DeleteApplication {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Delete, base_url)),
        }
    }

    pub async fn delete(&self, id: ApplicationId) -> Option<Value> {
        let url = format!("{}/{}", APPLIES_ENDPOINT, id);
        self.state.send(RequestOverrides::default().url(url)).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<Value> {
        self.state.snapshot()
    }
}

/// `PUT /applies/{id}`: the backend flips the favourite flag.
#[derive(Clone)]
pub struct MarkFavourite {
    state: RequestState<Value>,
}

impl MarkFavourite {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Put, base_url)),
        }
    }

    pub async fn toggle(&self, id: ApplicationId) -> Option<Value> {
        let url = format!("{}/{}", APPLIES_ENDPOINT, id);
        self.state.send(RequestOverrides::default().url(url)).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<Value> {
        self.state.snapshot()
    }
}

/// `POST /interview/{id}` or `POST /interview/{id}/{lang}`
#[derive(Clone)]
pub struct RequestInterview {
    state: RequestState<Value>,
}

impl RequestInterview {
    pub fn new(transport: Arc<dyn Transport>, base_url: &str) -> Self {
        Self {
            state: RequestState::new(transport, RequestConfig::new(HttpMethod::Post, base_url)),
        }
    }

    pub async fn request(&self, id: ApplicationId, language: Option<Language>) -> Option<Value> {
        let url = match language {
            Some(lang) => format!("{}/{}/{}", INTERVIEW_ENDPOINT, id, lang.code()),
            None => format!("{}/{}", INTERVIEW_ENDPOINT, id),
        };
        self.state.send(RequestOverrides::default().url(url)).await
    }

    pub fn snapshot(&self) -> RequestSnapshot<Value> {
        self.state.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segment_encoding() {
        assert_eq!(path_segment("s-1", "share").unwrap(), "s-1");
        assert_eq!(path_segment("a/b", "share").unwrap(), "a%2Fb");
        assert_eq!(path_segment("x?y#z", "share").unwrap(), "x%3Fy%23z");
        assert_eq!(
            path_segment("..", "dashboard id"),
            Err(RequestError::MissingParameter("dashboard id"))
        );
        assert_eq!(
            path_segment(" ", "share"),
            Err(RequestError::MissingParameter("share"))
        );
    }
}

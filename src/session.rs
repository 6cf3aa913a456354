// src/session.rs
//! Application-level state shared by every screen: the loading flag and the
//! one dismissible notice. All user-facing errors end up here.

use serde::Serialize;
use std::fmt;

use crate::app_log;
use crate::core::RequestError;
use crate::validation::ValidationErrors;

/// Credentials of the dashboard being managed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSession {
    pub dashboard_id: String,
    pub access_token: String,
}

impl DashboardSession {
    pub fn new(dashboard_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            dashboard_id: dashboard_id.into(),
            access_token: access_token.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notice {
    Error(String),
    Success(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Error(message) | Notice::Success(message) => message,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Error(message) => write!(f, "Error: {}", message),
            Notice::Success(message) => f.write_str(message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub loading: bool,
    notice: Option<Notice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        app_log!(warn, "Reported error: {}", message);
        self.notice = Some(Notice::Error(message));
    }

    /// Report a failed request, falling back to `fallback` when the request
    /// state holds no error.
    pub fn report_request_error(&mut self, error: Option<RequestError>, fallback: &str) {
        match error {
            Some(error) => self.report_error(format!("{}: {}", fallback, error)),
            None => self.report_error(fallback),
        }
    }

    pub fn report_validation(&mut self, errors: &ValidationErrors) {
        self.report_error(errors.messages().join(" "));
    }

    pub fn report_success(&mut self, message: impl Into<String>) {
        let message = message.into();
        app_log!(info, "{}", message);
        self.notice = Some(Notice::Success(message));
    }

    pub fn dismiss(&mut self) -> Option<Notice> {
        self.notice.take()
    }
}

// src/types/response.rs
use serde::{Deserialize, Serialize};

use super::{json_text, Application, JobPost};

// ===== API Response Types =====

/// Responses come either wrapped as `{"data": ..., "message": ...}` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped {
        data: T,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data, .. } => data,
            Envelope::Bare(data) => data,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Envelope::Wrapped { message, .. } => message.as_deref(),
            Envelope::Bare(_) => None,
        }
    }
}

/// Payload of `GET /dashboard/{id}`: the post with its applications.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardData {
    #[serde(flatten)]
    pub post: JobPost,
    #[serde(
        default,
        alias = "applications",
        deserialize_with = "json_text::deserialize"
    )]
    pub applies: Vec<Application>,
}

// src/types/post.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::json_text;

pub type PostId = u64;

/// A job post as returned by the share and dashboard endpoints.
///
/// Owner secrets (`dashboard`, `access_token`) are only present on
/// responses addressed to the post owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobPost {
    pub id: PostId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, with = "json_text")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "json_text::number")]
    pub min_experience: f64,
    #[serde(default, deserialize_with = "json_text::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub share: Option<String>,
    #[serde(default)]
    pub dashboard: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

impl JobPost {
    pub fn posted_on(&self) -> Option<String> {
        self.created_at.map(|at| at.format("%Y-%m-%d").to_string())
    }
}

/// Body of `POST /posts`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewPost {
    /// The poster's AI provider key, forwarded to the backend as-is
    pub token: String,
    pub title: String,
    pub description: String,
    #[serde(serialize_with = "json_text::serialize")]
    pub skills: Vec<String>,
    pub city: String,
    pub min_experience: u32,
}

/// Response of `POST /posts`: the identifiers the owner must keep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedPost {
    #[serde(default)]
    pub id: Option<PostId>,
    #[serde(default)]
    pub title: Option<String>,
    pub share: String,
    pub dashboard: String,
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_post_from_api() {
        let post: JobPost = serde_json::from_str(
            r#"{
                "id": 4,
                "title": "Backend Engineer",
                "description": "Build services",
                "skills": "[\"Go\",\"Rust\"]",
                "city": "Lyon",
                "min_experience": "3",
                "created_at": "2025-05-07T10:00:00.000000Z",
                "share": "abc123"
            }"#,
        )
        .unwrap();

        assert_eq!(post.skills, vec!["Go", "Rust"]);
        assert_eq!(post.min_experience, 3.0);
        assert_eq!(post.posted_on().as_deref(), Some("2025-05-07"));
        assert!(post.access_token.is_none());
    }

    #[test]
    fn test_new_post_serializes_skills_as_text() {
        let body = serde_json::to_value(NewPost {
            token: "key".into(),
            title: "Engineer".into(),
            description: "desc".into(),
            skills: vec!["Rust".into()],
            city: "Paris".into(),
            min_experience: 2,
        })
        .unwrap();

        assert_eq!(body["skills"], "[\"Rust\"]");
        assert_eq!(body["min_experience"], 2);
    }
}

// src/types/application.rs
use serde::{Deserialize, Serialize};

use super::json_text;

pub type ApplicationId = u64;

/// One applicant on a dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Application {
    pub id: ApplicationId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub resume_path: Option<String>,
    #[serde(default, deserialize_with = "json_text::flag")]
    pub is_favorite: bool,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub detail: ApplicationDetail,
}

/// AI analysis of an applicant. Missing fields default to zero so a
/// partially scored applicant still shows up.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ApplicationDetail {
    /// Fraction of required skills matched, in `[0, 1]`
    #[serde(default, deserialize_with = "json_text::number")]
    pub skills_match: f64,
    /// Overall score in `[0, 10]`
    #[serde(default, deserialize_with = "json_text::number")]
    pub ai_score: f64,
    /// Years of experience
    #[serde(default, deserialize_with = "json_text::number")]
    pub experience: f64,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub ai_summary: Option<String>,
    #[serde(default, deserialize_with = "json_text::deserialize")]
    pub interview: Interview,
}

/// Generated interview. Either empty or fully populated; the backend never
/// exposes a half-generated interview.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Interview {
    #[serde(default)]
    pub questions: Vec<QuestionAnswer>,
}

impl Interview {
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionAnswer {
    pub question: String,
    pub answer: String,
}

impl Application {
    pub fn has_interview(&self) -> bool {
        !self.detail.interview.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_as_json_text() {
        let app: Application = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "phone": "0612345678",
                "resume_path": "resumes/ada.pdf",
                "is_favorite": 0,
                "detail": "{\"skills_match\":0.8,\"ai_score\":9,\"experience\":6,\"skills\":[\"Rust\"],\"ai_summary\":\"Strong\",\"interview\":{}}"
            }"#,
        )
        .unwrap();

        assert!(!app.is_favorite);
        assert_eq!(app.detail.ai_score, 9.0);
        assert_eq!(app.detail.skills, vec!["Rust"]);
        assert!(!app.has_interview());
    }

    #[test]
    fn test_interview_populated() {
        let app: Application = serde_json::from_str(
            r#"{
                "id": 2,
                "name": "Linus",
                "is_favorite": true,
                "detail": {
                    "interview": {"questions": [{"question": "Why C?", "answer": "Speed"}]}
                }
            }"#,
        )
        .unwrap();

        assert!(app.is_favorite);
        assert!(app.has_interview());
        assert_eq!(app.detail.interview.len(), 1);
        assert_eq!(app.detail.skills_match, 0.0);
    }

    #[test]
    fn test_missing_detail_defaults() {
        let app: Application = serde_json::from_str(r#"{"id": 3, "name": "Grace", "detail": null}"#).unwrap();
        assert_eq!(app.detail, ApplicationDetail::default());
    }
}

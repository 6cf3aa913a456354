// src/links.rs
use serde::Serialize;

use crate::routes::Route;
use crate::types::{CreatedPost, JobPost};

/// The links a post owner receives after publishing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareLinks {
    /// Public link candidates use to apply
    pub apply_link: String,
    /// Private link to the recruiter dashboard
    pub dashboard_link: String,
    /// Secret needed by every dashboard call; shown once, keep it safe
    pub access_token: Option<String>,
}

impl ShareLinks {
    pub fn new(app_url: &str, share: &str, dashboard: &str, access_token: Option<String>) -> Self {
        Self {
            apply_link: Route::Apply {
                share: share.to_string(),
            }
            .url(app_url),
            dashboard_link: Route::Dashboard {
                dashboard: dashboard.to_string(),
            }
            .url(app_url),
            access_token,
        }
    }

    pub fn from_created(app_url: &str, created: &CreatedPost) -> Self {
        Self::new(
            app_url,
            &created.share,
            &created.dashboard,
            Some(created.access_token.clone()),
        )
    }

    /// Links for a fetched post. `None` unless the response carried the
    /// owner-only identifiers.
    pub fn from_post(app_url: &str, post: &JobPost) -> Option<Self> {
        let share = post.share.as_deref()?;
        let dashboard = post.dashboard.as_deref()?;
        Some(Self::new(app_url, share, dashboard, post.access_token.clone()))
    }

    /// Dashboard link with the token appended, for bookmarking.
    pub fn dashboard_link_with_token(&self) -> String {
        match &self.access_token {
            Some(token) => format!("{}?access_token={}", self.dashboard_link, token),
            None => self.dashboard_link.clone(),
        }
    }
}

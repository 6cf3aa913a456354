// src/core/service_client.rs
//! Entry point to the recruitment API: hands out one resource client per call site.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use super::resources::{
    CreatePost, DeleteApplication, DeletePost, GetDashboard, GetPostByShare, MarkFavourite,
    RequestInterview, SubmitApplication,
};
use super::transport::{ReqwestTransport, Transport};
use crate::app_log;
use crate::environment::EnvironmentConfig;

const STORAGE_PATH: &str = "/storage";

#[derive(Clone)]
pub struct ServiceClient {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl ServiceClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            transport,
            base_url,
        }
    }

    /// Create a client over reqwest from loaded configuration
    pub fn from_config(config: &EnvironmentConfig) -> Result<Self> {
        let timeout = config.timeout_seconds.map(Duration::from_secs);
        let transport = ReqwestTransport::new(timeout)?;
        app_log!(info, "Recruitment API: {}", config.api_url);
        Ok(Self::new(Arc::new(transport), config.api_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn create_post(&self) -> CreatePost {
        CreatePost::new(self.transport(), &self.base_url)
    }

    pub fn post_by_share(&self, share: &str) -> GetPostByShare {
        GetPostByShare::new(self.transport(), &self.base_url, share)
    }

    pub fn dashboard(&self, dashboard_id: &str, access_token: &str) -> GetDashboard {
        GetDashboard::new(self.transport(), &self.base_url, dashboard_id, access_token)
    }

    pub fn delete_post(&self) -> DeletePost {
        DeletePost::new(self.transport(), &self.base_url)
    }

    pub fn submit_application(&self) -> SubmitApplication {
        SubmitApplication::new(self.transport(), &self.base_url)
    }

    pub fn delete_application(&self) -> DeleteApplication {
        DeleteApplication::new(self.transport(), &self.base_url)
    }

    pub fn mark_favourite(&self) -> MarkFavourite {
        MarkFavourite::new(self.transport(), &self.base_url)
    }

    pub fn request_interview(&self) -> RequestInterview {
        RequestInterview::new(self.transport(), &self.base_url)
    }

    /// Public URL of an uploaded resume.
    pub fn resume_url(&self, resume_path: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url,
            STORAGE_PATH,
            resume_path.trim_start_matches('/')
        )
    }
}

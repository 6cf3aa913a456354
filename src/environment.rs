// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::logging::DEFAULT_LOG_FILE;

pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";
const DEFAULT_APP_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvironmentConfig {
    /// Base URL of the recruitment API, without trailing slash
    #[serde(default)]
    pub api_url: String,
    /// Public URL of the web front end, used to build shareable links
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// No timeout when unset: a hung request stays in flight
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// Yaml file the settings came from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

fn default_app_url() -> String {
    DEFAULT_APP_URL.to_string()
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            app_url: default_app_url(),
            timeout_seconds: None,
            log_file: None,
            source: None,
        }
    }
}

impl EnvironmentConfig {
    /// Load configuration for the current environment.
    ///
    /// The yaml file is optional; without it `HIREFLOW_API_URL` must be set.
    /// Nothing is logged here: logging is initialised from the result.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let environment = Self::get_environment();

        let path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let mut config = Self::from_yaml_str(&content, &environment)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            config.source = Some(path);
            config
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        } else {
            Self::default()
        };

        base.with_overrides(|key| std::env::var(key).ok())
            .finish()
    }

    pub fn get_environment() -> String {
        std::env::var("HIREFLOW_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    /// Pick the section matching `environment` from a yaml document.
    pub fn from_yaml_str(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Invalid configuration yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }

    /// Apply `HIREFLOW_*` overrides from the given lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("HIREFLOW_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url;
        }
        if let Some(url) = lookup("HIREFLOW_APP_URL").filter(|v| !v.trim().is_empty()) {
            self.app_url = url;
        }
        if let Some(secs) = lookup("HIREFLOW_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.timeout_seconds = Some(secs);
        }
        self
    }

    /// Normalise URLs and check that an API URL is present.
    pub fn finish(mut self) -> Result<Self> {
        self.api_url = self.api_url.trim().trim_end_matches('/').to_string();
        self.app_url = self.app_url.trim().trim_end_matches('/').to_string();

        if self.api_url.is_empty() {
            anyhow::bail!(
                "API URL not configured. Set api_url in {} or HIREFLOW_API_URL",
                DEFAULT_CONFIG_FILE
            );
        }

        Ok(self)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

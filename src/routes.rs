// src/routes.rs
//! Client-side routes of the web app and parsing of pasted dashboard links.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use std::fmt;
use std::str::FromStr;

const PARSE_BASE: &str = "http://hireflow.invalid/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Post,
    Apply { share: String },
    Dashboard { dashboard: String },
    Links { share: String },
}

impl Route {
    /// Parse a path (`/apply/abc`) or a full app URL.
    pub fn parse(input: &str) -> Result<Self> {
        let url = parse_url(input)?;
        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["post"] => Route::Post,
            ["apply", share] => Route::Apply {
                share: share.to_string(),
            },
            ["dashboard", dashboard] => Route::Dashboard {
                dashboard: dashboard.to_string(),
            },
            ["links", share] => Route::Links {
                share: share.to_string(),
            },
            _ => bail!("Unknown route: {}", url.path()),
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Post => "/post".to_string(),
            Route::Apply { share } => format!("/apply/{}", share),
            Route::Dashboard { dashboard } => format!("/dashboard/{}", dashboard),
            Route::Links { share } => format!("/links/{}", share),
        }
    }

    /// Absolute URL of this route under `app_url`.
    pub fn url(&self, app_url: &str) -> String {
        format!("{}{}", app_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Route::parse(s)
    }
}

/// Dashboard given on the command line: a bare id or a pasted dashboard URL,
/// optionally carrying `?access_token=`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRef {
    pub dashboard_id: String,
    pub access_token: Option<String>,
}

impl FromStr for DashboardRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let input = s.trim();
        if input.is_empty() {
            bail!("Dashboard id is empty");
        }
        if !input.contains('/') && !input.contains('?') {
            return Ok(Self {
                dashboard_id: input.to_string(),
                access_token: None,
            });
        }

        let url = parse_url(input)?;
        let dashboard_id = match Route::parse(url.as_str())? {
            Route::Dashboard { dashboard } => dashboard,
            other => bail!("Not a dashboard link: {}", other),
        };
        let access_token = url
            .query_pairs()
            .find(|(key, _)| key == "access_token")
            .map(|(_, value)| value.into_owned())
            .filter(|token| !token.is_empty());

        Ok(Self {
            dashboard_id,
            access_token,
        })
    }
}

fn parse_url(input: &str) -> Result<Url> {
    let input = input.trim();
    if input.starts_with("http://") || input.starts_with("https://") {
        return Url::parse(input).with_context(|| format!("Invalid URL: {}", input));
    }
    let base = Url::parse(PARSE_BASE).context("Invalid parse base")?;
    base.join(input)
        .with_context(|| format!("Invalid path: {}", input))
}

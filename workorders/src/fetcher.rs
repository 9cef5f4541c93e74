//! HTTP resource fetcher for the field-service app REST API
//!
//! Issues a single authenticated GET and decodes the body as JSON. It knows
//! nothing about what the resources mean; retries and caching live elsewhere
//! (there are no retries).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::ClientConfig;

/// Transport-level failure. Never retried, never interpreted.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Authentication failed (401) for {url}. Check WORKORDERS_TOKEN")]
    AuthFailed { url: String },
    #[error("Permission denied (403) for {url}")]
    PermissionDenied { url: String },
    #[error("HTTP {status} for {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },
    #[error("Invalid base URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
    #[error("Invalid JSON from {url}: {message}")]
    InvalidJson { url: String, message: String },
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// One GET, one JSON document.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError>;
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// URL templates for one organization and site.
///
/// Ids are pushed as single percent-encoded path segments, so an id holding
/// `/`, `?` or `#` can never address another resource. Every URL ends with
/// the trailing slash the API expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(host: &str, api_prefix: &str, org: &str, site: &str) -> Result<Self, FetchError> {
        // Normalize host - ensure it has https:// prefix
        let host = if host.starts_with("https://") || host.starts_with("http://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        let invalid = |message: String| FetchError::InvalidUrl {
            url: host.clone(),
            message,
        };

        let mut base = Url::parse(&host).map_err(|e| invalid(e.to_string()))?;
        base.path_segments_mut()
            .map_err(|_| invalid("cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(api_prefix.split('/').filter(|s| !s.is_empty()))
            .extend(["orgs", org, "sites", site]);

        Ok(Self { base })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(&config.host, &config.api_prefix, &config.org, &config.site)
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        // `new` only accepts http(s) URLs, which always carry a path
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments).push("");
        }
        url.into()
    }

    pub fn work_orders(&self) -> String {
        self.url(&["work-orders"])
    }

    pub fn app_version(&self, app_version_id: &str) -> String {
        self.url(&["versions", app_version_id])
    }

    pub fn task_groups(&self, app_version_id: &str) -> String {
        self.url(&["versions", app_version_id, "task-groups"])
    }

    pub fn task_group(&self, app_version_id: &str, task_group_id: &str) -> String {
        self.url(&["versions", app_version_id, "task-groups", task_group_id])
    }

    pub fn work_order_types(&self, app_version_id: &str) -> String {
        self.url(&["versions", app_version_id, "work-order-types"])
    }

    pub fn analyses(&self, work_order_id: &str, task_group_id: &str) -> String {
        self.url(&[
            "work-orders",
            work_order_id,
            "task-groups",
            task_group_id,
            "analyses",
        ])
    }
}

// ---------------------------------------------------------------------------
// HTTP implementation
// ---------------------------------------------------------------------------

/// reqwest-backed fetcher sending `Authorization: Token <token>`.
pub struct HttpFetcher {
    client: reqwest::Client,
    token: String,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl HttpFetcher {
    pub fn new(token: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            token: token.into(),
        })
    }

    fn map_http_error(status: StatusCode, url: &str, body: String) -> FetchError {
        warn!(
            "API error: HTTP {} on {}: {}",
            status.as_u16(),
            url,
            body
        );
        match status {
            StatusCode::UNAUTHORIZED => FetchError::AuthFailed {
                url: url.to_string(),
            },
            StatusCode::FORBIDDEN => FetchError::PermissionDenied {
                url: url.to_string(),
            },
            _ => FetchError::Http {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            },
        }
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, FetchError> {
        debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", self.token))
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(Self::map_http_error(status, url, body));
        }

        serde_json::from_str(&body).map_err(|e| FetchError::InvalidJson {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Scripted fetcher for tests
// ---------------------------------------------------------------------------


// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

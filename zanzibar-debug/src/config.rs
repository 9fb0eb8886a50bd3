use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{DebugError, Result};

/// Connection settings for the expansion service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the authorization API, e.g. `http://localhost:8080`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub store_id: String,
    /// Sent as a bearer token when present
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl ClientConfig {
    pub fn new(base_url: &str, store_id: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            store_id: store_id.to_string(),
            api_token: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Full URL of the expand endpoint
    pub fn expand_url(&self) -> String {
        format!(
            "{}/stores/{}/expand",
            self.base_url.trim_end_matches('/'),
            self.store_id
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.store_id.trim().is_empty() {
            return Err(DebugError::InvalidConfig("store_id must not be empty".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(DebugError::InvalidConfig(format!(
                "base_url must be an http(s) URL, got {}",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DebugError::InvalidConfig(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Recursion control for the tree expander
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpanderConfig {
    /// Last expansion level that may issue calls. `None` relies on the
    /// authorization model being acyclic.
    #[serde(default)]
    pub max_depth: Option<u32>,
    /// Expand each `(object, relation)` pair at most once per run
    #[serde(default = "default_dedupe_calls")]
    pub dedupe_calls: bool,
    /// Wall-clock budget for a whole run, in milliseconds
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

fn default_dedupe_calls() -> bool {
    true
}

impl Default for ExpanderConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            dedupe_calls: default_dedupe_calls(),
            deadline_ms: None,
        }
    }
}

impl ExpanderConfig {
    pub fn with_max_depth(mut self, max_depth: Option<u32>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_dedupe(mut self, enabled: bool) -> Self {
        self.dedupe_calls = enabled;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline_ms = deadline.map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}

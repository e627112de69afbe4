//! Transport configuration.

use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};

/// Where the shared message list lives and how to append to it.
///
/// Messages are read from a raw JSON file in a GitHub repository and
/// appended by a workflow that listens for `repository_dispatch` events.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Repository owner (user or organisation).
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Branch holding the message list.
    pub branch: String,

    /// Path of the JSON array of tokens within the repository.
    pub messages_path: String,

    /// `event_type` sent with each dispatch; the workflow filters on it.
    pub event_type: String,

    /// Base URL for raw file content.
    pub raw_base_url: String,

    /// Base URL for the GitHub REST API.
    pub api_base_url: String,

    /// Optional token for dispatch, if the workflow requires one.
    pub token: Option<String>,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            owner: "tufbyte".to_string(),
            repo: "furina".to_string(),
            branch: "main".to_string(),
            messages_path: "messages.json".to_string(),
            event_type: "update-messages".to_string(),
            raw_base_url: "https://raw.githubusercontent.com".to_string(),
            api_base_url: "https://api.github.com".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

impl TransportConfig {
    /// Defaults overlaid with `FURINA_*` environment variables.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Overrides fields from a key lookup (environment, config file, ...).
    ///
    /// Empty values are ignored.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("FURINA_GITHUB_OWNER") {
            self.owner = v;
        }
        if let Some(v) = get("FURINA_GITHUB_REPO") {
            self.repo = v;
        }
        if let Some(v) = get("FURINA_GITHUB_BRANCH") {
            self.branch = v;
        }
        if let Some(v) = get("FURINA_MESSAGES_PATH") {
            self.messages_path = v;
        }
        if let Some(v) = get("FURINA_EVENT_TYPE") {
            self.event_type = v;
        }
        if let Some(v) = get("FURINA_RAW_BASE_URL") {
            self.raw_base_url = v;
        }
        if let Some(v) = get("FURINA_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = get("FURINA_GITHUB_TOKEN") {
            self.token = Some(v);
        }
        if let Some(secs) = get("FURINA_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = secs;
        }
        self
    }

    /// Rejects configurations that cannot produce valid URLs.
    pub fn validate(&self) -> TransportResult<()> {
        for (name, value) in [
            ("owner", &self.owner),
            ("repo", &self.repo),
            ("branch", &self.branch),
            ("messages_path", &self.messages_path),
            ("event_type", &self.event_type),
        ] {
            if value.trim().is_empty() {
                return Err(TransportError::Config(format!("missing {name}")));
            }
        }
        if self.timeout_secs == 0 {
            return Err(TransportError::Config(
                "timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// URL of the raw message list.
    pub fn messages_url(&self) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.raw_base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch,
            self.messages_path.trim_start_matches('/'),
        )
    }

    /// URL of the `repository_dispatch` endpoint.
    pub fn dispatch_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/dispatches",
            self.api_base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
        )
    }
}

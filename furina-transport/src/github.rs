//! GitHub-backed transport.
//!
//! Reads the token list from a raw `messages.json` file and appends by
//! firing a `repository_dispatch` event. A workflow in the repository
//! commits the dispatched token, so new tokens appear after a delay.

use crate::config::TransportConfig;
use crate::error::{TransportError, TransportResult};
use crate::transport::MessageTransport;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Serialize)]
struct DispatchRequest<'a> {
    event_type: &'a str,
    client_payload: DispatchPayload<'a>,
}

#[derive(Serialize)]
struct DispatchPayload<'a> {
    encrypted: &'a str,
}

/// HTTP client for the GitHub raw content and dispatch endpoints.
pub struct GitHubTransport {
    client: Client,
    config: TransportConfig,
}

impl GitHubTransport {
    pub fn new(config: TransportConfig) -> TransportResult<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("furina/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }
}

/// Extracts string entries from the fetched list.
///
/// Anything other than a JSON array is treated as an empty list, matching
/// a freshly created repository whose `messages.json` is not yet an array.
fn tokens_from_json(body: Value) -> Vec<String> {
    match body {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::String(token) => Some(token),
                other => {
                    warn!("skipping non-string entry #{index} in message list: {other}");
                    None
                }
            })
            .collect(),
        other => {
            warn!("message list is not a JSON array ({}), treating as empty", kind(&other));
            Vec::new()
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl MessageTransport for GitHubTransport {
    async fn fetch_tokens(&self) -> TransportResult<Vec<String>> {
        let url = self.config.messages_url();
        debug!("fetching message list from {url}");

        let resp = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Fetch {
                status: status.as_u16(),
            });
        }

        let body: Value = serde_json::from_slice(&resp.bytes().await?)?;
        let tokens = tokens_from_json(body);
        debug!("fetched {} tokens", tokens.len());
        Ok(tokens)
    }

    async fn submit_token(&self, token: &str) -> TransportResult<()> {
        let url = self.config.dispatch_url();
        let body = DispatchRequest {
            event_type: &self.config.event_type,
            client_payload: DispatchPayload { encrypted: token },
        };

        let mut req = self.client.post(&url).header(ACCEPT, GITHUB_ACCEPT).json(&body);
        if let Some(gh_token) = &self.config.token {
            req = req.bearer_auth(gh_token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if status == StatusCode::NO_CONTENT || status == StatusCode::ACCEPTED {
            info!("message dispatched ({} byte token)", token.len());
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        warn!("dispatch failed with status {status}");
        Err(TransportError::Dispatch {
            status: status.as_u16(),
            body,
        })
    }
}

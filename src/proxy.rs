//! Request proxy between the add-in and the remote AI service.
//!
//! The proxy enforces presence of a caller credential, validates the fields
//! each logical operation needs, routes the operation to its fixed remote
//! endpoint with a bounded timeout, and collapses every transport or remote
//! failure into the stable taxonomy in [`crate::errors`]. It performs no
//! retries and keeps no per-request state; retry policy belongs to the caller.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AssistError;

const DEFAULT_BASE_URL: &str = "https://api.scribemate.dev";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;
const HEALTH_TIMEOUT_MS: u64 = 5_000;
const CLIENT_USER_AGENT: &str = "ScribeMate-Addin/0.1.0";

/// Logical operations the proxy knows how to route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    Analyze,
    Generate,
    ProcessDocument,
    Health,
}

impl Operation {
    pub fn remote_path(self) -> &'static str {
        match self {
            Self::Analyze => "/analyze",
            Self::Generate => "/generate",
            Self::ProcessDocument => "/process-document",
            Self::Health => "/health",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.remote_path().trim_start_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Health probes gate interactive credential validation and must fail fast.
    pub health_timeout: Duration,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            health_timeout: Duration::from_millis(HEALTH_TIMEOUT_MS),
        }
    }
}

impl ProxyConfig {
    /// Configuration from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(base_url) = std::env::var("SCRIBEMATE_AI_BASE_URL") {
            if !base_url.trim().is_empty() {
                config.base_url = base_url;
            }
        }
        if let Some(ms) = std::env::var("SCRIBEMATE_AI_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
        {
            config.timeout = Duration::from_millis(ms);
        }
        config
    }
}

/// HTTP-style reply surfaced to the UI shell: a status code plus either the
/// remote body (passthrough) or an `{ error, message }` failure body.
#[derive(Debug, Clone, Serialize)]
pub struct ProxyReply {
    pub status: u16,
    pub body: Value,
}

impl ProxyReply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn error(err: &AssistError, health: bool) -> Self {
        let status = if health && matches!(err, AssistError::Unreachable) {
            503
        } else {
            err.http_status()
        };
        Self {
            status,
            body: json!({ "error": err.kind(), "message": err.detail() }),
        }
    }

    pub fn from_result(result: Result<Value, AssistError>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(err) => Self::error(&err, false),
        }
    }

    /// Like [`from_result`](Self::from_result), but an unreachable remote maps
    /// to 503 since the health endpoint reports service availability.
    pub fn for_health(result: Result<Value, AssistError>) -> Self {
        match result {
            Ok(body) => Self::ok(body),
            Err(err) => Self::error(&err, true),
        }
    }
}

pub struct AiProxy {
    client: Client,
    config: ProxyConfig,
}

impl AiProxy {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()
            .context("failed to construct HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Route one logical operation to the remote service.
    ///
    /// The credential check runs before any validation or network call; field
    /// validation runs before the request is issued. On success the remote
    /// body is returned unmodified.
    pub async fn handle(
        &self,
        operation: Operation,
        credential: Option<&str>,
        body: Value,
    ) -> Result<Value, AssistError> {
        let credential =
            resolve_credential(credential, &body).ok_or(AssistError::Unauthenticated)?;
        let payload = shape_request(operation, &body)?;
        let timeout = if operation == Operation::Health {
            self.config.health_timeout
        } else {
            self.config.timeout
        };
        self.dispatch(operation.remote_path(), &credential, payload, timeout)
            .await
    }

    /// Generic passthrough for remote endpoints not otherwise enumerated. The
    /// body is forwarded as-is; the health path keeps its short fixed timeout.
    pub async fn forward(
        &self,
        subpath: &str,
        credential: Option<&str>,
        body: Value,
    ) -> Result<Value, AssistError> {
        if !subpath.starts_with('/') {
            return Err(AssistError::InvalidRequest("path".to_string()));
        }
        let credential =
            resolve_credential(credential, &body).ok_or(AssistError::Unauthenticated)?;
        let (payload, timeout) = if subpath == "/health" {
            (None, self.config.health_timeout)
        } else {
            (Some(body), self.config.timeout)
        };
        self.dispatch(subpath, &credential, payload, timeout).await
    }

    async fn dispatch(
        &self,
        path: &str,
        credential: &str,
        payload: Option<Value>,
        timeout: Duration,
    ) -> Result<Value, AssistError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let request = match &payload {
            Some(body) => self.client.post(&url).json(body),
            None => self.client.get(&url),
        };

        let response = request
            .bearer_auth(credential)
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| {
                let classified = classify_transport(&err);
                log::warn!(target: "ai.proxy", "remote call to {path} failed: {err}");
                classified
            })?;

        let status = response.status();
        if status.is_success() {
            let text = response
                .text()
                .await
                .map_err(|err| classify_transport(&err))?;
            // Passthrough: non-JSON success bodies are surfaced as a string value.
            Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        } else {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            Err(AssistError::RemoteRejected {
                status: status.as_u16(),
                message: remote_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string()),
            })
        }
    }
}

/// The credential arrives either explicitly (header-style) or as the body's
/// `apiKey` field.
fn resolve_credential(explicit: Option<&str>, body: &Value) -> Option<String> {
    explicit
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| {
            body.get("apiKey")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
        })
        .map(String::from)
}

/// Validate the operation's required fields and build the outbound payload
/// with that operation's default options. Health carries no body and is
/// issued as a GET.
fn shape_request(operation: Operation, body: &Value) -> Result<Option<Value>, AssistError> {
    match operation {
        Operation::Health => Ok(None),
        Operation::Analyze => {
            let text = required_field(body, "text")?;
            Ok(Some(json!({
                "text": text,
                "type": optional_field(body, "analysisType").unwrap_or("general"),
                "options": {
                    "includeSentiment": true,
                    "includeKeywords": true,
                    "includeSummary": true,
                },
            })))
        }
        Operation::Generate => {
            let prompt = required_field(body, "prompt")?;
            Ok(Some(json!({
                "prompt": prompt,
                "type": optional_field(body, "contentType").unwrap_or("text"),
                "context": body.get("context").cloned().unwrap_or(Value::Null),
                "options": {
                    "maxLength": 1000,
                    "temperature": 0.7,
                    "includeMetadata": true,
                },
            })))
        }
        Operation::ProcessDocument => {
            let content = required_field(body, "content")?;
            let operation_kind = required_field(body, "operation")?;
            Ok(Some(json!({
                "content": content,
                "documentType": body.get("documentType").cloned().unwrap_or(Value::Null),
                "operation": operation_kind,
                "options": {
                    "preserveFormatting": true,
                    "includeSuggestions": true,
                },
            })))
        }
    }
}

fn required_field<'a>(body: &'a Value, name: &str) -> Result<&'a str, AssistError> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AssistError::InvalidRequest(name.to_string()))
}

fn optional_field<'a>(body: &'a Value, name: &str) -> Option<&'a str> {
    body.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Best-effort extraction of the remote's error detail; the remote error
/// schema is not guaranteed to carry a `message` field.
fn remote_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .map(String::from)
}

fn classify_transport(err: &reqwest::Error) -> AssistError {
    if err.is_timeout() {
        AssistError::Timeout
    } else {
        AssistError::Unreachable
    }
}

//! Version 1 of the Tauri IPC API.
//!
//! Commands are intentionally thin wrappers that validate input, execute work
//! on background threads where needed, and return JSON-friendly payloads to
//! the UI. Proxy-backed commands answer with an HTTP-style [`ProxyReply`] so
//! the frontend can branch on the status code the same way it would against
//! the remote service directly.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};
use tauri::State;
use time::OffsetDateTime;
use tokio::task::spawn_blocking;

use crate::db::DbPool;
use crate::errors::AssistError;
use crate::hosts::HostAdapter;
use crate::logging::log_event;
use crate::proxy::{AiProxy, Operation, ProxyReply};
use crate::session;

/// Shared state injected into each Tauri command handler.
#[derive(Clone)]
pub struct ApiState {
    pub db: DbPool,
    pub proxy: Arc<AiProxy>,
    pub host: Arc<dyn HostAdapter>,
}

/// Simple health-check endpoint for UI components.
#[tauri::command]
pub fn ping() -> Value {
    json!({
        "ok": true,
        "ts": OffsetDateTime::now_utc().unix_timestamp(),
    })
}

/// Report the active host kind and the cached-credential status.
#[tauri::command]
pub fn session_status(state: State<ApiState>) -> Result<Value, String> {
    let conn = state.db.get().map_err(|e| e.to_string())?;
    let credential = session::credential_status(&conn).map_err(|e| e.to_string())?;
    Ok(json!({
        "host": state.host.kind(),
        "credential": credential,
    }))
}

/// Validate an API key against the remote health endpoint and cache it for
/// the session on success. The health probe uses the short timeout so a bad
/// key or an unreachable service fails fast in the auth dialog.
#[tauri::command]
pub async fn authenticate(
    state: State<'_, ApiState>,
    api_key: String,
) -> Result<ProxyReply, String> {
    authenticate_flow(&state.db, &state.proxy, &api_key).await
}

/// Drop the cached credential for this session.
#[tauri::command]
pub fn clear_credential(state: State<ApiState>) -> Result<(), String> {
    let conn = state.db.get().map_err(|e| e.to_string())?;
    session::clear_credential(&conn).map_err(|e| e.to_string())?;
    log_event(
        &conn,
        "info",
        Some("AUTH-0201"),
        "session",
        "credential cleared",
        None,
        None,
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

/// Read the host's current selection; empty text is a normal outcome that the
/// UI turns into a "select something first" hint.
#[tauri::command]
pub async fn get_selection(state: State<'_, ApiState>) -> Result<Value, String> {
    match state.host.get_selection().await {
        Ok(text) => Ok(json!({
            "host": state.host.kind(),
            "text": text,
        })),
        Err(err) => {
            audit_host_failure(&state.db, "get_selection", &err);
            Err(err.to_string())
        }
    }
}

/// Write AI output back over the host's current selection.
#[tauri::command]
pub async fn insert_result(state: State<'_, ApiState>, text: String) -> Result<(), String> {
    match state.host.replace_selection(&text).await {
        Ok(()) => Ok(()),
        Err(err) => {
            audit_host_failure(&state.db, "insert_result", &err);
            Err(err.to_string())
        }
    }
}

#[derive(Deserialize)]
pub struct GenerateInput {
    pub prompt: String,
    pub context: String,
    pub content_type: Option<String>,
}

/// Run the selected content and the user's instruction through the generate
/// operation.
#[tauri::command]
pub async fn ai_generate(
    state: State<'_, ApiState>,
    input: GenerateInput,
) -> Result<ProxyReply, String> {
    let body = match generate_body(&input) {
        Ok(body) => body,
        Err(err) => return Ok(ProxyReply::error(&err, false)),
    };
    dispatch_ai(&state.db, &state.proxy, Operation::Generate, body).await
}

#[derive(Deserialize)]
pub struct AnalyzeInput {
    pub text: String,
    pub analysis_type: Option<String>,
}

/// Analyze the selected content for sentiment, keywords and a summary.
#[tauri::command]
pub async fn ai_analyze(
    state: State<'_, ApiState>,
    input: AnalyzeInput,
) -> Result<ProxyReply, String> {
    dispatch_ai(
        &state.db,
        &state.proxy,
        Operation::Analyze,
        analyze_body(&input),
    )
    .await
}

#[derive(Deserialize)]
pub struct ProcessDocumentInput {
    pub content: String,
    pub operation: String,
    pub document_type: Option<String>,
}

/// Apply a named document operation (improve, summarize, ...) to the content.
#[tauri::command]
pub async fn ai_process_document(
    state: State<'_, ApiState>,
    input: ProcessDocumentInput,
) -> Result<ProxyReply, String> {
    dispatch_ai(
        &state.db,
        &state.proxy,
        Operation::ProcessDocument,
        process_document_body(&input),
    )
    .await
}

/// Probe the remote AI service with the cached credential, reporting the
/// connected/disconnected shape the status panel expects.
#[tauri::command]
pub async fn ai_health(state: State<'_, ApiState>) -> Result<ProxyReply, String> {
    let credential = load_credential(&state.db).await?;
    match state
        .proxy
        .handle(Operation::Health, credential.as_deref(), json!({}))
        .await
    {
        Ok(remote) => Ok(ProxyReply::ok(json!({
            "status": "connected",
            "remote": remote,
        }))),
        Err(err) => {
            audit_proxy_failure(&state.db, Operation::Health.remote_path(), &err);
            Ok(disconnected_reply(err))
        }
    }
}

#[derive(Deserialize)]
pub struct ForwardInput {
    pub path: String,
    pub body: Option<Value>,
}

/// Forward a request to a remote endpoint not covered by the named commands.
#[tauri::command]
pub async fn ai_request(
    state: State<'_, ApiState>,
    input: ForwardInput,
) -> Result<ProxyReply, String> {
    let credential = load_credential(&state.db).await?;
    let result = state
        .proxy
        .forward(
            &input.path,
            credential.as_deref(),
            input.body.unwrap_or_else(|| json!({})),
        )
        .await;
    if let Err(err) = &result {
        audit_proxy_failure(&state.db, &input.path, err);
    }
    Ok(ProxyReply::from_result(result))
}

/// Controller half of the authentication workflow, kept free of Tauri types.
async fn authenticate_flow(
    db: &DbPool,
    proxy: &AiProxy,
    api_key: &str,
) -> Result<ProxyReply, String> {
    let key = api_key.trim().to_string();
    if key.is_empty() {
        return Ok(ProxyReply::error(
            &AssistError::InvalidRequest("apiKey".to_string()),
            false,
        ));
    }

    let probe = proxy.handle(Operation::Health, Some(&key), json!({})).await;
    match probe {
        Ok(remote) => {
            let pool = db.clone();
            let stored = key.clone();
            spawn_blocking(move || -> Result<(), String> {
                let conn = pool.get().map_err(|e| e.to_string())?;
                session::cache_credential(&conn, &stored).map_err(|e| e.to_string())?;
                let _ = log_event(
                    &conn,
                    "info",
                    Some("AUTH-0200"),
                    "session",
                    "credential validated and cached",
                    Some("remote health check succeeded"),
                    Some(json!({ "fingerprint": session::fingerprint(&stored) })),
                );
                Ok(())
            })
            .await
            .map_err(|e| e.to_string())??;
            Ok(ProxyReply::ok(json!({
                "status": "connected",
                "remote": remote,
            })))
        }
        Err(err) => {
            audit_proxy_failure(db, Operation::Health.remote_path(), &err);
            Ok(disconnected_reply(err))
        }
    }
}

/// The workflow invariant lives here: selection content and instruction are
/// both required before a request is built, so the proxy never sees an empty
/// generate call from the UI flow.
fn generate_body(input: &GenerateInput) -> Result<Value, AssistError> {
    let prompt = input.prompt.trim();
    if prompt.is_empty() {
        return Err(AssistError::InvalidRequest("prompt".to_string()));
    }
    let context = input.context.trim();
    if context.is_empty() {
        return Err(AssistError::InvalidRequest("context".to_string()));
    }
    Ok(json!({
        "prompt": prompt,
        "context": context,
        "contentType": input.content_type.clone().unwrap_or_else(|| "text".to_string()),
    }))
}

fn analyze_body(input: &AnalyzeInput) -> Value {
    let mut body = json!({ "text": input.text });
    if let Some(kind) = &input.analysis_type {
        body["analysisType"] = json!(kind);
    }
    body
}

fn process_document_body(input: &ProcessDocumentInput) -> Value {
    let mut body = json!({
        "content": input.content,
        "operation": input.operation,
    });
    if let Some(kind) = &input.document_type {
        body["documentType"] = json!(kind);
    }
    body
}

async fn load_credential(db: &DbPool) -> Result<Option<String>, String> {
    let pool = db.clone();
    spawn_blocking(move || {
        let conn = pool.get().map_err(|e| e.to_string())?;
        session::cached_credential(&conn).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| e.to_string())?
}

async fn dispatch_ai(
    db: &DbPool,
    proxy: &AiProxy,
    operation: Operation,
    body: Value,
) -> Result<ProxyReply, String> {
    let credential = load_credential(db).await?;
    let result = proxy.handle(operation, credential.as_deref(), body).await;
    if let Err(err) = &result {
        audit_proxy_failure(db, operation.remote_path(), err);
    }
    Ok(ProxyReply::from_result(result))
}

fn disconnected_reply(err: AssistError) -> ProxyReply {
    let mut reply = ProxyReply::error(&err, true);
    if let Some(body) = reply.body.as_object_mut() {
        body.insert("status".to_string(), json!("disconnected"));
    }
    reply
}

fn audit_proxy_failure(pool: &DbPool, target: &str, error: &AssistError) {
    let pool = pool.clone();
    let code = error.code();
    let explain = error.explain();
    let detail = error.to_string();
    let target = target.to_string();
    tokio::spawn(async move {
        if let Ok(conn) = pool.get() {
            let _ = log_event(
                &conn,
                "warn",
                Some(code),
                "ai.proxy",
                "AI request failed",
                Some(explain),
                Some(json!({ "target": target, "error": detail })),
            );
        }
    });
}

fn audit_host_failure(pool: &DbPool, action: &str, error: &AssistError) {
    let pool = pool.clone();
    let code = error.code();
    let detail = error.to_string();
    let action = action.to_string();
    tokio::spawn(async move {
        if let Ok(conn) = pool.get() {
            let _ = log_event(
                &conn,
                "warn",
                Some(code),
                "host.adapter",
                "host call failed",
                Some("the host runtime did not complete the edit call"),
                Some(json!({ "action": action, "error": detail })),
            );
        }
    });
}

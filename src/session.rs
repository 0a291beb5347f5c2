//! Per-session credential cache.
//!
//! The add-in keeps exactly one remote-service credential per session. It is
//! stored base64-encoded in `app_settings`, resolved per call, and passed into
//! the proxy explicitly so that independent sessions never share state. The UI
//! only ever sees a masked prefix and a short fingerprint, never the raw key.

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as B64_ENGINE;
use base64::Engine;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

const CREDENTIAL_KEY: &str = "session.credential";

/// Cached-credential summary safe to show in the UI.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    pub present: bool,
    pub display: Option<String>,
    pub fingerprint: Option<String>,
}

/// Store the session credential, replacing any previous one. An empty key
/// clears the cache instead.
pub fn cache_credential(conn: &Connection, credential: &str) -> Result<()> {
    let trimmed = credential.trim();
    if trimmed.is_empty() {
        return clear_credential(conn);
    }
    let encoded = B64_ENGINE.encode(trimmed.as_bytes());
    let now = OffsetDateTime::now_utc().unix_timestamp();
    conn.execute(
        "INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![CREDENTIAL_KEY, encoded, now],
    )?;
    Ok(())
}

pub fn cached_credential(conn: &Connection) -> Result<Option<String>> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM app_settings WHERE key = ?1",
            params![CREDENTIAL_KEY],
            |row| row.get(0),
        )
        .optional()?;

    if let Some(s) = stored {
        let decoded = B64_ENGINE
            .decode(s.as_bytes())
            .map_err(|_| anyhow!("Failed to decode stored credential"))?;
        let value = String::from_utf8(decoded)
            .map_err(|_| anyhow!("Stored credential was not valid UTF-8"))?;
        Ok(Some(value))
    } else {
        Ok(None)
    }
}

pub fn clear_credential(conn: &Connection) -> Result<()> {
    conn.execute(
        "DELETE FROM app_settings WHERE key = ?1",
        params![CREDENTIAL_KEY],
    )?;
    Ok(())
}

pub fn credential_status(conn: &Connection) -> Result<CredentialStatus> {
    Ok(match cached_credential(conn)? {
        Some(key) => CredentialStatus {
            present: true,
            display: Some(masked_display(&key)),
            fingerprint: Some(fingerprint(&key)),
        },
        None => CredentialStatus {
            present: false,
            display: None,
            fingerprint: None,
        },
    })
}

/// Short stable identifier for a credential, safe for audit log entries.
pub fn fingerprint(credential: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(credential.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..12].to_string()
}

/// Masked rendering for the UI: leading characters plus a fixed bullet run.
pub fn masked_display(credential: &str) -> String {
    let prefix: String = credential.chars().take(8).collect();
    format!("{prefix}{}", "\u{2022}".repeat(16))
}

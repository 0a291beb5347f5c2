use rusqlite::{params, Connection};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// Append a structured event to the `event_log` table and mirror it to the
/// `log` facade so console subscribers see the same stream.
pub fn log_event(
    conn: &Connection,
    level: &str,
    code: Option<&str>,
    module: &str,
    message: &str,
    explain: Option<&str>,
    data: Option<Value>,
) -> rusqlite::Result<()> {
    let facade_level = match level {
        "error" => log::Level::Error,
        "warn" => log::Level::Warn,
        "debug" => log::Level::Debug,
        _ => log::Level::Info,
    };
    log::log!(target: module, facade_level, "{message}");

    let id = Uuid::new_v4().to_string();
    let ts = OffsetDateTime::now_utc().unix_timestamp();
    let data_str = data.map(|v| v.to_string());
    conn.execute(
        "INSERT INTO event_log (id, ts, level, code, module, message, explain, data) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![id, ts, level, code, module, message, explain, data_str],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::apply_migrations;

    #[test]
    fn log_event_persists_row() {
        let conn = Connection::open_in_memory().unwrap();
        apply_migrations(&conn).unwrap();
        log_event(
            &conn,
            "warn",
            Some("AI-1003"),
            "ai.proxy",
            "remote call failed",
            Some("classified as unreachable"),
            Some(serde_json::json!({ "operation": "generate" })),
        )
        .unwrap();

        let (level, module, data): (String, String, Option<String>) = conn
            .query_row(
                "SELECT level, module, data FROM event_log",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(level, "warn");
        assert_eq!(module, "ai.proxy");
        let parsed: Value = serde_json::from_str(&data.unwrap()).unwrap();
        assert_eq!(parsed["operation"], "generate");
    }
}

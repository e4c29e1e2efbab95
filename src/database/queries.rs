use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;

    Ok(value)
}

/// Write `value` under `key`, replacing whatever was there.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "INSERT INTO kv_store (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at",
        rusqlite::params![key, value, now],
    )?;

    Ok(())
}

pub fn get_updated_at(conn: &Connection, key: &str) -> Result<Option<i64>> {
    let updated_at = conn
        .query_row("SELECT updated_at FROM kv_store WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;

    Ok(updated_at)
}

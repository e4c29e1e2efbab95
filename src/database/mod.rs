use anyhow::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod memory;
pub mod queries;
pub mod schema;

pub use memory::MemoryStore;

/// Minimal string key-value backend the log store persists through.
///
/// Calls may block; async callers run them on the blocking pool.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub fn init_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;

    // Enable WAL mode
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    // Create schema
    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Key-value store backed by a single SQLite table.
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open (and if needed create) the database at `db_path`.
    pub fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();
        init_database(&db_path)?;
        log::debug!("Opened key-value store at {}", db_path.display());
        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect()?;
        queries::get_value(&conn, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect()?;
        queries::set_value(&conn, key, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_store_replaces_values() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::open(dir.path().join("fitness.db")).unwrap();

        assert_eq!(store.get("fitnessLogs").unwrap(), None);
        store.set("fitnessLogs", "[]").unwrap();
        store.set("fitnessLogs", r#"[{"name":"Run"}]"#).unwrap();
        assert_eq!(store.get("fitnessLogs").unwrap().as_deref(), Some(r#"[{"name":"Run"}]"#));
    }

    #[test]
    fn sqlite_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fitness.db");
        SqliteStore::open(&path).unwrap().set("k", "v").unwrap();

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(reopened.path(), path.as_path());
    }
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::database::{queries, SqliteStore};
use crate::models::StorageStats;
use crate::services::log_store::{LogStore, FITNESS_LOGS_KEY};
use crate::utils::config;

pub async fn get_storage_stats(data_dir: &Path) -> Result<StorageStats, String> {
    std::fs::create_dir_all(data_dir).map_err(|e| e.to_string())?;
    let db_path = config::db_path(data_dir);
    let store = SqliteStore::open(&db_path).map_err(|e| format!("{:#}", e))?;
    let logs = LogStore::new(Arc::new(store)).load().await.map_err(|e| e.to_string())?;

    // Get database file size
    let total_size_bytes = db_path.metadata().map(|m| m.len() as i64).unwrap_or(0);

    let conn = rusqlite::Connection::open(&db_path).map_err(|e| e.to_string())?;
    let last_saved_at =
        queries::get_updated_at(&conn, FITNESS_LOGS_KEY).map_err(|e| format!("{:#}", e))?;

    let total_minutes = logs.iter().filter_map(|e| e.minutes_value()).map(u64::from).sum();
    let unparsed_minutes_count = logs.iter().filter(|e| e.minutes_value().is_none()).count() as i64;

    Ok(StorageStats {
        total_size_bytes,
        entries_count: logs.len() as i64,
        total_minutes,
        unparsed_minutes_count,
        oldest_entry: logs.first().map(|e| e.timestamp.to_rfc3339()),
        newest_entry: logs.last().map(|e| e.timestamp.to_rfc3339()),
        last_saved_at,
    })
}

/// Write the full log to `<data_dir>/exports/` and return the file path.
pub async fn export_data(data_dir: &Path) -> Result<PathBuf, String> {
    std::fs::create_dir_all(data_dir).map_err(|e| e.to_string())?;
    let store = SqliteStore::open(config::db_path(data_dir)).map_err(|e| format!("{:#}", e))?;
    let logs = LogStore::new(Arc::new(store)).load().await.map_err(|e| e.to_string())?;

    let export = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "exported_at": chrono::Utc::now().to_rfc3339(),
        "logs": &logs,
    });

    let export_dir = data_dir.join("exports");
    std::fs::create_dir_all(&export_dir).map_err(|e| e.to_string())?;
    let export_path = export_dir.join(format!(
        "fitness_export_{}.json",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    ));

    let content = serde_json::to_string_pretty(&export).map_err(|e| e.to_string())?;
    std::fs::write(&export_path, content).map_err(|e| e.to_string())?;

    log::info!("Exported {} entries to {}", logs.len(), export_path.display());
    Ok(export_path)
}

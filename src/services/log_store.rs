use std::sync::Arc;

use crate::database::KeyValueStore;
use crate::error::StoreError;
use crate::models::LogSequence;

/// Well-known key the whole history is stored under.
pub const FITNESS_LOGS_KEY: &str = "fitnessLogs";

/// Durable home of the fitness log.
///
/// Every save writes the complete sequence; there is no incremental append.
#[derive(Clone)]
pub struct LogStore {
    backend: Arc<dyn KeyValueStore>,
}

impl LogStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read the stored sequence. A missing or blank value is a first run, not a fault.
    pub async fn load(&self) -> Result<LogSequence, StoreError> {
        let backend = Arc::clone(&self.backend);
        let raw = tokio::task::spawn_blocking(move || backend.get(FITNESS_LOGS_KEY))
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?
            .map_err(|e| StoreError::Read(format!("{:#}", e)))?;

        match raw.filter(|raw| !raw.trim().is_empty()) {
            None => {
                log::debug!("No stored fitness log yet");
                Ok(LogSequence::new())
            }
            Some(raw) => {
                let logs: LogSequence = serde_json::from_str(&raw).map_err(|e| {
                    log::error!("Stored fitness log is corrupt: {}", e);
                    StoreError::Read(e.to_string())
                })?;
                log::debug!("Loaded {} fitness log entries", logs.len());
                Ok(logs)
            }
        }
    }

    /// Replace the stored sequence with `logs`.
    pub async fn save(&self, logs: &LogSequence) -> Result<(), StoreError> {
        let raw = serde_json::to_string(logs).map_err(|e| StoreError::Write(e.to_string()))?;
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || backend.set(FITNESS_LOGS_KEY, &raw))
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?
            .map_err(|e| {
                log::error!("Failed to save fitness log: {:#}", e);
                StoreError::Write(format!("{:#}", e))
            })?;

        log::debug!("Saved {} fitness log entries", logs.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use crate::models::LogEntry;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn sample() -> LogSequence {
        vec![
            LogEntry::at("Running", "30", Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, 0).unwrap()),
            LogEntry::at(
                "",
                "not a number",
                Utc.with_ymd_and_hms(2024, 5, 2, 18, 15, 0).unwrap(),
            ),
        ]
    }

    #[tokio::test]
    async fn empty_store_loads_empty_sequence() {
        let store = LogStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = LogStore::new(Arc::new(MemoryStore::new()));
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn save_replaces_previous_value() {
        let store = LogStore::new(Arc::new(MemoryStore::new()));
        store.save(&sample()).await.unwrap();
        store.save(&sample()[..1].to_vec()).await.unwrap();
        assert_eq!(store.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn repeated_loads_agree() {
        let store = LogStore::new(Arc::new(MemoryStore::new()));
        store.save(&sample()).await.unwrap();
        let first = store.load().await.unwrap();
        let second = store.load().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn blank_value_loads_empty_sequence() {
        for blank in ["", "  \n"] {
            let store = LogStore::new(Arc::new(MemoryStore::with_value(FITNESS_LOGS_KEY, blank)));
            assert_eq!(store.load().await.unwrap(), LogSequence::new());
        }
    }

    #[tokio::test]
    async fn corrupt_value_is_a_read_fault() {
        let backend = MemoryStore::with_value(FITNESS_LOGS_KEY, "{not json");
        let store = LogStore::new(Arc::new(backend));
        assert!(matches!(store.load().await, Err(StoreError::Read(_))));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_read_fault() {
        let backend = MemoryStore::with_value(FITNESS_LOGS_KEY, r#"{"name":"Run"}"#);
        let store = LogStore::new(Arc::new(backend));
        assert!(matches!(store.load().await, Err(StoreError::Read(_))));
    }

    #[tokio::test]
    async fn persists_the_wire_layout() {
        let backend = Arc::new(MemoryStore::new());
        let store = LogStore::new(backend.clone());
        store.save(&sample()[..1].to_vec()).await.unwrap();

        let raw = backend.get(FITNESS_LOGS_KEY).unwrap().unwrap();
        let expected = r#"[{"name":"Running","minutes":"30","date":"2024-05-01T07:00:00.000Z"}]"#;
        assert_eq!(raw, expected);
    }
}

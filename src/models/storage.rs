use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageStats {
    pub total_size_bytes: i64,
    pub entries_count: i64,
    pub total_minutes: u64,
    pub unparsed_minutes_count: i64,
    pub oldest_entry: Option<String>,
    pub newest_entry: Option<String>,
    pub last_saved_at: Option<i64>,
}

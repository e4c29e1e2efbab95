use chrono::{DateTime, Local, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Number of entries the log list shows by default.
pub const DEFAULT_RECENT_COUNT: usize = 5;

/// One recorded fitness activity.
///
/// `minutes` is kept exactly as typed; parsing happens only where a number is
/// actually needed (stats, optional validation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub name: String,
    pub minutes: String,
    #[serde(rename = "date", with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Build an entry stamped with the current time.
    pub fn new(name: impl Into<String>, minutes: impl Into<String>) -> Self {
        Self::at(name, minutes, Utc::now())
    }

    /// Build an entry with an explicit timestamp, truncated to the precision
    /// the persisted format keeps.
    pub fn at(
        name: impl Into<String>,
        minutes: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            minutes: minutes.into(),
            timestamp: timestamp.trunc_subsecs(3),
        }
    }

    pub fn minutes_value(&self) -> Option<u32> {
        self.minutes.trim().parse().ok()
    }

    /// Calendar date in the local timezone, always `YYYY-MM-DD`.
    pub fn local_date(&self) -> String {
        self.timestamp.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }
}

/// The full ordered history, oldest first.
pub type LogSequence = Vec<LogEntry>;

/// Last `n` entries in chronological order.
pub fn recent_entries(logs: &[LogEntry], n: usize) -> &[LogEntry] {
    &logs[logs.len().saturating_sub(n)..]
}

/// Form fields the user is currently editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    pub name: String,
    pub minutes: String,
}

impl PendingEntry {
    pub fn clear(&mut self) {
        self.name.clear();
        self.minutes.clear();
    }
}

// ISO-8601 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(i: usize) -> LogEntry {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 7, 0, i as u32).unwrap();
        LogEntry::at(format!("activity-{i}"), "10", at)
    }

    #[test]
    fn local_date_is_iso_calendar_date() {
        let e = LogEntry::at("Row", "15", Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap());
        let shown = e.local_date();
        assert_eq!(shown, e.timestamp.with_timezone(&Local).date_naive().to_string());
        assert!(shown.starts_with("2024-0"), "{shown}");
        assert_eq!(shown.len(), 10);
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let e = LogEntry::at("Running", "30", Utc.with_ymd_and_hms(2024, 5, 1, 7, 30, 0).unwrap());
        let json = serde_json::to_value(&e).unwrap();
        let expected = serde_json::json!({
            "name": "Running",
            "minutes": "30",
            "date": "2024-05-01T07:30:00.000Z",
        });
        assert_eq!(json, expected);
    }

    #[test]
    fn accepts_offset_timestamps() {
        let raw = r#"{"name":"Yoga","minutes":"45","date":"2024-05-01T09:30:00.250+02:00"}"#;
        let e: LogEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(e.timestamp.to_rfc3339(), "2024-05-01T07:30:00.250+00:00");
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let raw = r#"{"name":"x","minutes":"1","date":"yesterday"}"#;
        let res = serde_json::from_str::<LogEntry>(raw);
        assert!(res.is_err());
    }

    #[test]
    fn new_entries_survive_a_round_trip() {
        let e = LogEntry::new("Swim", "20");
        let back: LogEntry = serde_json::from_str(&serde_json::to_string(&e).unwrap()).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn recent_entries_keeps_chronological_order() {
        let logs: Vec<_> = (1..=7).map(entry).collect();
        let recent = recent_entries(&logs, 5);
        let names: Vec<_> = recent.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["activity-3", "activity-4", "activity-5", "activity-6", "activity-7"]);
    }

    #[test]
    fn recent_entries_on_short_sequences() {
        let logs: Vec<_> = (1..=2).map(entry).collect();
        assert_eq!(recent_entries(&logs, 5).len(), 2);
        assert!(recent_entries(&[], 5).is_empty());
        assert!(recent_entries(&logs, 0).is_empty());
    }

    #[test]
    fn minutes_value_is_lenient_about_whitespace_only() {
        assert_eq!(LogEntry::new("a", " 30 ").minutes_value(), Some(30));
        assert_eq!(LogEntry::new("a", "half an hour").minutes_value(), None);
        assert_eq!(LogEntry::new("a", "").minutes_value(), None);
    }
}

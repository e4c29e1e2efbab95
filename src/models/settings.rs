use serde::{Deserialize, Serialize};

use super::entry::DEFAULT_RECENT_COUNT;
use super::video::DEFAULT_EMBED_BASE_URL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub version: String,
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub video: VideoSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            general: GeneralSettings::default(),
            video: VideoSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default = "default_recent_count")]
    pub recent_count: usize,
    /// Reject empty names and non-numeric minutes instead of storing them as typed.
    #[serde(default)]
    pub validate_input: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            recent_count: DEFAULT_RECENT_COUNT,
            validate_input: false,
        }
    }
}

fn default_recent_count() -> usize {
    DEFAULT_RECENT_COUNT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSettings {
    pub enabled: bool,
    /// Falls back to `YOUTUBE_API_KEY` when empty.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_key: String,
    pub search_query: String,
    /// Search for the logged activity instead of `search_query`.
    #[serde(default)]
    pub query_from_activity: bool,
    pub max_results: u32,
    pub timeout_secs: u64,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_embed_base_url")]
    pub embed_base_url: String,
}

/// Upper bound the search API accepts for `maxResults`.
pub const MAX_SEARCH_RESULTS: u32 = 50;

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: String::new(),
            search_query: "cute kittens shorts".to_string(),
            query_from_activity: false,
            max_results: MAX_SEARCH_RESULTS,
            timeout_secs: 10,
            endpoint: default_endpoint(),
            embed_base_url: default_embed_base_url(),
        }
    }
}

fn default_endpoint() -> String {
    "https://www.googleapis.com/youtube/v3/search".to_string()
}

fn default_embed_base_url() -> String {
    DEFAULT_EMBED_BASE_URL.to_string()
}

impl Settings {
    /// Set a single value addressed as `section.field`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
            value
                .trim()
                .parse()
                .map_err(|_| format!("invalid value for {}: {:?}", key, value))
        }

        match key {
            "general.recent_count" => self.general.recent_count = parse(key, value)?,
            "general.validate_input" => self.general.validate_input = parse(key, value)?,
            "video.enabled" => self.video.enabled = parse(key, value)?,
            "video.api_key" => self.video.api_key = value.trim().to_string(),
            "video.search_query" => self.video.search_query = value.to_string(),
            "video.query_from_activity" => self.video.query_from_activity = parse(key, value)?,
            "video.max_results" => {
                let max_results: u32 = parse(key, value)?;
                if !(1..=MAX_SEARCH_RESULTS).contains(&max_results) {
                    return Err(format!("{} must be between 1 and {}", key, MAX_SEARCH_RESULTS));
                }
                self.video.max_results = max_results;
            }
            "video.timeout_secs" => {
                let timeout_secs: u64 = parse(key, value)?;
                if timeout_secs == 0 {
                    return Err(format!("{} must be at least 1", key));
                }
                self.video.timeout_secs = timeout_secs;
            }
            "video.endpoint" => self.video.endpoint = value.trim().to_string(),
            "video.embed_base_url" => self.video.embed_base_url = value.trim().to_string(),
            _ => return Err(format!("unknown setting: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fill_in_defaults() {
        let raw = r#"{"version":"1.0.0","general":{"validate_input":true}}"#;
        let settings: Settings = serde_json::from_str(raw).unwrap();
        assert!(settings.general.validate_input);
        assert_eq!(settings.general.recent_count, 5);
        assert_eq!(settings.video, VideoSettings::default());
    }

    #[test]
    fn empty_api_key_is_not_written() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn set_updates_known_keys() {
        let mut settings = Settings::default();
        settings.set("video.search_query", "morning stretch").unwrap();
        settings.set("video.enabled", "false").unwrap();
        settings.set("general.recent_count", "8").unwrap();
        assert_eq!(settings.video.search_query, "morning stretch");
        assert!(!settings.video.enabled);
        assert_eq!(settings.general.recent_count, 8);
    }

    #[test]
    fn set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set("video.timeout_secs", "soon").is_err());
        assert!(settings.set("video.colour", "red").is_err());
    }

    #[test]
    fn set_rejects_out_of_range_lookup_limits() {
        let mut settings = Settings::default();
        assert!(settings.set("video.timeout_secs", "0").is_err());
        assert!(settings.set("video.max_results", "0").is_err());
        assert!(settings.set("video.max_results", "51").is_err());
        assert_eq!(settings.video, VideoSettings::default());

        settings.set("video.max_results", "25").unwrap();
        settings.set("video.timeout_secs", "3").unwrap();
        assert_eq!(settings.video.max_results, 25);
        assert_eq!(settings.video.timeout_secs, 3);
    }
}

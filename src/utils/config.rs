use std::path::{Path, PathBuf};

use crate::models::Settings;

const ENV_API_KEY: &str = "YOUTUBE_API_KEY";
const ENV_DATA_DIR: &str = "FITNESS_RECORDER_DATA_DIR";
const APP_DIR_NAME: &str = "fitness-recorder";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn api_key_from_env() -> Option<String> {
    std::env::var(ENV_API_KEY).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn resolve_api_key(explicit_key: &str) -> String {
    let trimmed = explicit_key.trim();
    if !trimmed.is_empty() {
        return trimmed.to_string();
    }
    api_key_from_env().unwrap_or_default()
}

/// Data directory: explicit flag, then env var, then the platform data dir.
pub fn resolve_data_dir(explicit: Option<&Path>) -> Result<PathBuf, String> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| "could not determine a data directory; pass --data-dir".to_string())
}

pub fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("config").join("settings.json")
}

pub fn db_path(data_dir: &Path) -> PathBuf {
    data_dir.join("fitness.db")
}

/// Read the settings file, falling back to defaults when it does not exist.
pub fn read_settings(data_dir: &Path) -> Result<Settings, String> {
    let path = settings_path(data_dir);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let content = std::fs::read_to_string(&path).map_err(|e| e.to_string())?;
    serde_json::from_str(&content)
        .map_err(|e| format!("invalid settings file {}: {}", path.display(), e))
}

pub fn write_settings(data_dir: &Path, settings: &Settings) -> Result<(), String> {
    let path = settings_path(data_dir);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    let content = serde_json::to_string_pretty(settings).map_err(|e| e.to_string())?;
    std::fs::write(&path, content).map_err(|e| e.to_string())
}

use std::path::Path;
use std::sync::Arc;

use crate::database::SqliteStore;
use crate::models::LogEntry;
use crate::services::log_store::LogStore;
use crate::services::recorder::{AppendOutcome, FitnessRecorder, RecorderOptions};
use crate::services::video_lookup::{VideoLookup, YouTubeClient};
use crate::utils::config;

/// Wire a recorder to the on-disk store and, unless `offline`, the video search.
pub fn open_recorder(data_dir: &Path, offline: bool) -> Result<FitnessRecorder, String> {
    std::fs::create_dir_all(data_dir).map_err(|e| e.to_string())?;
    let settings = config::read_settings(data_dir)?;

    let store = SqliteStore::open(config::db_path(data_dir)).map_err(|e| format!("{:#}", e))?;

    let lookup: Option<Arc<dyn VideoLookup>> = if offline || !settings.video.enabled {
        None
    } else {
        let api_key = config::resolve_api_key(&settings.video.api_key);
        if api_key.is_empty() {
            log::warn!("Video lookup disabled: no API key configured (set YOUTUBE_API_KEY)");
            None
        } else {
            let client = YouTubeClient::from_settings(&settings.video, &api_key)
                .map_err(|e| e.to_string())?;
            Some(Arc::new(client) as Arc<dyn VideoLookup>)
        }
    };

    Ok(FitnessRecorder::new(
        LogStore::new(Arc::new(store)),
        lookup,
        RecorderOptions::from_settings(&settings),
    ))
}

pub async fn add_fitness_log(
    data_dir: &Path,
    name: String,
    minutes: String,
    offline: bool,
) -> Result<AppendOutcome, String> {
    let recorder = open_recorder(data_dir, offline)?;
    recorder.start().await.map_err(|e| e.to_string())?;
    recorder.record(name, minutes).await.map_err(|e| e.to_string())
}

pub async fn get_logs(data_dir: &Path) -> Result<Vec<LogEntry>, String> {
    let recorder = open_recorder(data_dir, true)?;
    recorder.start().await.map_err(|e| e.to_string())?;
    Ok(recorder.logs().await)
}

pub async fn get_recent_logs(
    data_dir: &Path,
    count: Option<usize>,
) -> Result<Vec<LogEntry>, String> {
    let count = match count {
        Some(count) => count,
        None => config::read_settings(data_dir)?.general.recent_count,
    };
    let recorder = open_recorder(data_dir, true)?;
    recorder.start().await.map_err(|e| e.to_string())?;
    Ok(recorder.recent(count).await)
}

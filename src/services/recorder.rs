use rand::Rng;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use super::log_store::LogStore;
use super::video_lookup::VideoLookup;
use crate::error::{LookupError, RecorderError};
use crate::models::{recent_entries, LogEntry, LogSequence, PendingEntry, Settings, VideoReference};

// ─── Types ───

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecorderState {
    Uninitialized,
    Ready,
    Appending,
    LookingUpVideo,
    /// The stored log could not be loaded; `start` may be retried.
    Faulted,
}

#[derive(Debug, Clone)]
pub struct RecorderOptions {
    pub recent_count: usize,
    pub validate_input: bool,
    pub search_query: String,
    pub query_from_activity: bool,
    pub max_results: u32,
    pub lookup_timeout: Duration,
    pub embed_base_url: String,
}

impl Default for RecorderOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl RecorderOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            recent_count: settings.general.recent_count,
            validate_input: settings.general.validate_input,
            search_query: settings.video.search_query.clone(),
            query_from_activity: settings.video.query_from_activity,
            max_results: settings.video.max_results,
            lookup_timeout: Duration::from_secs(settings.video.timeout_secs),
            embed_base_url: settings.video.embed_base_url.clone(),
        }
    }
}

/// What happened to the video half of an append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoOutcome {
    /// No lookup service configured.
    Skipped,
    Found(VideoReference),
    /// The entry was saved; only the video failed.
    Failed(LookupError),
}

#[derive(Debug, Clone)]
pub struct AppendOutcome {
    pub entry: LogEntry,
    pub total: usize,
    pub recent: Vec<LogEntry>,
    pub video: VideoOutcome,
}

/// Read-only snapshot for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct RecorderView {
    pub state: RecorderState,
    pub pending: PendingEntry,
    pub recent: Vec<LogEntry>,
    pub total: usize,
    pub video: Option<VideoReference>,
    pub fault: Option<String>,
}

struct Session {
    state: RecorderState,
    logs: LogSequence,
    pending: PendingEntry,
    video: Option<VideoReference>,
    fault: Option<String>,
    lookup_token: Option<CancellationToken>,
}

struct AppendGuard<'a>(&'a AtomicBool);

impl Drop for AppendGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ─── Controller ───

/// Owns the in-memory fitness log and drives the append-and-refresh protocol.
///
/// At most one append runs at a time; a second submission while one is in
/// flight (video lookup included) fails with `AppendInProgress` instead of
/// racing on the last known sequence.
pub struct FitnessRecorder {
    store: LogStore,
    lookup: Option<Arc<dyn VideoLookup>>,
    options: RecorderOptions,
    session: Mutex<Session>,
    append_in_flight: AtomicBool,
    shutdown: CancellationToken,
}

impl FitnessRecorder {
    pub fn new(
        store: LogStore,
        lookup: Option<Arc<dyn VideoLookup>>,
        options: RecorderOptions,
    ) -> Self {
        Self {
            store,
            lookup,
            options,
            session: Mutex::new(Session {
                state: RecorderState::Uninitialized,
                logs: LogSequence::new(),
                pending: PendingEntry::default(),
                video: None,
                fault: None,
                lookup_token: None,
            }),
            append_in_flight: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        }
    }

    /// Recorder over a process-local store, without video lookups.
    pub fn in_memory(options: RecorderOptions) -> Self {
        let store = LogStore::new(Arc::new(crate::database::MemoryStore::new()));
        Self::new(store, None, options)
    }

    /// Load the stored history. Returns the number of entries loaded.
    pub async fn start(&self) -> Result<usize, RecorderError> {
        {
            let session = self.session.lock().await;
            if !matches!(session.state, RecorderState::Uninitialized | RecorderState::Faulted) {
                return Ok(session.logs.len());
            }
        }

        let loaded = self.store.load().await;
        let mut session = self.session.lock().await;
        match loaded {
            Ok(logs) => {
                log::info!("Loaded {} fitness log entries", logs.len());
                session.logs = logs;
                session.state = RecorderState::Ready;
                session.fault = None;
                Ok(session.logs.len())
            }
            Err(e) => {
                log::error!("Failed to load fitness log: {}", e);
                session.state = RecorderState::Faulted;
                session.fault = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.session.lock().await.pending.name = name.into();
    }

    pub async fn set_minutes(&self, minutes: impl Into<String>) {
        self.session.lock().await.pending.minutes = minutes.into();
    }

    /// Fill both form fields and submit them.
    pub async fn record(
        &self,
        name: impl Into<String>,
        minutes: impl Into<String>,
    ) -> Result<AppendOutcome, RecorderError> {
        let guard = self.begin_append()?;
        {
            let mut session = self.session.lock().await;
            session.pending.name = name.into();
            session.pending.minutes = minutes.into();
        }
        self.append(guard).await
    }

    /// Append the pending fields as a new entry, persist, then look up a video.
    pub async fn submit(&self) -> Result<AppendOutcome, RecorderError> {
        let guard = self.begin_append()?;
        self.append(guard).await
    }

    async fn append(&self, _guard: AppendGuard<'_>) -> Result<AppendOutcome, RecorderError> {
        let (entry, submitted, previous_len, updated) = {
            let mut session = self.session.lock().await;
            match session.state {
                RecorderState::Ready => {}
                RecorderState::Faulted => {
                    let reason = session
                        .fault
                        .clone()
                        .unwrap_or_else(|| "stored log failed to load".to_string());
                    return Err(RecorderError::NotReady(reason));
                }
                RecorderState::Uninitialized => {
                    return Err(RecorderError::NotReady("stored log not loaded yet".to_string()));
                }
                RecorderState::Appending | RecorderState::LookingUpVideo => {
                    return Err(RecorderError::AppendInProgress);
                }
            }

            if self.options.validate_input {
                validate(&session.pending)?;
            }

            let submitted = session.pending.clone();
            let entry = LogEntry::new(submitted.name.clone(), submitted.minutes.clone());
            let previous_len = session.logs.len();
            session.logs.push(entry.clone());
            session.state = RecorderState::Appending;
            (entry, submitted, previous_len, session.logs.clone())
        };

        if let Err(e) = self.store.save(&updated).await {
            let mut session = self.session.lock().await;
            session.logs.truncate(previous_len);
            session.state = RecorderState::Ready;
            log::warn!("Rolled back unsaved entry {:?}", entry.name);
            return Err(e.into());
        }

        let lookup_token = {
            let mut session = self.session.lock().await;
            // Edits made while the save was pending belong to the next entry.
            if session.pending == submitted {
                session.pending.clear();
            }
            log::info!("Added {} minutes of {} to your fitness record!", entry.minutes, entry.name);

            if self.lookup.is_some() {
                let token = self.shutdown.child_token();
                session.lookup_token = Some(token.clone());
                session.state = RecorderState::LookingUpVideo;
                Some(token)
            } else {
                session.state = RecorderState::Ready;
                None
            }
        };

        let video = match (self.lookup.as_deref(), lookup_token) {
            (Some(lookup), Some(token)) => {
                let found = self.find_video(lookup, &entry, &token).await;
                let mut session = self.session.lock().await;
                session.lookup_token = None;
                session.state = RecorderState::Ready;
                match found {
                    Ok(reference) => {
                        log::info!("Showing video {}", reference);
                        session.video = Some(reference.clone());
                        VideoOutcome::Found(reference)
                    }
                    Err(e) => {
                        log::warn!("Video lookup failed: {}", e);
                        VideoOutcome::Failed(e)
                    }
                }
            }
            _ => VideoOutcome::Skipped,
        };

        let session = self.session.lock().await;
        Ok(AppendOutcome {
            entry,
            total: session.logs.len(),
            recent: recent_entries(&session.logs, self.options.recent_count).to_vec(),
            video,
        })
    }

    /// Cancel the video lookup of the append in flight, if any.
    pub async fn cancel_video_lookup(&self) -> bool {
        match self.session.lock().await.lookup_token.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Cancel any running lookup and refuse to start new ones.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub async fn state(&self) -> RecorderState {
        self.session.lock().await.state
    }

    pub async fn pending(&self) -> PendingEntry {
        self.session.lock().await.pending.clone()
    }

    pub async fn logs(&self) -> LogSequence {
        self.session.lock().await.logs.clone()
    }

    pub async fn recent(&self, n: usize) -> Vec<LogEntry> {
        recent_entries(&self.session.lock().await.logs, n).to_vec()
    }

    pub async fn video(&self) -> Option<VideoReference> {
        self.session.lock().await.video.clone()
    }

    pub async fn view(&self) -> RecorderView {
        let session = self.session.lock().await;
        RecorderView {
            state: session.state,
            pending: session.pending.clone(),
            recent: recent_entries(&session.logs, self.options.recent_count).to_vec(),
            total: session.logs.len(),
            video: session.video.clone(),
            fault: session.fault.clone(),
        }
    }

    fn begin_append(&self) -> Result<AppendGuard<'_>, RecorderError> {
        self.append_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RecorderError::AppendInProgress)?;
        Ok(AppendGuard(&self.append_in_flight))
    }

    fn search_query(&self, entry: &LogEntry) -> String {
        let name = entry.name.trim();
        if self.options.query_from_activity && !name.is_empty() {
            format!("{} workout", name)
        } else {
            self.options.search_query.clone()
        }
    }

    async fn find_video(
        &self,
        lookup: &dyn VideoLookup,
        entry: &LogEntry,
        token: &CancellationToken,
    ) -> Result<VideoReference, LookupError> {
        let query = self.search_query(entry);
        let timeout = self.options.lookup_timeout;
        log::debug!("Searching videos for {:?}", query);

        let search = lookup.search(&query, self.options.max_results);
        let results = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(LookupError::Cancelled),
            res = tokio::time::timeout(timeout, search) => {
                res.map_err(|_| LookupError::Transport(format!("timed out after {:?}", timeout)))??
            }
        };

        let candidates = &results[..results.len().min(self.options.max_results as usize)];
        if candidates.is_empty() {
            return Err(LookupError::EmptyResult);
        }

        let pick = rand::thread_rng().gen_range(0..candidates.len());
        Ok(candidates[pick].embed_url(&self.options.embed_base_url))
    }
}

fn validate(pending: &PendingEntry) -> Result<(), RecorderError> {
    if pending.name.trim().is_empty() {
        return Err(RecorderError::InvalidInput("activity name is empty".to_string()));
    }
    match pending.minutes.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(()),
        _ => Err(RecorderError::InvalidInput(format!(
            "minutes must be a positive whole number, got {:?}",
            pending.minutes
        ))),
    }
}

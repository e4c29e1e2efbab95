//! Fitness activity recorder.
//!
//! Entries (activity name + minutes) are appended to a log persisted under a
//! single key in a local SQLite key-value table. After each successful append
//! the recorder can fetch a random embeddable video from the YouTube search
//! API; a failed lookup never undoes the append.

pub mod commands;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{LookupError, RecorderError, StoreError};
pub use services::log_store::LogStore;
pub use services::recorder::{
    AppendOutcome, FitnessRecorder, RecorderOptions, RecorderState, VideoOutcome,
};
pub use services::video_lookup::{VideoLookup, YouTubeClient};

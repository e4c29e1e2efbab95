pub mod log_store;
pub mod recorder;
pub mod video_lookup;

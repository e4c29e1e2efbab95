use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_EMBED_BASE_URL: &str = "https://www.youtube.com/embed";

/// One search hit from the video provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoResult {
    pub video_id: String,
    pub title: Option<String>,
}

impl VideoResult {
    pub fn embed_url(&self, embed_base: &str) -> VideoReference {
        VideoReference(format!("{}/{}", embed_base.trim_end_matches('/'), self.video_id))
    }
}

/// The embeddable URL currently on display. Lives for the session only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoReference(String);

impl VideoReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

use thiserror::Error;

/// Failures of the durable log store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A stored value exists but could not be read back into a log sequence.
    #[error("stored fitness log could not be read: {0}")]
    Read(String),

    #[error("fitness log could not be saved: {0}")]
    Write(String),
}

/// Failures of the video search. None of these undo an append.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("video search request failed: {0}")]
    Transport(String),

    #[error("video search rejected the API credential (status {status}): {message}")]
    Auth { status: u16, message: String },

    #[error("video search returned no results")]
    EmptyResult,

    #[error("video search returned a malformed response: {0}")]
    MalformedResult(String),

    #[error("video search was cancelled")]
    Cancelled,
}

impl LookupError {
    /// Timeouts and cancellation are transport faults from the caller's side.
    pub fn is_transport(&self) -> bool {
        matches!(self, LookupError::Transport(_) | LookupError::Cancelled)
    }
}

/// Failures reported by the recorder to its UI layer.
#[derive(Debug, Error)]
pub enum RecorderError {
    #[error(transparent)]
    Storage(#[from] StoreError),

    #[error("another entry is still being recorded")]
    AppendInProgress,

    #[error("recorder is not ready ({0})")]
    NotReady(String),

    #[error("invalid entry: {0}")]
    InvalidInput(String),
}

impl RecorderError {
    pub fn is_storage_read(&self) -> bool {
        matches!(self, RecorderError::Storage(StoreError::Read(_)))
    }

    pub fn is_storage_write(&self) -> bool {
        matches!(self, RecorderError::Storage(StoreError::Write(_)))
    }
}

//! Sync Errors
//!
//! Every failed call ends up as one of these and is surfaced once through the
//! view state message. Nothing here is fatal.

/// Common result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Failure of a single remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// Request rejected or the network is unreachable
    Transport(String),
    /// Response body is not valid JSON or does not fit the expected shape
    Decode(String),
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Transport(msg) => write!(f, "Network error: {}", msg),
            SyncError::Decode(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Decode(err.to_string())
    }
}

//! Error types for the match feed

use thiserror::Error;

/// Result type alias for match feed operations
pub type Result<T> = std::result::Result<T, FeedError>;

/// Errors that can occur while fetching, caching or notifying
#[derive(Error, Debug)]
pub enum FeedError {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: String, status: u16 },

    /// Payload did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Cache or ledger storage failure
    #[error("Persistence error: {0}")]
    Persistence(#[from] persistence::PersistenceError),

    /// Notification could not be delivered
    #[error("Notification error: {0}")]
    Notification(String),
}

impl FeedError {
    /// Create a new notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }
}

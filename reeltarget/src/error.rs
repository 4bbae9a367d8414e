//! Error types for target adapters

/// Result type alias for target operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors an adapter can report to the resolver
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend did not answer within the adapter's own deadline
    #[error("Target did not respond in time")]
    Timeout,

    /// The transport to the backend failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The referenced message no longer exists on the backend
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Malformed message key
    #[error("Invalid message key: {0}")]
    InvalidKey(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a transport error from a string
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

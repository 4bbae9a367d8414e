//! Error types for the streaming proxy

/// Result type alias for streaming operations
pub type Result<T> = std::result::Result<T, Error>;

/// Why a Range header could not be satisfied
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RangeError {
    /// The header does not match `bytes=<start>-[<end>]`
    #[error("Malformed Range header")]
    InvalidSyntax,

    /// The requested range lies outside the object
    #[error("Range not satisfiable for {total} bytes")]
    Unsatisfiable { total: u64 },
}

/// Errors that can occur while proxying
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Range header problem (maps to 416)
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Upstream request failed
    #[error("Upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backing store misbehaved mid-stream
    #[error("Source error: {0}")]
    Source(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

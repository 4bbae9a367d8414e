//! Error types for the job registry

/// Result type alias for job operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when mutating jobs
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No job with this id
    #[error("Job not found: {0}")]
    NotFound(String),

    /// The job already reached Done or Failed
    #[error("Job {0} is in a terminal state")]
    TerminalState(String),
}

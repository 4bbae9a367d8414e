//! Error types for the resolver

/// Result type alias for resolver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while searching or resolving
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Caller passed something unusable (empty query, bad item id, bad index)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The referenced item or message could not be found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend stopped answering mid-negotiation
    #[error("Negotiation timed out")]
    NegotiationTimeout,

    /// A gating requirement could not be satisfied
    #[error("Gating could not be resolved: {0}")]
    GatingUnresolved(String),

    /// Every strategy was exhausted without producing a locator
    #[error("No resolvable file behind this option")]
    NoResolvableFile,

    /// The backend answered with something the pipeline cannot interpret
    #[error("Upstream protocol error: {0}")]
    UpstreamProtocol(String),

    /// Error propagated from the target adapter
    #[error("Target error: {0}")]
    Target(reeltarget::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl From<reeltarget::Error> for Error {
    fn from(e: reeltarget::Error) -> Self {
        match e {
            reeltarget::Error::Timeout => Self::NegotiationTimeout,
            other => Self::Target(other),
        }
    }
}

impl Error {
    /// Create an invalid-input error from a string
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an upstream-protocol error from a string
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamProtocol(msg.into())
    }
}

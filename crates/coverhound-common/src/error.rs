//! Common error types used throughout coverhound.
//!
//! Lookup failures never reach callers of the resolver: adapters report them
//! as these variants and the provider chain folds them into misses. Config
//! validation and CLI argument parsing surface them to the user.

/// Common error type for coverhound.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The configuration is inconsistent or incomplete.
    #[error("Config error: {0}")]
    Config(String),

    /// An outbound HTTP request failed or returned a non-success status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider call exceeded its time budget (milliseconds).
    #[error("Timed out after {0} ms")]
    Timeout(u64),

    /// A provider response could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new Http error.
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Create a new Parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a Timeout error for an elapsed budget.
    pub fn timeout(budget: std::time::Duration) -> Self {
        Self::Timeout(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX))
    }

    /// Whether the failure is transient (worth trying again in a later
    /// resolution, never within the same one).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout(_))
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

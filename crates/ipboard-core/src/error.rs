//! Error types for the IPBoard client core
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for IPBoard operations
pub type Result<T> = std::result::Result<T, Error>;

/// A structured rejection code returned by the record API
///
/// These are the codes the remote service attaches to a rejected mutation.
/// Only `InvalidIpAddress` and `UnavailableLabel` are mapped to field errors
/// by the row editor; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectionCode {
    /// The submitted IP address is not syntactically valid
    InvalidIpAddress,
    /// The submitted label is already used by another record
    UnavailableLabel,
    /// The targeted record does not exist (or was already deleted)
    NonexistentIpAddress,
    /// Any code this client does not recognize
    Other(String),
}

impl RejectionCode {
    /// Parse a wire code string
    pub fn from_code(code: &str) -> Self {
        match code {
            "invalid_ip_address" => Self::InvalidIpAddress,
            "unavailable_label" => Self::UnavailableLabel,
            "nonexistent_ip_address" => Self::NonexistentIpAddress,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire representation of this code
    pub fn as_code(&self) -> &str {
        match self {
            Self::InvalidIpAddress => "invalid_ip_address",
            Self::UnavailableLabel => "unavailable_label",
            Self::NonexistentIpAddress => "nonexistent_ip_address",
            Self::Other(code) => code,
        }
    }
}

impl std::fmt::Display for RejectionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Core error type for the IPBoard client
#[derive(Error, Debug)]
pub enum Error {
    /// Record API errors (transport succeeded, request failed)
    #[error("API error: {0}")]
    Api(String),

    /// The server rejected a mutation with structured error codes
    #[error("rejected by server: {}", codes.iter().map(|c| c.as_code()).collect::<Vec<_>>().join(", "))]
    Rejected {
        /// At least one code, in server order
        codes: Vec<RejectionCode>,
    },

    /// Session-related errors
    #[error("Session error: {0}")]
    Session(String),

    /// Credential store errors
    #[error("Credential store error: {0}")]
    Credentials(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors (from the record API transport)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a record API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a rejection carrying a single code
    pub fn rejected(code: RejectionCode) -> Self {
        Self::Rejected { codes: vec![code] }
    }

    /// Create a rejection carrying all codes from a failure body
    pub fn rejected_all(codes: Vec<RejectionCode>) -> Self {
        Self::Rejected { codes }
    }

    /// Create a session error
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    /// Create a credential store error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// The first rejection code, if this is a structured rejection
    ///
    /// The server attaches at least one code to every rejected mutation;
    /// most callers only care about the first one.
    pub fn first_rejection(&self) -> Option<&RejectionCode> {
        match self {
            Self::Rejected { codes } => codes.first(),
            _ => None,
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

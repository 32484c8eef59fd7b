//! Submitter error types

use thiserror::Error;

/// Submission error
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Parameter values disagree with the template signature
    #[error("parameter mismatch: {message}")]
    ParameterMismatch { message: String },

    /// No bearer token available
    #[error("missing credentials: environment variable '{variable}' is not set")]
    MissingCredentials { variable: String },

    /// Request body could not be encoded
    #[error("cannot encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// Transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("service rejected the request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Service answered with an unexpected body
    #[error("invalid service response: {message}")]
    InvalidResponse { message: String },
}

impl SubmitError {
    pub fn parameter_mismatch(message: impl Into<String>) -> Self {
        Self::ParameterMismatch {
            message: message.into(),
        }
    }

    /// Whether this is a signature mismatch between bindings and template
    pub fn is_parameter_mismatch(&self) -> bool {
        matches!(self, Self::ParameterMismatch { .. })
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, SubmitError>;

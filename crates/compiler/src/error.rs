//! Compiler error types

use contracts::StepCapability;
use thiserror::Error;

/// Compilation error
#[derive(Debug, Error)]
pub enum CompileError {
    /// Task inputs do not match the component or pipeline signature
    #[error("parameter mismatch in task '{task}': {message}")]
    ParameterMismatch { task: String, message: String },

    /// No registry entry for a capability
    #[error("no step registered for capability '{capability}'")]
    UnresolvedCapability { capability: StepCapability },

    /// Capability registered twice
    #[error("capability '{capability}' registered more than once")]
    DuplicateCapability { capability: StepCapability },

    /// Structural graph error
    #[error("invalid pipeline graph: {message}")]
    InvalidGraph { message: String },

    /// Template serialization error
    #[error("template serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn parameter_mismatch(task: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParameterMismatch {
            task: task.into(),
            message: message.into(),
        }
    }

    pub fn invalid_graph(message: impl Into<String>) -> Self {
        Self::InvalidGraph {
            message: message.into(),
        }
    }

    /// Whether this is a signature mismatch between graph and components
    pub fn is_parameter_mismatch(&self) -> bool {
        matches!(self, Self::ParameterMismatch { .. })
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, CompileError>;

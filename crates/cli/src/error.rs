//! Error types for the assembler.

use compiler::CompileError;
use contracts::ContractError;
use submitter::SubmitError;
use thiserror::Error;

/// Assembler error, grouped by how it is reported
#[derive(Error, Debug)]
pub enum AssemblerError {
    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ContractError),

    /// Template compilation failed
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),

    /// Run construction or submission failed
    #[error("submission failed: {0}")]
    Submit(#[from] SubmitError),

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AssemblerError {
    /// Parameter bindings disagree with the pipeline signature
    pub fn is_parameter_mismatch(&self) -> bool {
        match self {
            Self::Compile(e) => e.is_parameter_mismatch(),
            Self::Submit(e) => e.is_parameter_mismatch(),
            _ => false,
        }
    }

    /// Message shown to the user before exiting
    pub fn report(&self) -> String {
        if self.is_parameter_mismatch() {
            format!(
                "Error: pipeline compilation or submission failed due to a parameter mismatch: {self}\n\
                 Check that the bound parameters match the pipeline signature."
            )
        } else {
            format!("An unexpected error occurred during pipeline execution: {self}")
        }
    }
}

/// Result type alias for assembler operations
pub type Result<T> = std::result::Result<T, AssemblerError>;

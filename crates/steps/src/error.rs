//! Step error types

use std::path::PathBuf;

use thiserror::Error;

use crate::classifier::TrainError;

/// Step execution error
#[derive(Debug, Error)]
pub enum StepError {
    /// The processed-data directory lacks the contract file
    #[error("processed data file not found: {}", path.display())]
    ProcessedDataNotFound { path: PathBuf },

    /// CSV read/write error
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Model encode/decode error
    #[error("model encoding error: {0}")]
    ModelEncoding(#[from] bincode::Error),

    /// Classifier fitting error
    #[error(transparent)]
    Training(#[from] TrainError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias
pub type Result<T> = std::result::Result<T, StepError>;

//! Artifact contract between the two steps
//!
//! File names and the processed dataset schema are fixed: the training step
//! looks them up by name inside the directory artifacts it receives.

use serde::{Deserialize, Serialize};

/// File written inside the processed-data directory artifact
pub const PROCESSED_DATA_FILE_NAME: &str = "processed_data.csv";

/// File written inside the trained-model directory artifact
pub const MODEL_FILE_NAME: &str = "model.joblib";

/// Number of rows produced by the data preparation step
pub const PROCESSED_ROW_COUNT: usize = 100;

/// Column names of the processed dataset, in file order
pub const DATASET_COLUMNS: [&str; 3] = ["feature_a", "feature_b", "target"];

/// Exclusive upper bound of `feature_b`
pub const FEATURE_B_UPPER: i64 = 10;

/// One row of the processed dataset
///
/// Field names double as CSV header names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetRow {
    /// Uniform real in [0, 1)
    pub feature_a: f64,
    /// Uniform integer in [0, 10)
    pub feature_b: i64,
    /// Binary label
    pub target: u8,
}

impl DatasetRow {
    /// Feature vector in model input order
    pub fn features(&self) -> [f64; 2] {
        [self.feature_a, self.feature_b as f64]
    }
}

/// Typed artifact kinds understood by the execution service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Tabular data directory
    Dataset,
    /// Serialized model directory
    Model,
    /// Untyped file (reports)
    Artifact,
}

impl ArtifactKind {
    /// Schema title used in the compiled template
    pub fn schema_title(self) -> &'static str {
        match self {
            Self::Dataset => "system.Dataset",
            Self::Model => "system.Model",
            Self::Artifact => "system.Artifact",
        }
    }

    /// Schema version used in the compiled template
    pub fn schema_version(self) -> &'static str {
        "0.0.1"
    }
}

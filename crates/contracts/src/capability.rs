//! StepCapability - named unit of work resolved through the step registry

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ContractError;

/// Capability a graph node needs from the step registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepCapability {
    /// Produces the processed dataset and preprocessing report
    #[serde(rename = "data-preparation-step")]
    DataPreparation,
    /// Fits the classifier and writes model and metrics
    #[serde(rename = "training-step")]
    Training,
}

impl StepCapability {
    /// All capabilities the training pipeline needs
    pub const ALL: [StepCapability; 2] = [Self::DataPreparation, Self::Training];

    /// Registry name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataPreparation => "data-preparation-step",
            Self::Training => "training-step",
        }
    }
}

impl fmt::Display for StepCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepCapability {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ContractError::UnknownCapability { name: s.into() })
    }
}

//! Human readable step reports

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Summary written by the data preparation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessingReport {
    pub rows: usize,
    pub columns: usize,
}

impl fmt::Display for PreprocessingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Preprocessing Summary:")?;
        writeln!(f, "  Number of rows: {}", self.rows)?;
        writeln!(f, "  Number of columns: {}", self.columns)?;
        writeln!(f, "  Missing values handled: Yes (simulated)")
    }
}

/// Metrics written by the training step
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingMetricsReport {
    pub model_type: String,
    pub accuracy: f64,
}

impl fmt::Display for TrainingMetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Training Metrics Summary:")?;
        writeln!(f, "  Model Type: {}", self.model_type)?;
        writeln!(f, "  Simulated Accuracy: {:.4}", self.accuracy)
    }
}

/// Create the parent directory of `path` if it has one
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write a report, creating its parent directory
pub fn write_report(path: &Path, report: &impl fmt::Display) -> Result<()> {
    ensure_parent_dir(path)?;
    fs::write(path, report.to_string())?;
    Ok(())
}

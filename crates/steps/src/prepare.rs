//! Data preparation step
//!
//! Simulates preparing raw data: the raw-data location is only logged, the
//! output is a synthetic table plus a summary report.

use std::fs;
use std::path::PathBuf;

use contracts::{DATASET_COLUMNS, PROCESSED_ROW_COUNT};
use rand::Rng;
use tracing::{info, instrument};

use crate::dataset;
use crate::error::Result;
use crate::report::{self, PreprocessingReport};

/// Inputs of the data preparation step
#[derive(Debug, Clone)]
pub struct PrepareDataArgs {
    /// Raw-data reference, used for logging only
    pub raw_data_path: String,
    /// Output directory artifact
    pub processed_data_path: PathBuf,
    /// Output report file
    pub preprocessing_report_path: PathBuf,
}

/// Outcome of a data preparation run
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareSummary {
    pub data_file: PathBuf,
    pub report_path: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

/// Run the data preparation step
///
/// Creates both output locations if missing and overwrites existing files.
#[instrument(
    name = "prepare_data",
    skip(args, rng),
    fields(raw_data_path = %args.raw_data_path)
)]
pub fn prepare_data<R: Rng>(args: &PrepareDataArgs, rng: &mut R) -> Result<PrepareSummary> {
    info!(raw_data_path = %args.raw_data_path, "simulating data preparation");

    fs::create_dir_all(&args.processed_data_path)?;
    report::ensure_parent_dir(&args.preprocessing_report_path)?;

    let rows = dataset::generate_rows(rng, PROCESSED_ROW_COUNT);
    let data_file = dataset::write_dataset(&args.processed_data_path, &rows)?;
    info!(path = %data_file.display(), "processed data saved");

    let preprocessing = PreprocessingReport {
        rows: rows.len(),
        columns: DATASET_COLUMNS.len(),
    };
    report::write_report(&args.preprocessing_report_path, &preprocessing)?;
    info!(
        path = %args.preprocessing_report_path.display(),
        "preprocessing report saved"
    );

    Ok(PrepareSummary {
        data_file,
        report_path: args.preprocessing_report_path.clone(),
        rows: preprocessing.rows,
        columns: preprocessing.columns,
    })
}

//! Model training step
//!
//! Fits the classifier on the whole processed table (no split) and reports
//! in-sample accuracy.

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{DatasetRow, MODEL_FILE_NAME};
use tracing::{info, instrument};

use crate::classifier::{LogisticModel, LogisticRegression};
use crate::dataset;
use crate::error::Result;
use crate::report::{self, TrainingMetricsReport};

/// Inputs of the model training step
#[derive(Debug, Clone)]
pub struct TrainModelArgs {
    /// Input directory artifact produced by data preparation
    pub processed_data_path: PathBuf,
    /// Output directory artifact
    pub trained_model_path: PathBuf,
    /// Output metrics file
    pub training_metrics_path: PathBuf,
}

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub model_file: PathBuf,
    pub metrics_path: PathBuf,
    pub rows: usize,
    pub accuracy: f64,
    pub iterations: usize,
}

/// Run the model training step
///
/// # Errors
/// - `ProcessedDataNotFound` when the contract file is absent
/// - `Training` when the classifier cannot be fitted (e.g. one class only)
#[instrument(
    name = "train_model",
    skip(args, estimator),
    fields(processed_data_path = %args.processed_data_path.display())
)]
pub fn train_model(args: &TrainModelArgs, estimator: &LogisticRegression) -> Result<TrainingSummary> {
    info!("simulating model training");

    let rows = dataset::read_dataset(&args.processed_data_path)?;
    let (x, y) = split_features_and_target(&rows);

    let model = estimator.fit(&x, &y)?;
    let accuracy = model.accuracy(&x, &y);
    info!(
        accuracy = format!("{accuracy:.4}"),
        iterations = model.n_iter,
        "model trained"
    );

    let model_file = save_model(&args.trained_model_path, &model)?;
    info!(path = %model_file.display(), "trained model saved");

    let metrics = TrainingMetricsReport {
        model_type: LogisticRegression::MODEL_TYPE.to_string(),
        accuracy,
    };
    report::write_report(&args.training_metrics_path, &metrics)?;
    info!(
        path = %args.training_metrics_path.display(),
        "training metrics report saved"
    );

    Ok(TrainingSummary {
        model_file,
        metrics_path: args.training_metrics_path.clone(),
        rows: rows.len(),
        accuracy,
        iterations: model.n_iter,
    })
}

/// Select `feature_a`, `feature_b` as features and `target` as label
pub fn split_features_and_target(rows: &[DatasetRow]) -> (Vec<[f64; 2]>, Vec<u8>) {
    rows.iter().map(|r| (r.features(), r.target)).unzip()
}

/// Serialize the model into `dir`, creating it if absent
pub fn save_model(dir: &Path, model: &LogisticModel) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(MODEL_FILE_NAME);
    fs::write(&path, bincode::serialize(model)?)?;
    Ok(path)
}

/// Load a model written by [`save_model`]
pub fn load_model(path: &Path) -> Result<LogisticModel> {
    let bytes = fs::read(path)?;
    Ok(bincode::deserialize(&bytes)?)
}

//! `train-model` step binary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use observability::{LogFormat, ObservabilityConfig};
use steps::{train_model, LogisticRegression, TrainModelArgs};
use tracing::info;

/// Train model component.
#[derive(Parser, Debug)]
#[command(name = "train-model", version)]
struct Args {
    /// Path to the processed data directory
    #[arg(long)]
    processed_data_path: PathBuf,

    /// Output path for the trained model directory
    #[arg(long)]
    trained_model_path: PathBuf,

    /// Output path for the training metrics file
    #[arg(long)]
    training_metrics_path: PathBuf,

    /// Location of the step logic this run was resolved from
    #[arg(long)]
    logic_script_path: Option<String>,

    /// Log output format
    #[arg(long, value_enum, default_value = "compact", env = "STEP_LOG_FORMAT")]
    log_format: LogFormat,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    observability::init_with_config(ObservabilityConfig::from_verbosity(
        args.log_format,
        args.verbose,
        false,
    ))?;

    if let Some(ref logic) = args.logic_script_path {
        info!(logic_script_path = %logic, "step logic reference");
    }

    let step_args = TrainModelArgs {
        processed_data_path: args.processed_data_path,
        trained_model_path: args.trained_model_path,
        training_metrics_path: args.training_metrics_path,
    };
    let summary = train_model(&step_args, &LogisticRegression::default())
        .context("Model training failed")?;

    info!(
        rows = summary.rows,
        accuracy = format!("{:.4}", summary.accuracy),
        model_file = %summary.model_file.display(),
        "model training finished"
    );
    Ok(())
}

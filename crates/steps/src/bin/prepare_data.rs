//! `prepare-data` step binary

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use observability::{LogFormat, ObservabilityConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use steps::{prepare_data, PrepareDataArgs};
use tracing::info;

/// Prepare data component.
#[derive(Parser, Debug)]
#[command(name = "prepare-data", version)]
struct Args {
    /// Path to the raw input data
    #[arg(long)]
    raw_data_path: String,

    /// Output path for the processed data (directory)
    #[arg(long)]
    processed_data_path: PathBuf,

    /// Output path for the preprocessing report (file)
    #[arg(long)]
    preprocessing_report_path: PathBuf,

    /// Location of the step logic this run was resolved from
    #[arg(long)]
    logic_script_path: Option<String>,

    /// Seed for the synthetic data generator
    #[arg(long, env = "PREPARE_DATA_SEED")]
    seed: Option<u64>,

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

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let step_args = PrepareDataArgs {
        raw_data_path: args.raw_data_path,
        processed_data_path: args.processed_data_path,
        preprocessing_report_path: args.preprocessing_report_path,
    };
    let summary = prepare_data(&step_args, &mut rng).context("Data preparation failed")?;

    info!(
        rows = summary.rows,
        columns = summary.columns,
        data_file = %summary.data_file.display(),
        "data preparation finished"
    );
    Ok(())
}

//! CLI argument definitions using clap.

use clap::Parser;
use observability::LogFormat;
use std::path::PathBuf;

/// Positional arguments, in order
pub const POSITIONAL_NAMES: [&str; 7] = [
    "project_id",
    "region",
    "pipeline_root_gcs_path",
    "raw_data_gcs_path",
    "prepare_data_logic_gcs_path",
    "train_model_logic_gcs_path",
    "service_account_email",
];

/// Pipeline Assembler - compile the training pipeline and submit a run
#[derive(Parser, Debug)]
#[command(
    name = "pipeline-assembler",
    author,
    version,
    about = "Compile the data preparation + training pipeline and submit it",
    long_about = "Compiles the two-step training pipeline into a portable template file,\n\
                  then submits a run of it to the managed pipeline service.\n\n\
                  Positional arguments: <project_id> <region> <pipeline_root_gcs_path> \
                  <raw_data_gcs_path> <prepare_data_logic_gcs_path> \
                  <train_model_logic_gcs_path> <service_account_email>"
)]
pub struct Cli {
    /// Positional arguments (see --help)
    #[arg(value_name = "ARGS", num_args = 0..)]
    pub args: Vec<String>,

    /// Path to configuration file (TOML or JSON); built-in defaults when absent
    #[arg(short, long, env = "PIPELINE_ASSEMBLER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the compiled template path from configuration
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Reuse cached step results for this run
    #[arg(long)]
    pub enable_caching: bool,

    /// Write the template and exit without submitting
    #[arg(long)]
    pub compile_only: bool,

    /// Seed for the display-name suffix
    #[arg(long, env = "PIPELINE_ASSEMBLER_SEED")]
    pub seed: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        env = "PIPELINE_ASSEMBLER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,
}

/// Usage line printed when positional arguments are missing
pub fn usage() -> String {
    let placeholders: Vec<String> = POSITIONAL_NAMES.iter().map(|n| format!("<{n}>")).collect();
    format!("Usage: pipeline-assembler {}", placeholders.join(" "))
}

/// The seven positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerArgs {
    pub project_id: String,
    pub region: String,
    pub pipeline_root: String,
    pub raw_data_path: String,
    pub prepare_data_logic_path: String,
    pub train_model_logic_path: String,
    pub service_account: String,
}

impl AssemblerArgs {
    /// `None` when fewer than seven values are given; extra values are ignored
    pub fn from_positionals(args: &[String]) -> Option<Self> {
        let [project_id, region, pipeline_root, raw_data_path, prepare, train, service_account, ..] =
            args
        else {
            return None;
        };
        Some(Self {
            project_id: project_id.clone(),
            region: region.clone(),
            pipeline_root: pipeline_root.clone(),
            raw_data_path: raw_data_path.clone(),
            prepare_data_logic_path: prepare.clone(),
            train_model_logic_path: train.clone(),
            service_account: service_account.clone(),
        })
    }
}

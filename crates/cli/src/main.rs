//! # Pipeline Assembler
//!
//! Command-line entry point.
//!
//! Compiles the two-step training pipeline into a template file and submits
//! a run of it to the managed pipeline service.

mod assemble;
mod cli;
mod error;

use std::process::ExitCode;

use clap::Parser;
use observability::ObservabilityConfig;
use tracing::{error, info, warn};

use cli::{AssemblerArgs, Cli, POSITIONAL_NAMES};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let Some(args) = AssemblerArgs::from_positionals(&cli.args) else {
        println!("{}", cli::usage());
        return ExitCode::FAILURE;
    };

    if let Err(e) = observability::init_with_config(ObservabilityConfig::from_verbosity(
        cli.log_format,
        cli.verbose,
        cli.quiet,
    )) {
        eprintln!("Failed to initialize logging: {e:#}");
        return ExitCode::FAILURE;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        project = %args.project_id,
        region = %args.region,
        "Pipeline assembler starting"
    );
    if cli.args.len() > POSITIONAL_NAMES.len() {
        warn!(
            extra = cli.args.len() - POSITIONAL_NAMES.len(),
            "Ignoring extra positional arguments"
        );
    }

    match assemble::assemble(&cli, &args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, parameter_mismatch = e.is_parameter_mismatch(), "Assembler failed");
            println!("{}", e.report());
            ExitCode::FAILURE
        }
    }
}

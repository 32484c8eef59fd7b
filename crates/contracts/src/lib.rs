//! # Contracts
//!
//! Frozen interface contracts shared by the pipeline crates.
//! Step binaries, the compiler and the submitter depend on this crate only,
//! never on each other.
//!
//! ## Artifact model
//! - Directory artifacts carry exactly one file with a fixed contract name
//!   ([`PROCESSED_DATA_FILE_NAME`], [`MODEL_FILE_NAME`])
//! - Report artifacts are single text files

mod artifact;
mod capability;
mod config;
mod error;
mod template;

pub use artifact::*;
pub use capability::StepCapability;
pub use config::*;
pub use error::*;
pub use template::*;

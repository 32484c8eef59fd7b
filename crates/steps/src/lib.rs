//! # Steps
//!
//! The two units of work of the training pipeline, each exposed as a library
//! function and as a standalone binary with a fixed CLI contract.
//!
//! - [`prepare::prepare_data`] writes the processed dataset and a report
//! - [`train::train_model`] fits the classifier and writes model and metrics
//!
//! Randomness is injected by the caller so runs can be made deterministic.

pub mod classifier;
pub mod dataset;
pub mod error;
pub mod prepare;
pub mod report;
pub mod train;

pub use classifier::{LogisticModel, LogisticRegression, TrainError};
pub use error::{Result, StepError};
pub use prepare::{prepare_data, PrepareDataArgs, PrepareSummary};
pub use train::{train_model, TrainModelArgs, TrainingSummary};

//! # Submitter
//!
//! Hands a compiled template to the managed pipeline service.
//!
//! Responsibilities:
//! - Build unique run display names from ordered revision sources
//! - Bind parameter values against the template signature
//! - Submit through a [`PipelineClient`] (REST or mock)

pub mod client;
pub mod error;
pub mod mock_client;
pub mod naming;
pub mod run;
pub mod vertex_client;

pub use client::{JobHandle, LocalPipelineClient, PipelineClient};
pub use error::{Result, SubmitError};
pub use mock_client::MockPipelineClient;
pub use naming::{display_name, resolve_revision, NameSource};
pub use run::{PipelineRun, RunOptions};
pub use vertex_client::{ClientSettings, VertexPipelineClient};

//! Pipeline service client abstraction
//!
//! Unified interface for the managed service client and the mock client.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::run::PipelineRun;

/// Handle to a submitted job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    /// Service resource name of the job
    pub resource_name: String,
    pub display_name: String,
    /// Job state as reported at submission time
    pub state: Option<String>,
}

/// Pipeline service client
#[trait_variant::make(PipelineClient: Send)]
pub trait LocalPipelineClient {
    /// Client name (used for logging)
    fn name(&self) -> &str;

    /// Submit a run, returning once the service has accepted it
    ///
    /// Does not wait for the run to finish.
    async fn submit(&self, run: &PipelineRun) -> Result<JobHandle>;
}

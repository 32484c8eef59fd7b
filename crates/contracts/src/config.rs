//! AssemblerConfig - Config Loader output
//!
//! Describes the pipeline identity, display-name sources, remote service
//! settings and the step registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::StepCapability;

/// Complete assembler configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Pipeline identity and compile output
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// Display-name revision sources
    #[serde(default)]
    pub naming: NamingConfig,

    /// Remote execution service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Step registry entries
    #[serde(default = "default_steps")]
    pub steps: Vec<StepConfig>,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineSettings::default(),
            naming: NamingConfig::default(),
            service: ServiceConfig::default(),
            steps: default_steps(),
        }
    }
}

/// Pipeline identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineSettings {
    /// Declared pipeline name, prefix of every run display name
    #[serde(default = "default_pipeline_name")]
    pub name: String,

    /// Human readable description embedded in the template
    #[serde(default = "default_description")]
    pub description: String,

    /// Compiled template file name
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Reuse cached step results on the service side
    #[serde(default)]
    pub enable_caching: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            name: default_pipeline_name(),
            description: default_description(),
            output_file: default_output_file(),
            enable_caching: false,
        }
    }
}

fn default_pipeline_name() -> String {
    "ml-training-pipeline".to_string()
}

fn default_description() -> String {
    "A minimal pipeline for data preparation and model training.".to_string()
}

fn default_output_file() -> String {
    "ml_training_pipeline.json".to_string()
}

/// Ordered revision sources for run display names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Environment variable names, first non-empty value wins
    #[serde(default = "default_name_sources")]
    pub sources: Vec<String>,

    /// Revision used when every source is empty or unset
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            sources: default_name_sources(),
            fallback: default_fallback(),
        }
    }
}

fn default_name_sources() -> Vec<String> {
    vec!["BUILD_ID".to_string(), "K_REVISION".to_string()]
}

fn default_fallback() -> String {
    "local".to_string()
}

/// Remote execution service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Override of `https://{region}-aiplatform.googleapis.com`
    #[serde(default)]
    pub api_endpoint: Option<String>,

    /// Environment variable holding the OAuth bearer token
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// Run the job as the service account given on the command line
    #[serde(default)]
    pub attach_service_account: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_endpoint: None,
            access_token_env: default_access_token_env(),
            attach_service_account: false,
        }
    }
}

fn default_access_token_env() -> String {
    "GOOGLE_OAUTH_ACCESS_TOKEN".to_string()
}

/// Step registry entry: capability -> container executable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    /// Capability this entry provides
    pub capability: StepCapability,

    /// Container image holding the step binaries
    pub image: String,

    /// Entry point command
    pub command: Vec<String>,

    /// Extra environment for the container
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

const DEFAULT_STEP_IMAGE: &str = "ml-pipeline-steps:latest";

fn default_steps() -> Vec<StepConfig> {
    vec![
        StepConfig {
            capability: StepCapability::DataPreparation,
            image: DEFAULT_STEP_IMAGE.to_string(),
            command: vec!["prepare-data".to_string()],
            env: BTreeMap::new(),
        },
        StepConfig {
            capability: StepCapability::Training,
            image: DEFAULT_STEP_IMAGE.to_string(),
            command: vec!["train-model".to_string()],
            env: BTreeMap::new(),
        },
    ]
}

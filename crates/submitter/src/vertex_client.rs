//! Managed pipeline service client (REST)
//!
//! Creates pipeline jobs through
//! `POST {endpoint}/v1/projects/{project}/locations/{location}/pipelineJobs`.

use std::collections::BTreeMap;
use std::time::Duration;

use contracts::PipelineTemplate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{JobHandle, PipelineClient};
use crate::error::{Result, SubmitError};
use crate::run::PipelineRun;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Where and as whom the client submits
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub project: String,
    pub location: String,
    /// Default output root when a run does not name one
    pub staging_bucket: String,
    /// Override of the regional endpoint
    pub api_endpoint: Option<String>,
    /// OAuth bearer token
    pub access_token: String,
}

impl ClientSettings {
    /// Read the bearer token from environment variable `variable`
    pub fn access_token_from_env(variable: &str) -> Result<String> {
        std::env::var(variable)
            .ok()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| SubmitError::MissingCredentials {
                variable: variable.to_string(),
            })
    }

    /// Service base URL
    pub fn base_url(&self) -> String {
        match &self.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        }
    }
}

/// Job creation request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePipelineJobRequest<'a> {
    display_name: &'a str,
    pipeline_spec: &'a PipelineTemplate,
    runtime_config: RuntimeConfig<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_account: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    labels: Option<&'a BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RuntimeConfig<'a> {
    gcs_output_directory: &'a str,
    parameter_values: &'a BTreeMap<String, Value>,
}

/// Subset of the job resource returned by the service
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PipelineJobResponse {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    state: Option<String>,
}

/// REST client for the managed pipeline service
#[derive(Debug, Clone)]
pub struct VertexPipelineClient {
    http: reqwest::Client,
    settings: ClientSettings,
}

impl VertexPipelineClient {
    /// Initialize a client bound to project, location and staging bucket
    pub fn init(settings: ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        info!(
            project = %settings.project,
            location = %settings.location,
            staging_bucket = %settings.staging_bucket,
            "pipeline client initialized"
        );
        Ok(Self { http, settings })
    }

    /// Job collection URL
    pub fn jobs_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/locations/{}/pipelineJobs",
            self.settings.base_url(),
            self.settings.project,
            self.settings.location
        )
    }

    fn request_body(&self, run: &PipelineRun) -> Result<Value> {
        let output_directory = if run.pipeline_root().is_empty() {
            self.settings.staging_bucket.as_str()
        } else {
            run.pipeline_root()
        };
        let request = CreatePipelineJobRequest {
            display_name: run.display_name(),
            pipeline_spec: run.template(),
            runtime_config: RuntimeConfig {
                gcs_output_directory: output_directory,
                parameter_values: run.parameter_values(),
            },
            service_account: run.options().service_account.as_deref(),
            labels: Some(&run.options().labels).filter(|labels| !labels.is_empty()),
        };
        Ok(serde_json::to_value(&request)?)
    }
}

impl PipelineClient for VertexPipelineClient {
    fn name(&self) -> &str {
        "vertex"
    }

    #[instrument(
        name = "vertex_pipeline_submit",
        skip(self, run),
        fields(display_name = %run.display_name(), project = %self.settings.project)
    )]
    async fn submit(&self, run: &PipelineRun) -> Result<JobHandle> {
        let url = self.jobs_url();
        let body = self.request_body(run)?;
        debug!(url = %url, "creating pipeline job");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.settings.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SubmitError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let job: PipelineJobResponse =
            response
                .json()
                .await
                .map_err(|e| SubmitError::InvalidResponse {
                    message: e.to_string(),
                })?;

        info!(job = %job.name, state = ?job.state, "pipeline job created");
        Ok(JobHandle {
            resource_name: job.name,
            display_name: job
                .display_name
                .unwrap_or_else(|| run.display_name().to_string()),
            state: job.state,
        })
    }
}

//! PipelineRun - one immutable submission instance

use std::collections::BTreeMap;

use contracts::PipelineTemplate;
use serde_json::Value;

use crate::error::{Result, SubmitError};

/// Per-run options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    /// Reuse cached step results
    pub enable_caching: bool,
    /// Identity the service runs the steps as
    pub service_account: Option<String>,
    /// Free-form run labels
    pub labels: BTreeMap<String, String>,
}

/// A run ready for submission
///
/// Parameter values have been checked against the template signature and
/// the cache policy has been applied to every task.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineRun {
    display_name: String,
    template: PipelineTemplate,
    pipeline_root: String,
    parameter_values: BTreeMap<String, Value>,
    options: RunOptions,
}

impl PipelineRun {
    /// Bind parameter values to a template
    ///
    /// # Errors
    /// `ParameterMismatch` for values naming undeclared parameters, or when a
    /// required parameter has no value
    pub fn new(
        display_name: impl Into<String>,
        mut template: PipelineTemplate,
        pipeline_root: impl Into<String>,
        parameter_values: BTreeMap<String, String>,
        options: RunOptions,
    ) -> Result<Self> {
        let declared = template.root_parameters();

        let unknown: Vec<&str> = parameter_values
            .keys()
            .filter(|name| !declared.contains_key(*name))
            .map(String::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(SubmitError::parameter_mismatch(format!(
                "unexpected parameters: {}",
                unknown.join(", ")
            )));
        }

        let missing: Vec<&str> = declared
            .iter()
            .filter(|(name, spec)| spec.is_required() && !parameter_values.contains_key(*name))
            .map(|(name, _)| name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(SubmitError::parameter_mismatch(format!(
                "missing required parameters: {}",
                missing.join(", ")
            )));
        }

        template.set_caching(options.enable_caching);

        Ok(Self {
            display_name: display_name.into(),
            template,
            pipeline_root: pipeline_root.into(),
            parameter_values: parameter_values
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            options,
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn template(&self) -> &PipelineTemplate {
        &self.template
    }

    pub fn pipeline_root(&self) -> &str {
        &self.pipeline_root
    }

    pub fn parameter_values(&self) -> &BTreeMap<String, Value> {
        &self.parameter_values
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }
}

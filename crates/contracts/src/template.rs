//! PipelineTemplate - Compiler output
//!
//! Portable JSON representation of the step graph, submittable to the
//! managed execution service without re-declaring the graph in code.
//! Field names follow the service's camelCase pipeline spec.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ArtifactKind;

/// Template schema version emitted by the compiler
pub const TEMPLATE_SCHEMA_VERSION: &str = "2.1.0";

/// Compiled pipeline template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTemplate {
    pub pipeline_info: PipelineInfo,
    pub schema_version: String,
    pub sdk_version: String,
    pub root: RootSpec,
    pub components: BTreeMap<String, ComponentDefinition>,
    pub deployment_spec: DeploymentSpec,
}

impl PipelineTemplate {
    /// Declared pipeline-level parameters
    pub fn root_parameters(&self) -> &BTreeMap<String, ParameterSpec> {
        &self.root.input_definitions.parameters
    }

    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&TaskSpec> {
        self.root.dag.tasks.get(name)
    }

    /// Set the cache policy of every task
    pub fn set_caching(&mut self, enabled: bool) {
        for task in self.root.dag.tasks.values_mut() {
            task.caching_options.enable_cache = enabled;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootSpec {
    pub input_definitions: InputDefinitions,
    pub dag: DagSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputDefinitions {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParameterSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputDefinitions {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactSpec>,
}

/// Declared parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterSpec {
    pub parameter_type: ParameterType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_optional: bool,
}

impl ParameterSpec {
    /// Required string parameter
    pub fn string() -> Self {
        Self {
            parameter_type: ParameterType::String,
            default_value: None,
            is_optional: false,
        }
    }

    /// String parameter with a default value
    pub fn string_with_default(default: impl Into<String>) -> Self {
        Self {
            parameter_type: ParameterType::String,
            default_value: Some(serde_json::Value::String(default.into())),
            is_optional: true,
        }
    }

    /// Whether a run must bind this parameter
    pub fn is_required(&self) -> bool {
        !self.is_optional && self.default_value.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    String,
    NumberInteger,
    NumberDouble,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSpec {
    pub artifact_type: ArtifactType,
}

impl From<ArtifactKind> for ArtifactSpec {
    fn from(kind: ArtifactKind) -> Self {
        Self {
            artifact_type: ArtifactType {
                schema_title: kind.schema_title().to_string(),
                schema_version: kind.schema_version().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactType {
    pub schema_title: String,
    pub schema_version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DagSpec {
    pub tasks: BTreeMap<String, TaskSpec>,
}

/// One node of the compiled graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSpec {
    pub component_ref: ComponentRef,
    pub inputs: TaskInputs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependent_tasks: Vec<String>,
    pub task_info: TaskInfo,
    pub caching_options: CachingOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachingOptions {
    pub enable_cache: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskInputs {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<String, ParameterBinding>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub artifacts: BTreeMap<String, ArtifactBinding>,
}

/// Task parameter fed from a pipeline-level parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterBinding {
    pub component_input_parameter: String,
}

/// Task artifact fed by reference from an upstream task output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBinding {
    pub task_output_artifact: TaskOutputArtifact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskOutputArtifact {
    pub producer_task: String,
    pub output_artifact_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentDefinition {
    #[serde(default)]
    pub input_definitions: InputDefinitions,
    #[serde(default)]
    pub output_definitions: OutputDefinitions,
    pub executor_label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeploymentSpec {
    pub executors: BTreeMap<String, ExecutorSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorSpec {
    pub container: ContainerSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerSpec {
    pub image: String,
    pub command: Vec<String>,
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
}

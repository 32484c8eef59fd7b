//! Pipeline graph declaration
//!
//! Nodes are component instances; edges are artifact references from an
//! upstream task output to a downstream task input. Nothing is copied at
//! definition time.

use std::collections::BTreeMap;

use contracts::ParameterSpec;

use crate::component::{prepare_data_component, train_model_component, ComponentDecl};

/// Pipeline-level parameter names bound at submission time
pub mod params {
    pub const PIPELINE_ROOT: &str = "pipeline_root";
    pub const RAW_DATA_PATH: &str = "raw_data_gcs_path";
    pub const PREPARE_DATA_LOGIC_PATH: &str = "prepare_data_logic_gcs_path";
    pub const TRAIN_MODEL_LOGIC_PATH: &str = "train_model_logic_gcs_path";
}

/// Task names of the training graph
pub mod tasks {
    pub const PREPARE_DATA: &str = "prepare-data";
    pub const TRAIN_MODEL: &str = "train-model";
}

/// Where a task input comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A pipeline-level parameter
    Parameter(String),
    /// An output artifact of an upstream task
    TaskOutput { task: String, output: String },
}

impl InputSource {
    pub fn parameter(name: &str) -> Self {
        Self::Parameter(name.to_string())
    }

    pub fn task_output(task: &str, output: &str) -> Self {
        Self::TaskOutput {
            task: task.to_string(),
            output: output.to_string(),
        }
    }
}

/// One node of the graph
#[derive(Debug, Clone, PartialEq)]
pub struct TaskNode {
    pub name: String,
    pub component: ComponentDecl,
    pub inputs: BTreeMap<String, InputSource>,
}

impl TaskNode {
    pub fn new(name: impl Into<String>, component: ComponentDecl) -> Self {
        Self {
            name: name.into(),
            component,
            inputs: BTreeMap::new(),
        }
    }

    /// Bind a component input
    pub fn input(mut self, name: &str, source: InputSource) -> Self {
        self.inputs.insert(name.to_string(), source);
        self
    }
}

/// Declared pipeline: signature plus tasks in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineDefinition {
    pub name: String,
    pub description: Option<String>,
    pub parameters: BTreeMap<String, ParameterSpec>,
    pub tasks: Vec<TaskNode>,
}

impl PipelineDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: BTreeMap::new(),
            tasks: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameter(mut self, name: &str, spec: ParameterSpec) -> Self {
        self.parameters.insert(name.to_string(), spec);
        self
    }

    pub fn task(mut self, task: TaskNode) -> Self {
        self.tasks.push(task);
        self
    }
}

/// The two-step training pipeline
///
/// `prepare-data.processed_data` feeds `train-model.processed_data`.
pub fn training_pipeline(name: &str, description: &str) -> PipelineDefinition {
    let prepare = TaskNode::new(tasks::PREPARE_DATA, prepare_data_component())
        .input("raw_data_path", InputSource::parameter(params::RAW_DATA_PATH))
        .input(
            "logic_script_path",
            InputSource::parameter(params::PREPARE_DATA_LOGIC_PATH),
        );

    let train = TaskNode::new(tasks::TRAIN_MODEL, train_model_component())
        .input(
            "processed_data",
            InputSource::task_output(tasks::PREPARE_DATA, "processed_data"),
        )
        .input(
            "logic_script_path",
            InputSource::parameter(params::TRAIN_MODEL_LOGIC_PATH),
        );

    PipelineDefinition::new(name)
        .description(description)
        .parameter(params::PIPELINE_ROOT, ParameterSpec::string())
        .parameter(params::RAW_DATA_PATH, ParameterSpec {
            is_optional: true,
            ..ParameterSpec::string()
        })
        .parameter(
            params::PREPARE_DATA_LOGIC_PATH,
            ParameterSpec::string_with_default(""),
        )
        .parameter(
            params::TRAIN_MODEL_LOGIC_PATH,
            ParameterSpec::string_with_default(""),
        )
        .task(prepare)
        .task(train)
}

//! Step component declarations
//!
//! A component is the typed interface of one step: the parameters and
//! artifacts it consumes, the artifacts it produces, and how they map onto
//! the step binary's command line.

use std::collections::BTreeMap;

use contracts::{ArtifactKind, StepCapability};

/// Runtime value substituted by the execution service into container args
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placeholder {
    InputParameter(String),
    InputArtifactPath(String),
    OutputArtifactPath(String),
}

impl Placeholder {
    /// Render in the service's placeholder syntax
    pub fn render(&self) -> String {
        match self {
            Self::InputParameter(name) => format!("{{{{$.inputs.parameters['{name}']}}}}"),
            Self::InputArtifactPath(name) => {
                format!("{{{{$.inputs.artifacts['{name}'].path}}}}")
            }
            Self::OutputArtifactPath(name) => {
                format!("{{{{$.outputs.artifacts['{name}'].path}}}}")
            }
        }
    }
}

/// Typed interface of a step
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub name: String,
    pub capability: StepCapability,
    /// String parameters
    pub parameters: Vec<String>,
    pub input_artifacts: BTreeMap<String, ArtifactKind>,
    pub output_artifacts: BTreeMap<String, ArtifactKind>,
    /// `(flag, value)` pairs in command-line order
    pub args: Vec<(String, Placeholder)>,
}

impl ComponentDecl {
    pub fn new(name: impl Into<String>, capability: StepCapability) -> Self {
        Self {
            name: name.into(),
            capability,
            parameters: Vec::new(),
            input_artifacts: BTreeMap::new(),
            output_artifacts: BTreeMap::new(),
            args: Vec::new(),
        }
    }

    /// Declare a string parameter passed as `flag`
    pub fn parameter(mut self, name: &str, flag: &str) -> Self {
        self.parameters.push(name.to_string());
        self.args
            .push((flag.to_string(), Placeholder::InputParameter(name.to_string())));
        self
    }

    /// Declare an input artifact whose local path is passed as `flag`
    pub fn input_artifact(mut self, name: &str, kind: ArtifactKind, flag: &str) -> Self {
        self.input_artifacts.insert(name.to_string(), kind);
        self.args
            .push((flag.to_string(), Placeholder::InputArtifactPath(name.to_string())));
        self
    }

    /// Declare an output artifact whose local path is passed as `flag`
    pub fn output_artifact(mut self, name: &str, kind: ArtifactKind, flag: &str) -> Self {
        self.output_artifacts.insert(name.to_string(), kind);
        self.args
            .push((flag.to_string(), Placeholder::OutputArtifactPath(name.to_string())));
        self
    }

    /// Key under `components` in the template
    pub fn component_key(&self) -> String {
        format!("comp-{}", self.name)
    }

    /// Key under `deploymentSpec.executors` in the template
    pub fn executor_label(&self) -> String {
        format!("exec-{}", self.name)
    }

    /// Whether `name` is a declared input of any kind
    pub fn has_input(&self, name: &str) -> bool {
        self.parameters.iter().any(|p| p == name) || self.input_artifacts.contains_key(name)
    }

    /// Flattened container args
    pub fn render_args(&self) -> Vec<String> {
        self.args
            .iter()
            .flat_map(|(flag, value)| [flag.clone(), value.render()])
            .collect()
    }
}

/// Data preparation: raw-data reference in, dataset and report out
pub fn prepare_data_component() -> ComponentDecl {
    ComponentDecl::new("prepare-data", StepCapability::DataPreparation)
        .parameter("raw_data_path", "--raw-data-path")
        .output_artifact("processed_data", ArtifactKind::Dataset, "--processed-data-path")
        .output_artifact(
            "preprocessing_report",
            ArtifactKind::Artifact,
            "--preprocessing-report-path",
        )
        .parameter("logic_script_path", "--logic-script-path")
}

/// Model training: dataset in, model and metrics out
pub fn train_model_component() -> ComponentDecl {
    ComponentDecl::new("train-model", StepCapability::Training)
        .input_artifact("processed_data", ArtifactKind::Dataset, "--processed-data-path")
        .output_artifact("trained_model", ArtifactKind::Model, "--trained-model-path")
        .output_artifact(
            "training_metrics",
            ArtifactKind::Artifact,
            "--training-metrics-path",
        )
        .parameter("logic_script_path", "--logic-script-path")
}

//! Graph -> template compilation

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use contracts::{
    ArtifactBinding, ArtifactKind, ArtifactSpec, CachingOptions, ComponentDefinition,
    ComponentRef, ContainerSpec, DagSpec, DeploymentSpec, EnvVar, ExecutorSpec,
    InputDefinitions, OutputDefinitions, ParameterBinding, ParameterSpec, PipelineInfo,
    PipelineTemplate, RootSpec, TaskInfo, TaskInputs, TaskOutputArtifact, TaskSpec,
    TEMPLATE_SCHEMA_VERSION,
};
use tracing::{debug, info, instrument};

use crate::component::ComponentDecl;
use crate::error::{CompileError, Result};
use crate::graph::{InputSource, PipelineDefinition, TaskNode};
use crate::registry::{StepExecutor, StepRegistry};

const SDK_VERSION: &str = concat!("pipeline-compiler-", env!("CARGO_PKG_VERSION"));

/// Pipeline compiler
///
/// Borrows the registry used to resolve node capabilities.
pub struct Compiler<'a> {
    registry: &'a StepRegistry,
}

impl<'a> Compiler<'a> {
    pub fn new(registry: &'a StepRegistry) -> Self {
        Self { registry }
    }

    /// Compile and write the template as pretty JSON to `path`
    #[instrument(name = "compiler_compile_to_path", skip(self, definition), fields(path = %path.display()))]
    pub fn compile_to_path(
        &self,
        definition: &PipelineDefinition,
        path: &Path,
    ) -> Result<PipelineTemplate> {
        let template = self.compile(definition)?;
        let json = serde_json::to_string_pretty(&template)?;
        fs::write(path, json)?;
        info!(tasks = template.root.dag.tasks.len(), "template written");
        Ok(template)
    }

    /// Compile a pipeline definition into a template
    ///
    /// # Errors
    /// - `ParameterMismatch` when task bindings disagree with a component or
    ///   the pipeline signature
    /// - `UnresolvedCapability` when a node's step is not registered
    /// - `InvalidGraph` on duplicate tasks or broken artifact references
    #[instrument(name = "compiler_compile", skip(self, definition), fields(pipeline = %definition.name))]
    pub fn compile(&self, definition: &PipelineDefinition) -> Result<PipelineTemplate> {
        let mut tasks = BTreeMap::new();
        let mut components = BTreeMap::new();
        let mut executors = BTreeMap::new();
        let mut compiled: HashMap<&str, &ComponentDecl> = HashMap::new();

        for node in &definition.tasks {
            if compiled.contains_key(node.name.as_str()) {
                return Err(CompileError::invalid_graph(format!(
                    "duplicate task name '{}'",
                    node.name
                )));
            }

            let executor = self.registry.resolve(node.component.capability)?;
            let task = compile_task(definition, node, &compiled)?;
            debug!(
                task = %node.name,
                capability = %node.component.capability,
                image = %executor.image,
                "task compiled"
            );

            components
                .entry(node.component.component_key())
                .or_insert_with(|| component_definition(&node.component));
            executors
                .entry(node.component.executor_label())
                .or_insert_with(|| executor_spec(&node.component, executor));
            tasks.insert(node.name.clone(), task);
            compiled.insert(node.name.as_str(), &node.component);
        }

        Ok(PipelineTemplate {
            pipeline_info: PipelineInfo {
                name: definition.name.clone(),
                description: definition.description.clone(),
            },
            schema_version: TEMPLATE_SCHEMA_VERSION.to_string(),
            sdk_version: SDK_VERSION.to_string(),
            root: RootSpec {
                input_definitions: InputDefinitions {
                    parameters: definition.parameters.clone(),
                    artifacts: BTreeMap::new(),
                },
                dag: DagSpec { tasks },
            },
            components,
            deployment_spec: DeploymentSpec { executors },
        })
    }
}

fn compile_task(
    definition: &PipelineDefinition,
    node: &TaskNode,
    upstream: &HashMap<&str, &ComponentDecl>,
) -> Result<TaskSpec> {
    let component = &node.component;
    let mut inputs = TaskInputs::default();
    let mut dependent_tasks: Vec<String> = Vec::new();

    for (input, source) in &node.inputs {
        if !component.has_input(input) {
            return Err(CompileError::parameter_mismatch(
                &node.name,
                format!("component '{}' has no input named '{input}'", component.name),
            ));
        }

        match source {
            InputSource::Parameter(param) => {
                if !component.parameters.contains(input) {
                    return Err(CompileError::parameter_mismatch(
                        &node.name,
                        format!("input '{input}' is an artifact but is bound to parameter '{param}'"),
                    ));
                }
                if !definition.parameters.contains_key(param) {
                    return Err(CompileError::parameter_mismatch(
                        &node.name,
                        format!("input '{input}' references undeclared pipeline parameter '{param}'"),
                    ));
                }
                inputs.parameters.insert(
                    input.clone(),
                    ParameterBinding {
                        component_input_parameter: param.clone(),
                    },
                );
            }
            InputSource::TaskOutput { task, output } => {
                let expected = component.input_artifacts.get(input).copied().ok_or_else(|| {
                    CompileError::parameter_mismatch(
                        &node.name,
                        format!("input '{input}' is a parameter but is bound to an artifact"),
                    )
                })?;
                let producer = upstream.get(task.as_str()).ok_or_else(|| {
                    CompileError::invalid_graph(format!(
                        "task '{}' consumes output of unknown or later task '{task}'",
                        node.name
                    ))
                })?;
                let produced = producer.output_artifacts.get(output).copied().ok_or_else(|| {
                    CompileError::invalid_graph(format!(
                        "task '{task}' has no output artifact '{output}'"
                    ))
                })?;
                check_artifact_kinds(&node.name, input, expected, produced)?;

                inputs.artifacts.insert(
                    input.clone(),
                    ArtifactBinding {
                        task_output_artifact: TaskOutputArtifact {
                            producer_task: task.clone(),
                            output_artifact_key: output.clone(),
                        },
                    },
                );
                if !dependent_tasks.contains(task) {
                    dependent_tasks.push(task.clone());
                }
            }
        }
    }

    let unbound: Vec<&str> = component
        .parameters
        .iter()
        .map(String::as_str)
        .chain(component.input_artifacts.keys().map(String::as_str))
        .filter(|name| !node.inputs.contains_key(*name))
        .collect();
    if !unbound.is_empty() {
        return Err(CompileError::parameter_mismatch(
            &node.name,
            format!("missing required inputs: {}", unbound.join(", ")),
        ));
    }

    Ok(TaskSpec {
        component_ref: ComponentRef {
            name: component.component_key(),
        },
        inputs,
        dependent_tasks,
        task_info: TaskInfo {
            name: node.name.clone(),
        },
        caching_options: CachingOptions { enable_cache: true },
    })
}

fn check_artifact_kinds(
    task: &str,
    input: &str,
    expected: ArtifactKind,
    produced: ArtifactKind,
) -> Result<()> {
    if expected == produced {
        Ok(())
    } else {
        Err(CompileError::invalid_graph(format!(
            "task '{task}' input '{input}' expects {} but is bound to {}",
            expected.schema_title(),
            produced.schema_title()
        )))
    }
}

fn component_definition(component: &ComponentDecl) -> ComponentDefinition {
    ComponentDefinition {
        input_definitions: InputDefinitions {
            parameters: component
                .parameters
                .iter()
                .map(|p| (p.clone(), ParameterSpec::string()))
                .collect(),
            artifacts: artifact_specs(&component.input_artifacts),
        },
        output_definitions: OutputDefinitions {
            artifacts: artifact_specs(&component.output_artifacts),
        },
        executor_label: component.executor_label(),
    }
}

fn artifact_specs(artifacts: &BTreeMap<String, ArtifactKind>) -> BTreeMap<String, ArtifactSpec> {
    artifacts
        .iter()
        .map(|(name, kind)| (name.clone(), ArtifactSpec::from(*kind)))
        .collect()
}

fn executor_spec(component: &ComponentDecl, executor: &StepExecutor) -> ExecutorSpec {
    ExecutorSpec {
        container: ContainerSpec {
            image: executor.image.clone(),
            command: executor.command.clone(),
            args: component.render_args(),
            env: executor
                .env
                .iter()
                .map(|(name, value)| EnvVar {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{prepare_data_component, train_model_component};
    use crate::graph::{params, tasks, training_pipeline};
    use contracts::{AssemblerConfig, StepCapability};

    fn registry() -> StepRegistry {
        StepRegistry::from_config(&AssemblerConfig::default().steps).unwrap()
    }

    #[test]
    fn test_compile_training_pipeline() {
        let registry = registry();
        let template = Compiler::new(&registry)
            .compile(&training_pipeline("ml-training-pipeline", "demo"))
            .unwrap();

        assert_eq!(template.pipeline_info.name, "ml-training-pipeline");
        assert_eq!(template.schema_version, TEMPLATE_SCHEMA_VERSION);
        assert_eq!(template.root_parameters().len(), 4);
        assert_eq!(template.components.len(), 2);
        assert_eq!(template.deployment_spec.executors.len(), 2);

        let train = template.task(tasks::TRAIN_MODEL).unwrap();
        assert_eq!(train.dependent_tasks, vec![tasks::PREPARE_DATA]);
        let binding = &train.inputs.artifacts["processed_data"].task_output_artifact;
        assert_eq!(binding.producer_task, tasks::PREPARE_DATA);
        assert_eq!(binding.output_artifact_key, "processed_data");
        assert_eq!(
            train.inputs.parameters["logic_script_path"].component_input_parameter,
            params::TRAIN_MODEL_LOGIC_PATH
        );

        let prepare = template.task(tasks::PREPARE_DATA).unwrap();
        assert!(prepare.dependent_tasks.is_empty());
        assert!(prepare.caching_options.enable_cache);
    }

    #[test]
    fn test_executor_uses_registry_entry() {
        let mut registry = registry();
        registry.register(
            StepCapability::Training,
            StepExecutor {
                image: "custom/trainer:2".into(),
                command: vec!["/bin/train".into()],
                env: [("RUST_LOG".to_string(), "debug".to_string())].into(),
            },
        );
        let template = Compiler::new(&registry)
            .compile(&training_pipeline("p", "d"))
            .unwrap();

        let container = &template.deployment_spec.executors["exec-train-model"].container;
        assert_eq!(container.image, "custom/trainer:2");
        assert_eq!(container.command, vec!["/bin/train"]);
        assert_eq!(container.env[0].name, "RUST_LOG");
        assert!(container
            .args
            .contains(&"{{$.inputs.artifacts['processed_data'].path}}".to_string()));
    }

    #[test]
    fn test_unresolved_capability() {
        let mut registry = StepRegistry::new();
        registry.register(
            StepCapability::DataPreparation,
            StepExecutor {
                image: "i".into(),
                command: vec!["prepare-data".into()],
                env: BTreeMap::new(),
            },
        );
        let err = Compiler::new(&registry)
            .compile(&training_pipeline("p", "d"))
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnresolvedCapability {
                capability: StepCapability::Training
            }
        ));
    }

    #[test]
    fn test_undeclared_pipeline_parameter() {
        let registry = registry();
        let mut def = training_pipeline("p", "d");
        def.parameters.remove(params::RAW_DATA_PATH);
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(err.is_parameter_mismatch(), "got: {err}");
        assert!(err.to_string().contains("raw_data_gcs_path"));
    }

    #[test]
    fn test_unknown_component_input() {
        let registry = registry();
        let mut def = training_pipeline("p", "d");
        def.tasks[0]
            .inputs
            .insert("learning_rate".into(), InputSource::parameter(params::PIPELINE_ROOT));
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(err.is_parameter_mismatch());
        assert!(err.to_string().contains("learning_rate"));
    }

    #[test]
    fn test_missing_component_input() {
        let registry = registry();
        let mut def = training_pipeline("p", "d");
        def.tasks[1].inputs.remove("processed_data");
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(err.is_parameter_mismatch());
        assert!(err.to_string().contains("missing required inputs: processed_data"));
    }

    #[test]
    fn test_artifact_from_later_task() {
        let registry = registry();
        let mut def = training_pipeline("p", "d");
        def.tasks.reverse();
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(matches!(err, CompileError::InvalidGraph { .. }), "got: {err}");
    }

    #[test]
    fn test_artifact_kind_mismatch() {
        let registry = registry();
        let def = PipelineDefinition::new("p")
            .parameter(params::RAW_DATA_PATH, ParameterSpec::string())
            .parameter(params::PREPARE_DATA_LOGIC_PATH, ParameterSpec::string())
            .parameter(params::TRAIN_MODEL_LOGIC_PATH, ParameterSpec::string())
            .task(
                TaskNode::new("prep", prepare_data_component())
                    .input("raw_data_path", InputSource::parameter(params::RAW_DATA_PATH))
                    .input(
                        "logic_script_path",
                        InputSource::parameter(params::PREPARE_DATA_LOGIC_PATH),
                    ),
            )
            .task(
                TaskNode::new("train", train_model_component())
                    .input(
                        "processed_data",
                        InputSource::task_output("prep", "preprocessing_report"),
                    )
                    .input(
                        "logic_script_path",
                        InputSource::parameter(params::TRAIN_MODEL_LOGIC_PATH),
                    ),
            );
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(err.to_string().contains("expects system.Dataset"), "got: {err}");
    }

    #[test]
    fn test_duplicate_task_name() {
        let registry = registry();
        let mut def = training_pipeline("p", "d");
        let first = def.tasks[0].clone();
        def.tasks.push(first);
        let err = Compiler::new(&registry).compile(&def).unwrap_err();
        assert!(err.to_string().contains("duplicate task name"));
    }

    #[test]
    fn test_compile_to_path_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ml_training_pipeline.json");
        let registry = registry();
        let template = Compiler::new(&registry)
            .compile_to_path(&training_pipeline("ml-training-pipeline", "demo"), &path)
            .unwrap();

        let written: PipelineTemplate =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, template);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw["root"]["dag"]["tasks"]["train-model"]["dependentTasks"].is_array());
        assert_eq!(raw["pipelineInfo"]["name"], "ml-training-pipeline");
    }
}

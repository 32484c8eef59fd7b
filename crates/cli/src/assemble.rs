//! Compile → submit sequence.

use std::collections::BTreeMap;
use std::path::PathBuf;

use compiler::graph::params;
use compiler::{training_pipeline, Compiler, StepRegistry};
use config_loader::ConfigLoader;
use contracts::{AssemblerConfig, PipelineTemplate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use submitter::{
    display_name, ClientSettings, JobHandle, NameSource, PipelineClient, PipelineRun, RunOptions,
    VertexPipelineClient,
};
use tracing::{info, instrument};

use crate::cli::{AssemblerArgs, Cli};
use crate::error::Result;

/// Settings derived from the CLI flags and the configuration file
#[derive(Debug, Clone)]
pub struct Assembly {
    pub config: AssemblerConfig,
    pub output: PathBuf,
    pub enable_caching: bool,
    pub seed: Option<u64>,
}

impl Assembly {
    /// Load configuration and apply CLI overrides
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if let Some(ref path) = cli.config {
            info!(config = %path.display(), "Loading configuration");
        }
        let config = ConfigLoader::load_or_default(cli.config.as_deref())?;
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.pipeline.output_file));
        Ok(Self {
            enable_caching: config.pipeline.enable_caching || cli.enable_caching,
            output,
            seed: cli.seed,
            config,
        })
    }

    /// Compile the training pipeline and write the template
    #[instrument(name = "assembler_compile", skip(self), fields(output = %self.output.display()))]
    pub fn compile(&self) -> Result<PipelineTemplate> {
        let registry = StepRegistry::from_config(&self.config.steps)?;
        let definition = training_pipeline(
            &self.config.pipeline.name,
            &self.config.pipeline.description,
        );
        info!("Compiling pipeline to {}", self.output.display());
        let template = Compiler::new(&registry).compile_to_path(&definition, &self.output)?;
        info!("Pipeline compiled successfully to {}", self.output.display());
        Ok(template)
    }

    /// Unique run display name from the configured environment sources
    pub fn display_name(&self) -> String {
        let sources: Vec<NameSource> = self
            .config
            .naming
            .sources
            .iter()
            .map(|name| NameSource::from_env(name))
            .collect();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        display_name(
            &self.config.pipeline.name,
            &sources,
            &self.config.naming.fallback,
            &mut rng,
        )
    }

    /// Bind the positional arguments to the template
    pub fn build_run(&self, template: PipelineTemplate, args: &AssemblerArgs) -> Result<PipelineRun> {
        let parameter_values: BTreeMap<String, String> = [
            (params::PIPELINE_ROOT, &args.pipeline_root),
            (params::RAW_DATA_PATH, &args.raw_data_path),
            (params::PREPARE_DATA_LOGIC_PATH, &args.prepare_data_logic_path),
            (params::TRAIN_MODEL_LOGIC_PATH, &args.train_model_logic_path),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();

        let options = RunOptions {
            enable_caching: self.enable_caching,
            service_account: self
                .config
                .service
                .attach_service_account
                .then(|| args.service_account.clone()),
            labels: BTreeMap::new(),
        };

        Ok(PipelineRun::new(
            self.display_name(),
            template,
            &args.pipeline_root,
            parameter_values,
            options,
        )?)
    }

    /// Initialize the managed service client for the given project and region
    pub fn client(&self, args: &AssemblerArgs) -> Result<VertexPipelineClient> {
        let access_token = ClientSettings::access_token_from_env(&self.config.service.access_token_env)?;
        let client = VertexPipelineClient::init(ClientSettings {
            project: args.project_id.clone(),
            location: args.region.clone(),
            staging_bucket: args.pipeline_root.clone(),
            api_endpoint: self.config.service.api_endpoint.clone(),
            access_token,
        })?;
        Ok(client)
    }
}

/// Submit a run through any pipeline client
#[instrument(name = "assembler_submit", skip(client, run), fields(client = client.name()))]
pub async fn submit_run<C: PipelineClient>(client: &C, run: &PipelineRun) -> Result<JobHandle> {
    info!(
        display_name = %run.display_name(),
        caching = run.options().enable_caching,
        "Submitting pipeline job: {}...",
        run.display_name()
    );
    let job = client.submit(run).await?;
    info!(job = %job.resource_name, state = ?job.state, "Pipeline job submitted");
    Ok(job)
}

/// Full assembler run
pub async fn assemble(cli: &Cli, args: &AssemblerArgs) -> Result<Option<JobHandle>> {
    let assembly = Assembly::from_cli(cli)?;
    info!(
        prepare_data_logic = %args.prepare_data_logic_path,
        train_model_logic = %args.train_model_logic_path,
        "Step logic locations"
    );

    let template = assembly.compile()?;
    if cli.compile_only {
        info!("Compile-only mode, skipping submission");
        return Ok(None);
    }

    let run = assembly.build_run(template, args)?;
    let client = assembly.client(args)?;
    submit_run(&client, &run).await.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use submitter::MockPipelineClient;
    use tempfile::tempdir;

    fn positionals() -> Vec<String> {
        [
            "demo-project",
            "us-central1",
            "gs://bucket/root",
            "gs://bucket/raw.csv",
            "gs://bucket/logic/prepare.py",
            "gs://bucket/logic/train.py",
            "runner@demo-project.iam.gserviceaccount.com",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }

    fn cli(extra: &[&str]) -> Cli {
        let mut argv = vec!["pipeline-assembler".to_string()];
        argv.extend(extra.iter().map(|s| s.to_string()));
        argv.extend(positionals());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_compile_writes_template() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("ml_training_pipeline.json");
        let cli = cli(&["--output", output.to_str().unwrap()]);

        let assembly = Assembly::from_cli(&cli).unwrap();
        assert!(!assembly.enable_caching);
        let template = assembly.compile().unwrap();

        assert!(output.exists());
        assert_eq!(template.root.dag.tasks.len(), 2);
        assert_eq!(template.pipeline_info.name, "ml-training-pipeline");
    }

    #[test]
    fn test_run_disables_caching_and_binds_parameters() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&["--output", output.to_str().unwrap(), "--seed", "11"]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let assembly = Assembly::from_cli(&cli).unwrap();
        let run = assembly.build_run(assembly.compile().unwrap(), &args).unwrap();

        assert!(run
            .template()
            .root
            .dag
            .tasks
            .values()
            .all(|task| !task.caching_options.enable_cache));
        assert_eq!(run.pipeline_root(), "gs://bucket/root");
        assert_eq!(run.parameter_values().len(), 4);
        assert_eq!(
            run.parameter_values()[params::TRAIN_MODEL_LOGIC_PATH],
            "gs://bucket/logic/train.py"
        );
        assert!(run.display_name().starts_with("ml-training-pipeline-"));
        assert!(run.options().service_account.is_none());
    }

    #[test]
    fn test_caching_flag_enables_cache() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&["--output", output.to_str().unwrap(), "--enable-caching"]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let assembly = Assembly::from_cli(&cli).unwrap();
        let run = assembly.build_run(assembly.compile().unwrap(), &args).unwrap();
        assert!(run.options().enable_caching);
        assert!(run
            .template()
            .root
            .dag
            .tasks
            .values()
            .all(|task| task.caching_options.enable_cache));
    }

    #[test]
    fn test_seeded_display_names_repeat() {
        let cli = cli(&["--seed", "5"]);
        let assembly = Assembly::from_cli(&cli).unwrap();
        assert_eq!(assembly.display_name(), assembly.display_name());
    }

    #[test]
    fn test_service_account_attached_from_config() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("assembler.toml");
        std::fs::write(&config_path, "[service]\nattach_service_account = true\n").unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&[
            "--config",
            config_path.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let assembly = Assembly::from_cli(&cli).unwrap();
        let run = assembly.build_run(assembly.compile().unwrap(), &args).unwrap();
        assert_eq!(
            run.options().service_account.as_deref(),
            Some("runner@demo-project.iam.gserviceaccount.com")
        );
    }

    #[tokio::test]
    async fn test_submit_through_mock_client() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&["--output", output.to_str().unwrap()]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let assembly = Assembly::from_cli(&cli).unwrap();
        let run = assembly.build_run(assembly.compile().unwrap(), &args).unwrap();

        let client = MockPipelineClient::new();
        let job = submit_run(&client, &run).await.unwrap();
        assert_eq!(job.display_name, run.display_name());
        assert_eq!(client.submissions().len(), 1);
    }

    #[tokio::test]
    async fn test_rejected_submission_is_unexpected() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&["--output", output.to_str().unwrap()]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let assembly = Assembly::from_cli(&cli).unwrap();
        let run = assembly.build_run(assembly.compile().unwrap(), &args).unwrap();

        let err = submit_run(&MockPipelineClient::failing("quota exceeded"), &run)
            .await
            .unwrap_err();
        assert!(!err.is_parameter_mismatch());
    }

    #[tokio::test]
    async fn test_compile_only_skips_submission() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("template.json");
        let cli = cli(&["--output", output.to_str().unwrap(), "--compile-only"]);
        let args = AssemblerArgs::from_positionals(&cli.args).unwrap();

        let job = assemble(&cli, &args).await.unwrap();
        assert!(job.is_none());
        assert!(output.exists());
    }
}

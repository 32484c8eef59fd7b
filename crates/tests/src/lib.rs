//! # Integration Tests
//!
//! Cross-crate end-to-end tests.
//!
//! - Contract snapshot checks
//! - Data preparation → model training over a shared directory
//! - Compile → bind → mock submission

#[cfg(test)]
mod contract_tests {
    use contracts::{StepCapability, DATASET_COLUMNS, MODEL_FILE_NAME, PROCESSED_DATA_FILE_NAME};

    #[test]
    fn test_artifact_contract_names() {
        assert_eq!(PROCESSED_DATA_FILE_NAME, "processed_data.csv");
        assert_eq!(MODEL_FILE_NAME, "model.joblib");
        assert_eq!(DATASET_COLUMNS, ["feature_a", "feature_b", "target"]);
    }

    #[test]
    fn test_default_config_registers_every_capability() {
        let config = config_loader::ConfigLoader::load_or_default(None).unwrap();
        for capability in StepCapability::ALL {
            assert!(config.steps.iter().any(|s| s.capability == capability));
        }
    }
}

#[cfg(test)]
mod step_tests {
    use contracts::{FEATURE_B_UPPER, PROCESSED_ROW_COUNT};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use steps::dataset::read_dataset;
    use steps::train::load_model;
    use steps::{
        prepare_data, train_model, LogisticRegression, PrepareDataArgs, StepError,
        TrainModelArgs,
    };
    use tempfile::tempdir;

    /// Data preparation output consumed by model training
    #[test]
    fn test_e2e_prepare_then_train() {
        let root = tempdir().unwrap();
        let processed = root.path().join("artifacts/prepare-data/processed_data");

        let prepared = prepare_data(
            &PrepareDataArgs {
                raw_data_path: "gs://bucket/raw.csv".into(),
                processed_data_path: processed.clone(),
                preprocessing_report_path: root.path().join("reports/preprocessing.txt"),
            },
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();
        assert_eq!(prepared.rows, PROCESSED_ROW_COUNT);

        let rows = read_dataset(&processed).unwrap();
        assert_eq!(rows.len(), PROCESSED_ROW_COUNT);
        assert!(rows.iter().all(|r| (0.0..1.0).contains(&r.feature_a)));
        assert!(rows.iter().all(|r| (0..FEATURE_B_UPPER).contains(&r.feature_b)));
        assert!(rows.iter().all(|r| r.target <= 1));

        let trained = train_model(
            &TrainModelArgs {
                processed_data_path: processed,
                trained_model_path: root.path().join("artifacts/train-model/trained_model"),
                training_metrics_path: root.path().join("reports/metrics.txt"),
            },
            &LogisticRegression::default(),
        )
        .unwrap();

        assert_eq!(trained.rows, PROCESSED_ROW_COUNT);
        assert!((0.0..=1.0).contains(&trained.accuracy));
        assert!(trained.model_file.ends_with("model.joblib"));

        let model = load_model(&trained.model_file).unwrap();
        let recomputed = model.accuracy(
            &rows.iter().map(|r| r.features()).collect::<Vec<_>>(),
            &rows.iter().map(|r| r.target).collect::<Vec<_>>(),
        );
        assert!((recomputed - trained.accuracy).abs() < 1e-12);

        let metrics = std::fs::read_to_string(root.path().join("reports/metrics.txt")).unwrap();
        assert!(metrics.contains(&format!("{:.4}", trained.accuracy)));
    }

    #[test]
    fn test_train_without_prepared_data() {
        let root = tempdir().unwrap();
        let err = train_model(
            &TrainModelArgs {
                processed_data_path: root.path().join("never-written"),
                trained_model_path: root.path().join("model"),
                training_metrics_path: root.path().join("metrics.txt"),
            },
            &LogisticRegression::default(),
        )
        .unwrap_err();
        assert!(matches!(err, StepError::ProcessedDataNotFound { .. }));
        assert!(!root.path().join("model").exists());
    }
}

#[cfg(test)]
mod pipeline_tests {
    use std::collections::BTreeMap;

    use compiler::graph::{params, tasks};
    use compiler::{training_pipeline, Compiler, StepRegistry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use submitter::{display_name, MockPipelineClient, NameSource, PipelineClient, PipelineRun, RunOptions};
    use tempfile::tempdir;

    fn bindings() -> BTreeMap<String, String> {
        [
            (params::PIPELINE_ROOT, "gs://bucket/root"),
            (params::RAW_DATA_PATH, "gs://bucket/raw.csv"),
            (params::PREPARE_DATA_LOGIC_PATH, "gs://bucket/logic/prepare.py"),
            (params::TRAIN_MODEL_LOGIC_PATH, "gs://bucket/logic/train.py"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    /// Compile → PipelineRun → MockPipelineClient
    #[tokio::test]
    async fn test_e2e_compile_and_submit() {
        let config = config_loader::ConfigLoader::load_or_default(None).unwrap();
        let registry = StepRegistry::from_config(&config.steps).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join(&config.pipeline.output_file);

        let template = Compiler::new(&registry)
            .compile_to_path(
                &training_pipeline(&config.pipeline.name, &config.pipeline.description),
                &path,
            )
            .unwrap();

        // The written file is the template that was returned
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, serde_json::to_value(&template).unwrap());

        let name = display_name(
            &config.pipeline.name,
            &[NameSource::new("BUILD_ID", Some("1234".into()))],
            &config.naming.fallback,
            &mut StdRng::seed_from_u64(0),
        );
        let run = PipelineRun::new(
            name.clone(),
            template,
            "gs://bucket/root",
            bindings(),
            RunOptions::default(),
        )
        .unwrap();

        let client = MockPipelineClient::new();
        let job = client.submit(&run).await.unwrap();
        assert!(job.display_name.starts_with("ml-training-pipeline-1234-"));

        let submitted = client.submissions();
        assert_eq!(submitted.len(), 1);
        let submitted = &submitted[0];
        assert_eq!(submitted.display_name(), name);
        assert_eq!(submitted.parameter_values().len(), 4);

        let train = submitted.template().task(tasks::TRAIN_MODEL).unwrap();
        assert!(!train.caching_options.enable_cache);
        assert_eq!(train.dependent_tasks, vec![tasks::PREPARE_DATA.to_string()]);
    }

    #[test]
    fn test_e2e_unknown_binding_is_parameter_mismatch() {
        let config = config_loader::ConfigLoader::load_or_default(None).unwrap();
        let registry = StepRegistry::from_config(&config.steps).unwrap();
        let template = Compiler::new(&registry)
            .compile(&training_pipeline(&config.pipeline.name, &config.pipeline.description))
            .unwrap();

        let mut values = bindings();
        values.insert("learning_rate".into(), "0.1".into());
        let err = PipelineRun::new("run", template, "gs://bucket/root", values, RunOptions::default())
            .unwrap_err();
        assert!(err.is_parameter_mismatch());
    }
}

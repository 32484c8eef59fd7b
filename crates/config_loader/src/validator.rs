//! 配置校验模块
//!
//! 校验规则：
//! - pipeline name 非空，仅小写字母、数字和中间的 '-'
//! - output_file 以 `.json` 结尾
//! - naming sources 不能为空字符串，fallback 非空
//! - 每个 capability 只注册一次，两个 step capability 都必须存在
//! - step 的 image 与 command 非空

use std::collections::HashSet;

use contracts::{AssemblerConfig, ContractError, StepCapability};

/// 校验 AssemblerConfig
///
/// 返回遇到的第一个错误，全部通过则返回 Ok(())。
pub fn validate(config: &AssemblerConfig) -> Result<(), ContractError> {
    validate_pipeline(config)?;
    validate_naming(config)?;
    validate_steps(config)?;
    Ok(())
}

fn validate_pipeline(config: &AssemblerConfig) -> Result<(), ContractError> {
    let name = &config.pipeline.name;
    if name.is_empty() {
        return Err(ContractError::config_validation(
            "pipeline.name",
            "pipeline name cannot be empty",
        ));
    }
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if !valid_chars || name.starts_with('-') || name.ends_with('-') {
        return Err(ContractError::config_validation(
            "pipeline.name",
            format!("'{name}' must be lowercase letters, digits and inner '-'"),
        ));
    }

    if !config.pipeline.output_file.ends_with(".json") {
        return Err(ContractError::config_validation(
            "pipeline.output_file",
            format!(
                "template file must end in .json, got '{}'",
                config.pipeline.output_file
            ),
        ));
    }
    Ok(())
}

fn validate_naming(config: &AssemblerConfig) -> Result<(), ContractError> {
    for (idx, source) in config.naming.sources.iter().enumerate() {
        if source.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("naming.sources[{idx}]"),
                "source name cannot be empty",
            ));
        }
    }
    if config.naming.fallback.is_empty() {
        return Err(ContractError::config_validation(
            "naming.fallback",
            "fallback revision cannot be empty",
        ));
    }
    Ok(())
}

fn validate_steps(config: &AssemblerConfig) -> Result<(), ContractError> {
    let mut seen = HashSet::new();
    for (idx, step) in config.steps.iter().enumerate() {
        if !seen.insert(step.capability) {
            return Err(ContractError::config_validation(
                format!("steps[{idx}].capability"),
                format!("duplicate capability '{}'", step.capability),
            ));
        }
        if step.image.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("steps[{idx}].image"),
                "image cannot be empty",
            ));
        }
        if step.command.is_empty() || step.command.iter().any(|c| c.is_empty()) {
            return Err(ContractError::config_validation(
                format!("steps[{idx}].command"),
                "command must be a non-empty list of non-empty strings",
            ));
        }
    }

    for capability in StepCapability::ALL {
        if !seen.contains(&capability) {
            return Err(ContractError::config_validation(
                "steps",
                format!("capability '{capability}' is not registered"),
            ));
        }
    }
    Ok(())
}

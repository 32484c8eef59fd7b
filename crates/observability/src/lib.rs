//! # Observability
//!
//! 可观测性模块：Tracing 初始化，assembler 与两个 step 二进制共用。
//!
//! ## 功能
//!
//! - Tracing 初始化 (JSON/Pretty/Compact 格式)
//! - `-v` / `-q` 映射到默认日志级别，`RUST_LOG` 可覆盖
//!
//! ## 使用
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig {
//!     log_format: LogFormat::Compact,
//!     ..Default::default()
//! })?;
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// 可观测性配置
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// 日志格式
    pub log_format: LogFormat,
    /// `RUST_LOG` 未设置时使用的级别
    pub default_log_level: String,
    /// 忽略 `RUST_LOG`，直接使用 `default_log_level`
    pub force_level: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            default_log_level: "info".to_string(),
            force_level: false,
        }
    }
}

impl ObservabilityConfig {
    /// 由通用的 `-v` / `-q` 命令行参数构造
    pub fn from_verbosity(log_format: LogFormat, verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self {
                log_format,
                default_log_level: "warn".to_string(),
                force_level: true,
            };
        }
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        Self {
            log_format,
            default_log_level: level.to_string(),
            force_level: false,
        }
    }
}

/// 日志格式
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON 结构化日志
    #[default]
    Json,
    /// 人类可读格式
    Pretty,
    /// 紧凑单行格式
    Compact,
}

/// 使用自定义配置初始化 tracing
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let filter = if config.force_level {
        EnvFilter::new(&config.default_log_level)
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    };

    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Compact => fmt::layer().compact().boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(log_format = ?config.log_format, "Observability initialized");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ObservabilityConfig::default();
        assert_eq!(config.default_log_level, "info");
        assert!(!config.force_level);
    }

    #[test]
    fn test_verbosity_levels() {
        let config = ObservabilityConfig::from_verbosity(LogFormat::Compact, 1, false);
        assert_eq!(config.default_log_level, "debug");
        let config = ObservabilityConfig::from_verbosity(LogFormat::Compact, 5, false);
        assert_eq!(config.default_log_level, "trace");
        let config = ObservabilityConfig::from_verbosity(LogFormat::Compact, 2, true);
        assert_eq!(config.default_log_level, "warn");
        assert!(config.force_level);
    }
}

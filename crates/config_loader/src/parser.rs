//! 配置解析模块
//!
//! 格式由文件扩展名决定：`.toml` (主要) 或 `.json`。
//! 读写共用同一个 [`ConfigFormat`]，写出的文件可以原样读回。

use std::path::Path;

use contracts::{AssemblerConfig, ContractError};

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式，不区分大小写
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// 按路径推断格式
    ///
    /// 扩展名缺失或不受支持时返回 `ConfigParse`，信息中带上路径。
    pub fn detect(path: &Path) -> Result<Self, ContractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!(
                "unsupported config format for '{}': expected .toml or .json",
                path.display()
            ))
        })
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// 解析配置 (不做校验)
    pub fn parse(self, content: &str) -> Result<AssemblerConfig, ContractError> {
        let parsed: Result<AssemblerConfig, BoxedError> = match self {
            Self::Toml => toml::from_str(content).map_err(|e| Box::new(e) as BoxedError),
            Self::Json => serde_json::from_str(content).map_err(|e| Box::new(e) as BoxedError),
        };
        parsed.map_err(|source| self.error("parse", source))
    }

    /// 序列化配置
    pub fn render(self, config: &AssemblerConfig) -> Result<String, ContractError> {
        let rendered: Result<String, BoxedError> = match self {
            Self::Toml => toml::to_string_pretty(config).map_err(|e| Box::new(e) as BoxedError),
            Self::Json => {
                serde_json::to_string_pretty(config).map_err(|e| Box::new(e) as BoxedError)
            }
        };
        rendered.map_err(|source| self.error("serialize", source))
    }

    fn error(self, action: &str, source: BoxedError) -> ContractError {
        ContractError::ConfigParse {
            message: format!("{} {action} error: {source}", self.label()),
            source: Some(source),
        }
    }
}

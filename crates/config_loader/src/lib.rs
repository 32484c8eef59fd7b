//! # Config Loader
//!
//! Assembler configuration loading.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce `AssemblerConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("assembler.toml")).unwrap();
//! println!("Pipeline: {}", config.pipeline.name);
//! ```

mod parser;
mod validator;

pub use contracts::AssemblerConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// The format follows the file extension (.toml / .json).
    ///
    /// # Errors
    /// - Unsupported format
    /// - File read failure
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<AssemblerConfig, ContractError> {
        let format = ConfigFormat::detect(path)?;
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from file path, or the validated defaults when no path is given
    pub fn load_or_default(path: Option<&Path>) -> Result<AssemblerConfig, ContractError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => {
                let config = AssemblerConfig::default();
                validator::validate(&config)?;
                Ok(config)
            }
        }
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<AssemblerConfig, ContractError> {
        let config = format.parse(content)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `NotifyConfig`
//!
//! Zero-valued fields are left as they are; defaults are applied when the
//! dispatcher is constructed, after command-line overrides.
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("notify.toml")).unwrap();
//! println!("Target: {}", config.url);
//! ```

mod parser;
mod validator;

pub use contracts::NotifyConfig;
pub use parser::ConfigFormat;
pub use validator::validate;

use contracts::NotifierError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<NotifyConfig, NotifierError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<NotifyConfig, NotifierError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize NotifyConfig to TOML string
    pub fn to_toml(config: &NotifyConfig) -> Result<String, NotifierError> {
        toml::to_string_pretty(config)
            .map_err(|e| NotifierError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize NotifyConfig to JSON string
    pub fn to_json(config: &NotifyConfig) -> Result<String, NotifierError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| NotifierError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, NotifierError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            NotifierError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            NotifierError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, NotifierError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(content: &str, format: ConfigFormat) -> Result<NotifyConfig, NotifierError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}

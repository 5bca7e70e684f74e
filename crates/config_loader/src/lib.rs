//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `ConsumerConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("consumer.toml")).unwrap();
//! println!("Primary channel: {}", config.primary.name);
//! ```

pub use contracts::ConsumerConfig;

use contracts::ContractError;
use std::path::Path;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (primary)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Match a file extension, case-insensitively
    pub fn from_extension(ext: &str) -> Option<Self> {
        if ext.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if ext.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

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
    pub fn load_from_path(path: &Path) -> Result<ConsumerConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConsumerConfig, ContractError> {
        Self::parse_and_validate(content, format)
    }

    /// Serialize ConsumerConfig to TOML string
    pub fn to_toml(config: &ConsumerConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ConsumerConfig to JSON string
    pub fn to_json(config: &ConsumerConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<ConsumerConfig, ContractError> {
        let config = Self::parse(content, format)?;
        config.check()?;
        Ok(config)
    }

    /// Deserialize without validating; the parser's error is kept as source
    fn parse(content: &str, format: ConfigFormat) -> Result<ConsumerConfig, ContractError> {
        let parsed: Result<ConsumerConfig, BoxError> = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(BoxError::from),
            ConfigFormat::Json => serde_json::from_str(content).map_err(BoxError::from),
        };

        parsed.map_err(|source| ContractError::ConfigParse {
            message: format!("{} parse error: {source}", format.label()),
            source: Some(source),
        })
    }
}

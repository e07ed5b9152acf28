//! Configuration management for the dtnb CLI
//!
//! Configuration is stored in TOML format. Every value is optional and
//! command-line flags take precedence over the file.
//!
//! # Configuration File Locations
//!
//! - Linux: `~/.config/dtnb/config.toml`
//! - macOS: `~/Library/Application Support/io.dtnb.dtnb/config.toml`
//! - Windows: `%APPDATA%\dtnb\dtnb\config\config.toml`

use std::path::{Path, PathBuf};

use dtnb_crypto::WordCount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// CLI configuration
///
/// # Example TOML
///
/// ```toml
/// [output]
/// format = "text"  # "text" | "json"
///
/// [logging]
/// level = "warn"
///
/// [mnemonic]
/// word_count = 12  # 12 | 15 | 18 | 21 | 24
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub mnemonic: MnemonicConfig,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

fn default_format() -> String {
    "text".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            verbose: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Mnemonic generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MnemonicConfig {
    /// Words in a generated phrase
    #[serde(default = "default_word_count")]
    pub word_count: usize,
}

fn default_word_count() -> usize {
    12
}

impl Default for MnemonicConfig {
    fn default() -> Self {
        Self {
            word_count: default_word_count(),
        }
    }
}

impl MnemonicConfig {
    pub fn word_count(&self) -> Result<WordCount, ConfigError> {
        WordCount::try_from(self.word_count).map_err(|_| {
            ConfigError::ValidationError(format!(
                "Invalid word_count {}. Valid values: [12, 15, 18, 21, 24]",
                self.word_count
            ))
        })
    }
}

impl Config {
    /// Load and validate configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location, or defaults if there is no file
    pub fn load_default() -> Result<Self, ConfigError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from custom path or default
    pub fn load_from(custom_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = custom_path {
            Self::load(path)
        } else {
            Self::load_default()
        }
    }

    /// Platform-specific default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "dtnb", "dtnb")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Write the commented sample configuration to `path`.
    ///
    /// An existing file is only replaced when `force` is set.
    pub fn init(path: &Path, force: bool) -> Result<(), ConfigError> {
        if path.exists() && !force {
            return Err(ConfigError::ValidationError(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::sample_toml())?;
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.output.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid output format '{}'. Valid values: {:?}",
                self.output.format, valid_formats
            )));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log level '{}'. Valid values: {:?}",
                self.logging.level, valid_levels
            )));
        }

        self.mnemonic.word_count()?;

        Ok(())
    }

    /// Generate a sample configuration file content
    pub fn sample_toml() -> &'static str {
        r#"# dtnb configuration

[output]
# Output format: "text" or "json"
format = "text"
# Enable verbose output
verbose = false

[logging]
# Log level: "error", "warn", "info", "debug", "trace"
level = "warn"

[mnemonic]
# Words in a generated phrase: 12, 15, 18, 21 or 24
word_count = 12
"#
    }
}

/// CLI configuration overrides
///
/// Command-line arguments take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Output format override
    pub output_format: Option<String>,
    /// Verbose flag override
    pub verbose: Option<bool>,
    /// Debug flag override
    pub debug: Option<bool>,
    /// Mnemonic length override
    pub word_count: Option<usize>,
}

impl Config {
    /// Apply CLI overrides to configuration
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(ref format) = overrides.output_format {
            self.output.format = format.clone();
        }
        if let Some(verbose) = overrides.verbose {
            self.output.verbose = verbose;
        }
        if let Some(true) = overrides.debug {
            self.logging.level = "debug".to_string();
        }
        if let Some(words) = overrides.word_count {
            self.mnemonic.word_count = words;
        }
        self
    }
}

//! Configuration management and validation.
//!
//! Settings come from four layers, each overriding the one before:
//! built-in defaults, a TOML file, environment variables, and finally
//! command-line flags (applied by the CLI layer).
//!
//! ```toml
//! [data]
//! path = "/srv/weather/observations.csv"
//! delimiter = ";"
//! has_headers = true
//! skip_duplicates = true
//!
//! [logging]
//! level = "info"
//!
//! [output]
//! format = "json"
//! decimals = 2
//! ```

use crate::cli::args::OutputFormat;
use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DATA_PATH_ENV, DEFAULT_DECIMALS, DEFAULT_DELIMITER,
    DEFAULT_LOG_LEVEL, LOG_LEVELS, MAX_DECIMALS,
};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the dataset lives and how to read it
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataConfig {
    /// Dataset file used when no `--data` flag is given
    #[serde(default)]
    pub path: Option<PathBuf>,

    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    #[serde(default = "default_true")]
    pub has_headers: bool,

    /// Skip repeated dates instead of failing the load
    #[serde(default = "default_true")]
    pub skip_duplicates: bool,
}

fn default_delimiter() -> char {
    DEFAULT_DELIMITER
}

fn default_true() -> bool {
    true
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
            has_headers: true,
            skip_duplicates: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// How results are printed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places for readings in human and CSV output
    #[serde(default = "default_decimals")]
    pub decimals: usize,
}

fn default_decimals() -> usize {
    DEFAULT_DECIMALS
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            decimals: default_decimals(),
        }
    }
}

impl Config {
    /// Default config file location, `~/.config/weather-index/config.toml` on Linux
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        Self::from_toml(&content).map_err(|e| match e {
            Error::Configuration { message } => {
                Error::configuration(format!("{}: {}", path.display(), message))
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| Error::configuration(format!("Invalid configuration: {}", e)))
    }

    /// Build configuration from defaults, a config file and the environment
    ///
    /// An explicit `config_file` must exist. Without one, the default
    /// location is used when present and silently skipped otherwise.
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::configuration(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                debug!("Using config file: {}", path.display());
                Self::load(path)?
            }
            None => match Self::default_config_path() {
                Ok(path) if path.exists() => {
                    debug!("Using default config file: {}", path.display());
                    Self::load(&path)?
                }
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_data_path_override(std::env::var(DATA_PATH_ENV).ok());
    }

    /// Replace the dataset path with a non-empty override
    pub fn apply_data_path_override(&mut self, value: Option<String>) {
        if let Some(path) = value.filter(|v| !v.trim().is_empty()) {
            debug!("Dataset path overridden from environment: {}", path);
            self.data.path = Some(PathBuf::from(path));
        }
    }

    /// Validate the configuration for consistency
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::configuration(format!(
                "Unknown log level '{}'. Expected one of: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        if !self.data.delimiter.is_ascii() || self.data.delimiter.is_ascii_alphanumeric() {
            return Err(Error::configuration(format!(
                "Delimiter must be a single ASCII punctuation or whitespace character, got '{}'",
                self.data.delimiter
            )));
        }

        if self.output.decimals > MAX_DECIMALS {
            return Err(Error::configuration(format!(
                "Output decimals cannot exceed {}",
                MAX_DECIMALS
            )));
        }

        Ok(())
    }
}

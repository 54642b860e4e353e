//! Configuration types and loading.
//!
//! The main entry point is [`BbsConfig`], the contents of
//! `.bbs/config.yaml`. Load it with [`load_config`] and write it back with
//! [`save_config`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// The `.bbs/` directory was not found.
    #[error("no .bbs directory found (run 'bbs init' first)")]
    BbsDirNotFound,

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Enumerated settings
// ---------------------------------------------------------------------------

/// What `bbs add` does when the new step name is taken and no
/// `--on-conflict` flag is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OnConflict {
    /// Leave the tree untouched and report the conflict.
    #[default]
    Abort,
    /// Replace the existing step's data, keeping its position.
    Overwrite,
}

/// When to colour terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Always => "always",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(ConfigError::InvalidValue {
                key: "color".into(),
                reason: format!("expected auto, always or never, got '{}'", other),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The project configuration, corresponding to `.bbs/config.yaml`.
///
/// Every field has a serde default, so a partial file is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BbsConfig {
    /// Strategy file, relative to the project root (the parent of `.bbs/`).
    #[serde(default = "default_strategy")]
    pub strategy: String,

    #[serde(default)]
    pub on_conflict: OnConflict,

    #[serde(default)]
    pub color: ColorMode,

    /// `tracing` filter directive used with `--verbose`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for BbsConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            on_conflict: OnConflict::default(),
            color: ColorMode::default(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_strategy() -> String {
    "strategy.yaml".to_string()
}

fn default_log_filter() -> String {
    "bbs=debug".to_string()
}

impl BbsConfig {
    /// Absolute path of the strategy file for a project whose metadata
    /// lives in `bbs_dir`.
    pub fn strategy_path(&self, bbs_dir: &Path) -> PathBuf {
        let strategy = Path::new(&self.strategy);
        if strategy.is_absolute() {
            return strategy.to_path_buf();
        }
        bbs_dir.parent().unwrap_or(bbs_dir).join(strategy)
    }

    /// Keys accepted by [`BbsConfig::get`] and [`BbsConfig::set`].
    pub const KEYS: [&'static str; 4] = ["strategy", "on-conflict", "color", "log-filter"];

    /// Returns the value of `key` as written in the YAML file.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "strategy" => Some(self.strategy.clone()),
            "on-conflict" => Some(
                match self.on_conflict {
                    OnConflict::Abort => "abort",
                    OnConflict::Overwrite => "overwrite",
                }
                .to_string(),
            ),
            "color" => Some(self.color.to_string()),
            "log-filter" => Some(self.log_filter.clone()),
            _ => None,
        }
    }

    /// Sets `key` from its textual form, validating the result.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut next = self.clone();
        match key {
            "strategy" => next.strategy = value.to_string(),
            "on-conflict" => {
                next.on_conflict = match value.trim().to_ascii_lowercase().as_str() {
                    "abort" => OnConflict::Abort,
                    "overwrite" => OnConflict::Overwrite,
                    other => {
                        return Err(ConfigError::InvalidValue {
                            key: key.into(),
                            reason: format!("expected abort or overwrite, got '{}'", other),
                        });
                    }
                }
            }
            "color" => next.color = value.parse()?,
            "log-filter" => next.log_filter = value.to_string(),
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: key.into(),
                    reason: format!("unknown key (expected one of {})", Self::KEYS.join(", ")),
                });
            }
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Rejects values serde accepts but the tools cannot use.
    pub fn validate(&self) -> Result<()> {
        if self.strategy.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "strategy".into(),
                reason: "must name a file".into(),
            });
        }
        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "log-filter".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from `config.yaml` inside the given `.bbs/` directory.
///
/// A missing or empty file yields the default configuration.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// [`ConfigError::ParseError`] if it contains invalid YAML, or
/// [`ConfigError::InvalidValue`] if a value fails validation.
pub fn load_config(bbs_dir: &Path) -> Result<BbsConfig> {
    let config_path = bbs_dir.join("config.yaml");

    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return Ok(BbsConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;
    if content.trim().is_empty() {
        return Ok(BbsConfig::default());
    }

    let config: BbsConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to `config.yaml` inside the given `.bbs/` directory,
/// creating the directory if needed.
pub fn save_config(bbs_dir: &Path, config: &BbsConfig) -> Result<()> {
    std::fs::create_dir_all(bbs_dir)?;

    let config_path = bbs_dir.join("config.yaml");
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(config_path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Configuration resolution for the pseudonym service.
//!
//! Resolution order (lowest to highest priority):
//! 1. Built-in defaults
//! 2. Config file (JSON)
//! 3. Environment variables
//! 4. CLI arguments, applied by the binary
//!
//! Key material is never part of the configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::Scope;

/// Errors while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Exchange protocol parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Lifetime of issued tokens (seconds).
    pub token_validity_secs: u64,
    /// Version stamped into newly minted pseudonyms.
    pub pseudonym_version: u32,
    /// Scope for new pseudonyms and issued tokens.
    pub default_scope: Scope,
    /// Leeway when checking token expiry (seconds).
    pub clock_skew_secs: u64,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            token_validity_secs: 60 * 60, // 1 hour
            pseudonym_version: 1,
            default_scope: Scope::Treatment,
            clock_skew_secs: 0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "pseudonyms=info".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange.token_validity_secs == 0 {
            return Err(ConfigError::Invalid(
                "exchange.token_validity_secs must be greater than 0".into(),
            ));
        }
        if i64::try_from(self.exchange.token_validity_secs).is_err() {
            return Err(ConfigError::Invalid(
                "exchange.token_validity_secs is out of range".into(),
            ));
        }
        if i64::try_from(self.exchange.clock_skew_secs).is_err() {
            return Err(ConfigError::Invalid(
                "exchange.clock_skew_secs is out of range".into(),
            ));
        }
        if self.exchange.pseudonym_version == 0 {
            return Err(ConfigError::Invalid(
                "exchange.pseudonym_version must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Load configuration: defaults, then `path` if given, then the environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => load_config_file(path)?,
        None => Config::default(),
    };
    apply_overrides(&mut config, |name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Apply `PSEUDONYMS_*` overrides from `lookup`.
pub fn apply_overrides(
    config: &mut Config,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<(), ConfigError> {
    if let Some(v) = lookup("PSEUDONYMS_TOKEN_VALIDITY_SECS") {
        config.exchange.token_validity_secs = parse_override("PSEUDONYMS_TOKEN_VALIDITY_SECS", v)?;
    }
    if let Some(v) = lookup("PSEUDONYMS_CLOCK_SKEW_SECS") {
        config.exchange.clock_skew_secs = parse_override("PSEUDONYMS_CLOCK_SKEW_SECS", v)?;
    }
    if let Some(v) = lookup("PSEUDONYMS_LOG_JSON") {
        config.log.json = parse_override("PSEUDONYMS_LOG_JSON", v)?;
    }
    Ok(())
}

fn parse_override<T: std::str::FromStr>(
    name: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { name, value })
}

//! Runtime configuration for core callers.
//!
//! # Responsibility
//! - Carry the database location, logging setup and store behavior flags.
//! - Resolve overrides from `HIKESENSE_*` environment variables.
//!
//! # Invariants
//! - Defaults are usable without any environment set.
//! - Invalid overrides are rejected, never silently replaced by defaults.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "HIKESENSE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "HIKESENSE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "HIKESENSE_LOG_DIR";
pub const ENV_SEED: &str = "HIKESENSE_SEED";

const DEFAULT_DB_FILE_NAME: &str = "hikesense.sqlite3";
const DEFAULT_CHANGE_BUFFER: usize = 64;

/// Behavior flags of the response store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Seed sample responses when durable storage is empty on load.
    pub seed_on_empty: bool,
    /// Capacity of the change-notification channel.
    pub change_buffer: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_on_empty: true,
            change_buffer: DEFAULT_CHANGE_BUFFER,
        }
    }
}

/// Process-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables file logging.
    pub log_dir: Option<PathBuf>,
    pub store: StoreConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            store: StoreConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value `{value}` for {key}")
            }
        }
    }
}

impl Error for ConfigError {}

impl CoreConfig {
    /// Builds configuration from defaults plus process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from defaults plus overrides returned by `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = non_empty(lookup(ENV_DB_PATH)) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_empty(lookup(ENV_LOG_LEVEL)) {
            config.log_level = level;
        }
        if let Some(dir) = non_empty(lookup(ENV_LOG_DIR)) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = non_empty(lookup(ENV_SEED)) {
            config.store.seed_on_empty = parse_flag(ENV_SEED, &flag)?;
        }

        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

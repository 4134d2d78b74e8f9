//! Configuration loading
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments / environment variables (handled by clap in the binary)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing config file is not an error: a warning is logged and the
//! compiled defaults apply.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Bootstrap settings read from TOML. Every field is optional so a partial
/// file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Socket address to listen on, e.g. `0.0.0.0:8080`
    #[serde(default)]
    pub bind_addr: Option<String>,

    /// SQLite database file path or `sqlite:` URL
    #[serde(default)]
    pub database: Option<String>,

    #[serde(default)]
    pub database_pool: PoolConfig,

    /// Per-request timeout in seconds
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Connection pool sizing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PoolConfig {
    #[serde(default)]
    pub max_connections: Option<u32>,
    #[serde(default)]
    pub min_connections: Option<u32>,
    #[serde(default)]
    pub max_lifetime_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// Plain log level applied to the subtrack crates (trace, debug, info, warn, error)
    #[serde(default)]
    pub level: Option<String>,
}

/// Values used when neither the command line nor the config file says otherwise
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub bind_addr: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            database: default_database_path().display().to_string(),
            max_connections: 25,
            min_connections: 5,
            max_lifetime: Duration::from_secs(5 * 60),
            request_timeout: Duration::from_secs(10),
            log_level: "info".to_string(),
        }
    }
}

/// Highest-priority overrides, typically from clap
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub database: Option<String>,
    pub config_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub request_timeout: Duration,
    pub log_level: String,
}

impl ServiceConfig {
    /// Resolve configuration from overrides, the config file and defaults
    ///
    /// An explicitly named config file must exist and parse. The default
    /// location is optional.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let toml_config = match &overrides.config_file {
            Some(path) => load_toml_config(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => load_toml_config(&path)?,
                Some(path) => {
                    warn!(
                        "Config file not found at {}, using compiled defaults",
                        path.display()
                    );
                    TomlConfig::default()
                }
                None => TomlConfig::default(),
            },
        };

        Ok(Self::merge(overrides, toml_config, CompiledDefaults::for_current_platform()))
    }

    /// Merge the three configuration tiers without touching the filesystem
    pub fn merge(overrides: ConfigOverrides, file: TomlConfig, defaults: CompiledDefaults) -> Self {
        let max_connections = file
            .database_pool
            .max_connections
            .unwrap_or(defaults.max_connections)
            .max(1);
        let min_connections = file
            .database_pool
            .min_connections
            .unwrap_or(defaults.min_connections)
            .min(max_connections);

        Self {
            bind_addr: overrides
                .bind_addr
                .or(file.bind_addr)
                .unwrap_or(defaults.bind_addr),
            database: overrides
                .database
                .or(file.database)
                .unwrap_or(defaults.database),
            max_connections,
            min_connections,
            max_lifetime: file
                .database_pool
                .max_lifetime_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_lifetime),
            request_timeout: file
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            log_level: overrides
                .log_level
                .or(file.logging.level)
                .unwrap_or(defaults.log_level),
        }
    }
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Cannot read {}: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Platform config file location, e.g. `~/.config/subtrack/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("subtrack").join("config.toml"))
}

/// Platform data location for the database file
fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("subtrack"))
        .unwrap_or_else(|| PathBuf::from("./subtrack_data"))
        .join("subtrack.db")
}

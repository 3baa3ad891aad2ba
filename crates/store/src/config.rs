//! Store configuration management with precedence and validation
//!
//! Values are resolved from, in increasing precedence: built-in defaults, the
//! `store` object of `$XDG_CONFIG_HOME/cellar/config.json`, `CELLAR_*`
//! environment variables and finally command line arguments.

use crate::envelope::Envelope;
use cellar_core::errors::Validate;
use cellar_core::{
    Error, RecordSet, Result, ResultExt, CELLAR_COMPRESSION_THRESHOLD_VAR, CELLAR_DATA_DIR_VAR,
    CELLAR_MAX_LOG_ENTRIES_VAR, CELLAR_PRIMARY_QUOTA_VAR, DEFAULT_COMPRESSION_THRESHOLD,
    DEFAULT_MAX_LOG_ENTRIES, DEFAULT_PRIMARY_QUOTA_BYTES,
};
use cellar_utils::xdg::XdgPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Resolved settings for a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the `primary` and `overflow` subdirectories
    pub data_dir: PathBuf,
    /// Capacity of the primary tier in bytes
    pub primary_quota_bytes: u64,
    /// Longest JSON text, in characters, stored uncompressed
    pub compression_threshold: usize,
    /// Cap on the system log collection
    pub max_log_entries: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: XdgPaths::data_dir(),
            primary_quota_bytes: DEFAULT_PRIMARY_QUOTA_BYTES,
            compression_threshold: DEFAULT_COMPRESSION_THRESHOLD,
            max_log_entries: DEFAULT_MAX_LOG_ENTRIES,
        }
    }
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        Validate::not_empty(&self.data_dir.to_string_lossy(), "data_dir")?;
        Validate::in_range(self.primary_quota_bytes, 1, u64::MAX, "primary_quota_bytes")?;
        Validate::in_range(self.max_log_entries, 1, usize::MAX, "max_log_entries")?;
        Ok(())
    }

    pub fn primary_dir(&self) -> PathBuf {
        self.data_dir.join("primary")
    }

    pub fn overflow_dir(&self) -> PathBuf {
        self.data_dir.join("overflow")
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::new(self.compression_threshold)
    }

    /// The system log set, capped at the configured length
    pub fn logs_set(&self) -> RecordSet {
        RecordSet::LOGS.with_max_len(Some(self.max_log_entries))
    }
}

/// Source of configuration for debugging and precedence tracking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default configuration
    Default,
    /// Configuration file
    ConfigFile(PathBuf),
    /// Environment variable
    EnvironmentVariable(String),
    /// Command line argument
    CommandLine,
}

/// A resolved configuration and the highest-precedence source that contributed to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfiguration {
    pub store: StoreConfig,
    pub source: ConfigSource,
}

/// Partial settings from one source; unset fields keep the lower-precedence value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StoreOverrides {
    data_dir: Option<PathBuf>,
    primary_quota_bytes: Option<u64>,
    compression_threshold: Option<usize>,
    max_log_entries: Option<usize>,
}

impl StoreOverrides {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn apply(self, config: &mut StoreConfig) {
        if let Some(data_dir) = self.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(quota) = self.primary_quota_bytes {
            config.primary_quota_bytes = quota;
        }
        if let Some(threshold) = self.compression_threshold {
            config.compression_threshold = threshold;
        }
        if let Some(max) = self.max_log_entries {
            config.max_log_entries = max;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: StoreOverrides,
}

/// Builder for creating store configurations
pub struct StoreConfigBuilder {
    config: StoreConfig,
}

impl StoreConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
        }
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.config.data_dir = data_dir.into();
        self
    }

    pub fn with_primary_quota(mut self, bytes: u64) -> Self {
        self.config.primary_quota_bytes = bytes;
        self
    }

    pub fn with_compression_threshold(mut self, threshold: usize) -> Self {
        self.config.compression_threshold = threshold;
        self
    }

    pub fn with_max_log_entries(mut self, max: usize) -> Self {
        self.config.max_log_entries = max;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<StoreConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for StoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration loader that handles precedence
pub struct StoreConfigLoader;

impl StoreConfigLoader {
    /// Load configuration from the XDG config file and the environment
    pub fn load() -> Result<StoreConfiguration> {
        Self::load_from(&XdgPaths::config_file())
    }

    /// Load configuration using `config_path` as the config file
    pub fn load_from(config_path: &Path) -> Result<StoreConfiguration> {
        let mut configuration = StoreConfiguration {
            store: StoreConfig::default(),
            source: ConfigSource::Default,
        };

        if let Some(file_overrides) = Self::load_from_config_file(config_path)? {
            file_overrides.apply(&mut configuration.store);
            configuration.source = ConfigSource::ConfigFile(config_path.to_path_buf());
        }

        if let Some(env_overrides) = Self::load_from_env()? {
            env_overrides.apply(&mut configuration.store);
            configuration.source = ConfigSource::EnvironmentVariable("CELLAR_*".to_string());
        }

        configuration.store.validate()?;
        tracing::debug!(source = ?configuration.source, "loaded store configuration");
        Ok(configuration)
    }

    /// Apply command line arguments (highest precedence)
    pub fn apply_cli_args(
        mut configuration: StoreConfiguration,
        data_dir: Option<PathBuf>,
        primary_quota_bytes: Option<u64>,
    ) -> Result<StoreConfiguration> {
        let overrides = StoreOverrides {
            data_dir,
            primary_quota_bytes,
            ..StoreOverrides::default()
        };
        if overrides.is_empty() {
            return Ok(configuration);
        }

        overrides.apply(&mut configuration.store);
        configuration.store.validate()?;
        configuration.source = ConfigSource::CommandLine;
        Ok(configuration)
    }

    fn load_from_config_file(config_path: &Path) -> Result<Option<StoreOverrides>> {
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path)
            .map_err(|e| Error::file_system(config_path, "read config file", e))?;
        let file: ConfigFile = serde_json::from_str(&content)
            .config_context(|| format!("invalid config file '{}'", config_path.display()))?;

        Ok((!file.store.is_empty()).then_some(file.store))
    }

    fn load_from_env() -> Result<Option<StoreOverrides>> {
        let overrides = StoreOverrides {
            data_dir: std::env::var_os(CELLAR_DATA_DIR_VAR)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
            primary_quota_bytes: env_number(CELLAR_PRIMARY_QUOTA_VAR)?,
            compression_threshold: env_number(CELLAR_COMPRESSION_THRESHOLD_VAR)?,
            max_log_entries: env_number(CELLAR_MAX_LOG_ENTRIES_VAR)?,
        };
        Ok((!overrides.is_empty()).then_some(overrides))
    }
}

fn env_number<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw.trim().parse().map(Some).map_err(|e| {
            Error::configuration(format!("{name} must be a non-negative integer, got '{raw}': {e}"))
        }),
        _ => Ok(None),
    }
}

//! Dashboard configuration: defaults, then an optional TOML file, then
//! environment overrides, then command-line flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use co2_monitor_client::HttpEmissionApi;
use co2_monitor_sync::SyncConfig;
use serde::Deserialize;

/// Names the config file when `--config` is not given.
pub const CONFIG_ENV: &str = "CO2_MONITOR_CONFIG";
pub const API_URL_ENV: &str = "CO2_MONITOR_API_URL";
pub const POLL_INTERVAL_ENV: &str = "CO2_MONITOR_POLL_INTERVAL_MS";
pub const DETAIL_INTERVAL_ENV: &str = "CO2_MONITOR_DETAIL_INTERVAL_MS";

const DEFAULT_INTERVAL_MS: u64 = 3_000;
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Base URL of the emission service API.
    pub api_base_url: String,
    pub poll_interval_ms: u64,
    pub detail_interval_ms: u64,
    pub request_timeout_ms: u64,
    /// Where exports are written.
    pub export_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: HttpEmissionApi::DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_INTERVAL_MS,
            detail_interval_ms: DEFAULT_INTERVAL_MS,
            request_timeout_ms: DEFAULT_TIMEOUT_MS,
            export_dir: PathBuf::from("."),
        }
    }
}

impl DashboardConfig {
    /// Resolves the configuration from `path` (or [`CONFIG_ENV`]) and the
    /// process environment.
    ///
    /// # Errors
    ///
    /// * If the config file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        Ok(config
            .with_env(|key| std::env::var(key).ok())
            .normalized())
    }

    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If it is not valid TOML or has unknown keys
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// # Errors
    ///
    /// * If `text` is not valid TOML or has unknown keys
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Applies environment overrides read through `lookup`.
    ///
    /// Unparsable interval values are ignored with a warning.
    #[must_use]
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(ms) = parse_ms(POLL_INTERVAL_ENV, lookup(POLL_INTERVAL_ENV)) {
            self.poll_interval_ms = ms;
        }
        if let Some(ms) = parse_ms(DETAIL_INTERVAL_ENV, lookup(DETAIL_INTERVAL_ENV)) {
            self.detail_interval_ms = ms;
        }
        self
    }

    #[must_use]
    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = url;
        }
        self
    }

    /// Replaces zero intervals and timeouts with their defaults.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for (name, value, default) in [
            ("poll_interval_ms", &mut self.poll_interval_ms, DEFAULT_INTERVAL_MS),
            ("detail_interval_ms", &mut self.detail_interval_ms, DEFAULT_INTERVAL_MS),
            ("request_timeout_ms", &mut self.request_timeout_ms, DEFAULT_TIMEOUT_MS),
        ] {
            if *value == 0 {
                log::warn!("{name} must be positive, using {default}");
                *value = default;
            }
        }
        self
    }

    #[must_use]
    pub const fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            detail_interval: Duration::from_millis(self.detail_interval_ms),
        }
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn parse_ms(name: &str, value: Option<String>) -> Option<u64> {
    let value = value?;
    match value.trim().parse() {
        Ok(ms) => Some(ms),
        Err(e) => {
            log::warn!("Ignoring {name}={value:?}: {e}");
            None
        }
    }
}

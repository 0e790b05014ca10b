use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::errors::{AppError, AppResult};
use crate::proxy::SelectionPolicy;
use crate::utils::url::UrlUtils;

pub mod defaults;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub proxy: ProxyConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Proxy endpoint pool
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base URLs of the proxy services, e.g. `https://proxy1.example`
    #[serde(default)]
    pub urls: Vec<String>,
    /// How a base URL is picked for each request
    #[serde(default)]
    pub selection: SelectionPolicy,
}

/// Quality preference persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Whether the quality preference state is written to disk at all
    #[serde(default = "default_persist_preferences")]
    pub persist: bool,
    /// JSON file holding the quality preference state
    #[serde(default = "default_preferences_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_persist_preferences() -> bool {
    DEFAULT_PERSIST_PREFERENCES
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from(DEFAULT_PREFERENCES_PATH)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            persist: default_persist_preferences(),
            path: default_preferences_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// `EnvFilter` directive scoping `level` to this crate.
    pub fn filter_directive(&self) -> String {
        format!("playback_proxy={}", self.level.trim().to_ascii_lowercase())
    }
}

impl PreferencesConfig {
    /// The preference file to use, or `None` when preferences stay in memory
    pub fn storage_path(&self) -> Option<&std::path::Path> {
        self.persist.then_some(self.path.as_path())
    }
}

impl ProxyConfig {
    /// Configured base URLs, trimmed and without trailing slashes. Blank
    /// entries are dropped.
    pub fn normalized_urls(&self) -> Vec<String> {
        self.urls
            .iter()
            .map(|u| u.trim())
            .filter(|u| !u.is_empty())
            .map(UrlUtils::strip_trailing_slashes)
            .collect()
    }

    /// Replace the endpoint list with a comma-separated override, if one is given.
    ///
    /// An override that is present but blank clears the list.
    pub fn apply_urls_override(&mut self, value: Option<String>) {
        if let Some(raw) = value {
            self.urls = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            info!(count = self.urls.len(), "Proxy URLs overridden from {}", PROXY_URLS_ENV);
        }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let config_file =
            std::env::var(CONFIG_FILE_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    /// Load the config file, writing a default one if it does not exist yet.
    /// `PLAYBACK_PROXY_URLS` takes precedence over `proxy.urls`.
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        let mut config = if std::path::Path::new(config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            Self::from_toml_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config
            .proxy
            .apply_urls_override(std::env::var(PROXY_URLS_ENV).ok());

        config.validate()?;
        if config.proxy.normalized_urls().is_empty() {
            warn!("No proxy URLs configured; media URLs will be used unproxied");
        }

        Ok(config)
    }

    /// Reject proxy base URLs that do not parse and unknown log levels.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(bad) = self
            .proxy
            .normalized_urls()
            .into_iter()
            .find(|u| !UrlUtils::is_valid(u))
        {
            return Err(AppError::configuration(format!(
                "invalid proxy base URL: {}",
                UrlUtils::obfuscate_credentials(&bad)
            )));
        }

        match self.logging.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(AppError::validation(format!("unknown log level '{}'", other))),
        }
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        Ok(toml::from_str(contents)?)
    }
}

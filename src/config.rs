use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "XRATE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "https://v6.exchangerate-api.com".to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_target_currency")]
    pub target_currency: String,
}

fn default_base_currency() -> String {
    "USD".to_string()
}

fn default_target_currency() -> String {
    "EUR".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            base_currency: default_base_currency(),
            target_currency: default_target_currency(),
        }
    }
}

impl AppConfig {
    /// Loads the config file from the default location, falling back to
    /// defaults when none exists. Every setting has a usable default
    /// except the API key, which [`AppConfig::api_key`] resolves.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if config_path.exists() {
            Self::load_from_path(&config_path)
        } else {
            debug!("No config file at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// The API key for the rate service: the config value when present,
    /// otherwise the `XRATE_API_KEY` environment variable. The key never
    /// lives in source.
    pub fn api_key(&self) -> Result<String> {
        resolve_api_key(
            self.provider.api_key.as_deref(),
            std::env::var(API_KEY_ENV).ok(),
        )
    }
}

fn resolve_api_key(configured: Option<&str>, from_env: Option<String>) -> Result<String> {
    configured
        .map(str::to_string)
        .or(from_env)
        .filter(|key| !key.is_empty())
        .with_context(|| {
            format!(
                "No API key found; set provider.api_key in the config file \
                 or the {API_KEY_ENV} environment variable"
            )
        })
}

//! Configuration schema, defaults, and layered loading.
//!
//! Precedence: defaults < config file < environment < CLI
use anyhow::{ensure, Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TIMEOUT_SECS: u64 = 600;

pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "linkdrop")
        .map(|p| p.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("linkdrop.toml"))
}

/// Where the relay lives and how long we wait for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Base URL of the relay service
    pub url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_RELAY_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RelaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Rejects unusable values before a client is built from them.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.url.starts_with("http://") || self.url.starts_with("https://"),
            "Invalid config: relay.url must start with http:// or https://"
        );
        ensure!(
            self.timeout_secs > 0,
            "Invalid config: relay.timeout_secs must be > 0"
        );
        ensure!(
            self.timeout_secs <= MAX_TIMEOUT_SECS,
            "Invalid config: relay.timeout_secs must be <= {MAX_TIMEOUT_SECS}"
        );
        Ok(())
    }
}

/// Fully resolved application configuration after all layers merge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub relay: RelaySettings,
}

/// Loads config from defaults/file/env.
pub fn load_config() -> Result<AppConfig> {
    let path = config_path();

    let config: AppConfig = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("LINKDROP_").split("_"))
        .extract()
        .context("Failed to load configuration")?;

    config.relay.validate()?;

    Ok(config)
}

/// Applies a runtime relay override to a loaded config.
pub fn apply_relay_override(mut config: AppConfig, url: Option<String>) -> AppConfig {
    if let Some(url) = url {
        config.relay.url = url;
    }

    config
}

//! Application configuration management.
//!
//! This module handles loading and saving the client configuration, which
//! includes the API base URL and an optional cache directory override.
//!
//! Configuration is stored at `~/.config/zonemap/config.json`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "zonemap";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default backend base URL.
const DEFAULT_API_BASE_URL: &str = "https://api.zonemap.example.com/api/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub cache_dir: Option<PathBuf>,
    /// Refresh deadline in seconds; `None` uses the coordinator's built-in
    /// default. Apply via [`Config::refresh_timeout`] when constructing the
    /// `SyncCoordinator`.
    pub refresh_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            cache_dir: None,
            refresh_timeout_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Configured refresh deadline, if any.
    pub fn refresh_timeout(&self) -> Option<Duration> {
        self.refresh_timeout_secs.map(Duration::from_secs)
    }

    /// Directory the file-backed zone store lives in.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.cache_dir {
            return Ok(dir.clone());
        }
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

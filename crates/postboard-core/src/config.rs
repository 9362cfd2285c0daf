//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/postboard/config.json`. The
//! session itself lives in origin-scoped storage under the data directory,
//! so pointing the client at another API starts from a clean session.

use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_BASE_URL;

/// Application name used for config/data directory paths
const APP_NAME: &str = "postboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "POSTBOARD_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")
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

    /// Base URL from the environment, then the config file, then the default.
    pub fn base_url(&self) -> String {
        std::env::var(API_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    fn data_root() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Storage directory for the session of the configured API origin
    pub fn storage_dir(&self) -> Result<PathBuf> {
        let origin = origin_slug(&self.base_url())?;
        Ok(Self::data_root()?.join(origin))
    }

    pub fn log_dir(&self) -> Result<PathBuf> {
        Ok(Self::data_root()?.join("logs"))
    }
}

/// Directory-safe name for the origin (scheme, host, port) of a URL
pub fn origin_slug(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url).with_context(|| format!("Invalid API base URL: {}", base_url))?;
    let origin = url.origin();
    if !origin.is_tuple() {
        anyhow::bail!("API base URL has no origin: {}", base_url);
    }

    let slug = origin
        .ascii_serialization()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect::<String>();
    Ok(slug.trim_matches('_').replace("___", "_"))
}

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::ClimaError;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEOCODING_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// model = "gemini-2.5-flash"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Gemini API key. The environment takes precedence over this value.
    pub api_key: Option<String>,

    /// Model identifier; falls back to [`DEFAULT_MODEL`].
    pub model: Option<String>,

    pub gemini_base_url: Option<String>,

    pub geocoding_base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "climasense", "climasense")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve the API key from the process environment, then the file.
    pub fn api_key(&self) -> Result<String, ClimaError> {
        let from_env: Vec<Option<String>> =
            API_KEY_ENV_VARS.iter().map(|name| std::env::var(name).ok()).collect();
        let from_env: Vec<Option<&str>> = from_env.iter().map(Option::as_deref).collect();

        self.api_key_with_env(&from_env)
    }

    /// Same as [`Config::api_key`] with the environment values passed in, in
    /// [`API_KEY_ENV_VARS`] order. Blank values are skipped.
    pub fn api_key_with_env(&self, env_values: &[Option<&str>]) -> Result<String, ClimaError> {
        env_values
            .iter()
            .copied()
            .chain([self.api_key.as_deref()])
            .flatten()
            .map(str::trim)
            .find(|key| !key.is_empty())
            .map(str::to_owned)
            .ok_or_else(ClimaError::missing_credentials)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn gemini_base_url(&self) -> &str {
        self.gemini_base_url.as_deref().unwrap_or(DEFAULT_GEMINI_BASE_URL)
    }

    pub fn geocoding_base_url(&self) -> &str {
        self.geocoding_base_url.as_deref().unwrap_or(DEFAULT_GEOCODING_BASE_URL)
    }
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::GameId;
use crate::remote::client::StoreConfig;

const APP_DIR: &str = "games-admin";
const URL_VAR: &str = "GAMES_ADMIN_URL";
const ANON_KEY_VAR: &str = "GAMES_ADMIN_ANON_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Invalid config {path}: {source}")]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("api_url must be an http(s) URL, got {0:?}")]
    InvalidUrl(String),

    #[error("anon_key is not set")]
    MissingAnonKey,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_url: String,
    pub anon_key: String,
    pub table: String,
    pub request_timeout_secs: u64,
    pub message_timeout_secs: u64,
    pub surface_delete_errors: bool,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let log_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("logs");

        Self {
            api_url: String::new(),
            anon_key: String::new(),
            table: "games".to_string(),
            request_timeout_secs: 15,
            message_timeout_secs: 5,
            surface_delete_errors: false,
            log_level: "info".to_string(),
            log_dir,
        }
    }
}

/// Command-line values that win over the file and environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub anon_key: Option<String>,
    pub table: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads the explicit file, or the default one when present, then
    /// applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var(URL_VAR).filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(key) = var(ANON_KEY_VAR).filter(|v| !v.is_empty()) {
            self.anon_key = key;
        }
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if let Some(key) = overrides.anon_key {
            self.anon_key = key;
        }
        if let Some(table) = overrides.table {
            self.table = table;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
    }

    /// Validated connection settings for the remote store.
    pub fn store_config(&self) -> Result<StoreConfig, ConfigError> {
        let api_url = Url::parse(&self.api_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ConfigError::InvalidUrl(self.api_url.clone()))?;

        if self.anon_key.trim().is_empty() {
            return Err(ConfigError::MissingAnonKey);
        }

        Ok(StoreConfig {
            api_url,
            anon_key: self.anon_key.clone(),
            table: self.table.clone(),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn message_timeout(&self) -> Duration {
        Duration::from_secs(self.message_timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub enum PendingAction {
    DeleteGame(GameId),
}

impl PendingAction {
    pub fn confirm_message(&self) -> &'static str {
        match self {
            Self::DeleteGame(_) => "Are you sure you want to delete this game?",
        }
    }
}

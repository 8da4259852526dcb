//! Persisted application settings stored as TOML in the app directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs;

/// Filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Environment variable that overrides the backend base address.
pub const API_BASE_ENV: &str = "AGRODESK_API_BASE";
/// Backend address used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// User-editable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Backend base address; `AGRODESK_API_BASE` takes precedence.
    #[serde(default)]
    pub api_base: Option<String>,
    /// Number of entries requested by the history view.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Largest image accepted by disease detection, in bytes.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Language code last picked in the translation selector.
    #[serde(default)]
    pub language: Option<String>,
    /// Channel id remembered from the last sensor import.
    #[serde(default)]
    pub sensor_channel_id: Option<String>,
    /// Folder for exported reports; defaults to the download folder.
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base: None,
            history_limit: default_history_limit(),
            max_image_bytes: default_max_image_bytes(),
            language: None,
            sensor_channel_id: None,
            export_dir: None,
        }
    }
}

impl AppSettings {
    /// Backend base address after applying the environment override.
    pub fn resolved_api_base(&self) -> String {
        resolve_api_base(std::env::var(API_BASE_ENV).ok(), self.api_base.as_deref())
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

/// Errors that may occur while loading or saving app configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No suitable config directory found: {0}")]
    AppDir(#[from] app_dirs::AppDirError),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to serialize config to TOML at {path}: {source}")]
    SerializeToml {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Resolve the configuration file path inside the app directory.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load settings from a specific path, returning defaults if the file is missing.
pub fn load_from(path: &Path) -> Result<AppSettings, ConfigError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Save settings to a specific path, creating parent directories as needed.
pub fn save_to_path(settings: &AppSettings, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let data = toml::to_string_pretty(settings).map_err(|source| ConfigError::SerializeToml {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, data).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Pick the backend address: environment, then config, then the default.
pub fn resolve_api_base(env_value: Option<String>, configured: Option<&str>) -> String {
    let chosen = env_value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| configured.map(str::trim).filter(|value| !value.is_empty()))
        .unwrap_or(DEFAULT_API_BASE);
    chosen.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let settings = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.history_limit, 50);
    }

    #[test]
    fn save_then_load_preserves_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        let settings = AppSettings {
            api_base: Some("http://farm.local:9000".into()),
            language: Some("ta".into()),
            sensor_channel_id: Some("12345".into()),
            ..AppSettings::default()
        };
        save_to_path(&settings, &path).unwrap();
        assert_eq!(load_from(&path).unwrap(), settings);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "history_limit = 10\n").unwrap();
        let settings = load_from(&path).unwrap();
        assert_eq!(settings.history_limit, 10);
        assert_eq!(settings.max_image_bytes, 10 * 1024 * 1024);
        assert!(settings.api_base.is_none());
    }

    #[test]
    fn invalid_toml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "history_limit = \"many\"").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn env_override_beats_config_and_default() {
        assert_eq!(
            resolve_api_base(Some("http://env:1/".into()), Some("http://cfg:2")),
            "http://env:1"
        );
        assert_eq!(resolve_api_base(Some("  ".into()), Some("http://cfg:2")), "http://cfg:2");
        assert_eq!(resolve_api_base(None, None), DEFAULT_API_BASE);
    }
}

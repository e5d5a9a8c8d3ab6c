//! Configuration loading and management
//!
//! Handles parsing of `config.toml`. The file is optional; every field has a
//! default.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::storage::{FileStorage, DEFAULT_STORAGE_KEY};

pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Data directory used when no platform directory can be determined
pub const FALLBACK_DATA_DIR: &str = ".serverdesk";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub desk: DeskConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Where and how the store is persisted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Storage key; the store lives in `<dir>/<key>.json`
    #[serde(default = "default_key")]
    pub key: String,

    /// How long to wait for the store lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    /// Server selected when `--server` is not given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_server: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Colour only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl Config {
    /// Load configuration from a file, failing on malformed or invalid content
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicitly requested file. A missing file means defaults.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing; using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load configuration if present, falling back to defaults on any problem
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unusable config");
                Self::default()
            }
        }
    }

    /// Resolve the config for a run: an explicit path is loaded strictly,
    /// the platform default leniently.
    pub fn resolve(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load_explicit(path)?, Some(path.to_path_buf())));
        }
        match default_config_path() {
            Some(path) => Ok((Self::load_or_default(&path), Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.storage.validate()?;
        self.desk.validate()?;
        Ok(())
    }

    /// Data directory: command-line override, then config, then platform default
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.storage.dir.clone())
            .unwrap_or_else(default_data_dir)
    }

    /// File storage described by this config
    pub fn file_storage(&self, override_dir: Option<&Path>) -> FileStorage {
        FileStorage::new(self.data_dir(override_dir), self.storage.key.trim())
            .with_lock_timeout(self.storage.lock_timeout_ms)
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if key.starts_with('.')
            || !key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' must be a plain file name (letters, digits, '-', '_', '.')"
            )));
        }
        if self.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl DeskConfig {
    fn validate(&self) -> Result<()> {
        if let Some(server) = &self.default_server {
            if server.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "desk.default_server cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "serverdesk")
}

/// Platform config file location, e.g. `~/.config/serverdesk/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Platform data directory, e.g. `~/.local/share/serverdesk`
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}

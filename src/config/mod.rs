use crate::collectors::registry::{default_specs, CollectorSpec};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
    #[error("No configuration directory available on this system")]
    NoConfigDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Records between live report snapshots, 0 disables them
    #[serde(default)]
    pub update_interval: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_records: Option<u64>,
    #[serde(default = "default_specs")]
    pub collectors: Vec<CollectorSpec>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval: 0,
            max_records: None,
            collectors: default_specs(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "bamstats", "bamstats-tree")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load the user config, falling back to defaults when it is missing or invalid
    pub fn load() -> Self {
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_path(&path).unwrap_or_else(|e| {
                log::warn!("{}; using default configuration", e);
                Config::default()
            }),
            _ => Config::default(),
        }
    }

    /// An explicitly requested file must load; otherwise use the user config
    pub fn resolve(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(Path::new(path)),
            None => Ok(Self::load()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(path, self.to_toml()?).map_err(write_err)
    }

    /// Store as the user config, returning where it was written
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)?;
        Ok(path)
    }
}

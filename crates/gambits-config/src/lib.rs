//! Configuration for gambits.
//!
//! Settings live in `gambits.toml` under the platform config directory.
//! Every key is optional; anything missing falls back to its default, and a
//! missing file means all defaults.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use gambits_core::{BackgroundConfig, FieldConfig, GridConfig};
use serde::{Deserialize, Serialize};

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "gambits.toml";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Waitlist form settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitlistConfig {
    /// Form endpoint receiving `{"email": ...}`. Empty or `#` means no
    /// backend: submissions are simulated.
    pub endpoint: String,
    /// Label of the submit button.
    pub cta_text: String,
}

impl Default for WaitlistConfig {
    fn default() -> Self {
        Self {
            endpoint: "#".to_string(),
            cta_text: "Join the waitlist for early beta access".to_string(),
        }
    }
}

/// Everything read from `gambits.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub background: BackgroundConfig,
    pub field: FieldConfig,
    pub grid: GridConfig,
    pub waitlist: WaitlistConfig,
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::load_from(&path)
    }

    /// Load from `path`. A missing file yields the defaults. Out-of-range or
    /// non-finite tuning values are replaced rather than rejected.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.field = config.field.sanitized();
        config.grid = config.grid.sanitized();
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Write pretty TOML to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(io_err)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "gambits")
}

/// Full path of the configuration file.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Directory for the log file and other local state.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().to_path_buf())
}

//! Application configuration: `factorlab.toml` plus environment overrides.
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Environment variables win over the file:
//!
//! | variable | field |
//! |---|---|
//! | `FACTORLAB_DB` | `store.path` |
//! | `FACTORLAB_BIND` | `dashboard.bind` |
//! | `FACTORLAB_PORT` | `dashboard.port` |

use crate::data::ProviderConfig;
use crate::store::DEFAULT_TABLE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "factorlab.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite file holding the recorded rows.
    pub path: PathBuf,
    pub table: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("market_data.sqlite"),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: String,
    pub port: u16,
    /// Preselected component count in the form.
    pub default_components: usize,
    /// Default start date is today minus this many days.
    pub lookback_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8050,
            default_components: 3,
            lookback_days: 3 * 365,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub provider: ProviderConfig,
    pub dashboard: DashboardConfig,
}

impl AppConfig {
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`, or from `factorlab.toml` in the working directory.
    ///
    /// A missing default file yields the defaults. A missing file that was
    /// named explicitly is an error. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        let config = match std::fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded config file");
                Self::from_toml(&content, &path)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        Ok(config.with_overrides(|name| std::env::var(name).ok()))
    }

    /// Apply `FACTORLAB_*` overrides read through `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(db) = env_str(&lookup, "FACTORLAB_DB") {
            self.store.path = PathBuf::from(db);
        }
        if let Some(bind) = env_str(&lookup, "FACTORLAB_BIND") {
            self.dashboard.bind = bind;
        }
        if let Some(port) = env_str(&lookup, "FACTORLAB_PORT").and_then(|s| s.parse().ok()) {
            self.dashboard.port = port;
        }
        self
    }
}

fn env_str(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

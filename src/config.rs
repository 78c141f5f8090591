//! Configuration loading.
//!
//! Settings live in an optional TOML file. Every key has a default, so a
//! missing file or a partial one is valid:
//!
//! ```toml
//! [database]
//! path = "/home/me/.local/share/lanes/lanes.db"
//!
//! [limits]
//! max_name_chars = 50
//! max_description_chars = 200
//! ```

use crate::workflow::{domain::FieldLimits, services::WorkflowConfig};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use tracing::debug;

const APPLICATION: &str = "lanes";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "lanes.db";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// Config file path.
        path: Utf8PathBuf,
        /// Read failure.
        #[source]
        source: io::Error,
    },
    /// The file is not valid TOML for [`AppConfig`].
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Config file path.
        path: Utf8PathBuf,
        /// Parse failure.
        #[source]
        source: Box<toml::de::Error>,
    },
}

/// Database settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` file path. Falls back to the platform data directory.
    pub path: Option<Utf8PathBuf>,
}

impl DatabaseConfig {
    /// Returns the configured path or the platform default.
    #[must_use]
    pub fn resolve(&self) -> Option<Utf8PathBuf> {
        self.path.clone().or_else(default_database_path)
    }
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database settings.
    pub database: DatabaseConfig,
    /// Text length limits.
    pub limits: FieldLimits,
}

impl AppConfig {
    /// Reads configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is not valid.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_owned(),
            source,
        };
        let file_name = path
            .file_name()
            .ok_or_else(|| io_error(io::Error::other("path must include a file name")))?;
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(io_error)?;
        let contents = dir.read_to_string(file_name).map_err(io_error)?;
        Self::parse(path, &contents)
    }

    /// Reads configuration from `path`, or returns defaults when the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unreadable or invalid files.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                debug!(%path, "no config file; using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when `contents` is not valid.
    pub fn parse(path: &Utf8Path, contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source: Box::new(source),
        })
    }

    /// Returns the service settings carried by this configuration.
    #[must_use]
    pub const fn workflow(&self) -> WorkflowConfig {
        WorkflowConfig::new(self.limits)
    }
}

/// Returns the platform configuration file path, if one can be determined.
#[must_use]
pub fn default_config_path() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("", "", APPLICATION)?;
    Utf8PathBuf::from_path_buf(dirs.config_dir().join(CONFIG_FILE)).ok()
}

/// Returns the platform database path, if one can be determined.
#[must_use]
pub fn default_database_path() -> Option<Utf8PathBuf> {
    let dirs = ProjectDirs::from("", "", APPLICATION)?;
    Utf8PathBuf::from_path_buf(dirs.data_dir().join(DATABASE_FILE)).ok()
}

//! Settings file handling for coderain.
//!
//! Settings live in `config.toml` under the platform config directory, or at
//! the path named by `CODERAIN_CONFIG`. Every section and key is optional.
//! The raw serde model is converted into the validated configs from
//! `coderain-core` before anything is built from it.

mod error;
mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{debug, info};

pub use error::ConfigError;
pub use settings::{
    ContextMessageSettings, LinkSettings, MessageSettings, RainSettings, Settings,
    TextEffectSettings,
};

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "CODERAIN_CONFIG";

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Project directories for coderain, if the platform has a home directory.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "coderain")
}

/// Where settings are read from: `CODERAIN_CONFIG`, else the default file.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

impl Settings {
    /// Load settings from [`config_path`], falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no config directory, using default settings");
                Ok(Self::default())
            }
        }
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let settings = Self::parse(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })?;
        info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Render the settings as TOML, e.g. to write a starter file.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }
}

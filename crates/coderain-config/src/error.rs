//! Errors raised while loading settings.

use std::path::PathBuf;

use coderain_core::EffectError;

/// Failure to read, parse or validate the settings file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings{}: {source}", display_path(.path))]
    Parse {
        path: Option<PathBuf>,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("[{section}] {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: EffectError,
    },
}

fn display_path(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl ConfigError {
    pub(crate) fn invalid(section: &'static str) -> impl FnOnce(EffectError) -> Self {
        move |source| ConfigError::Invalid { section, source }
    }
}

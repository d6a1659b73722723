//! Configuration loading and parsing for Veil.
//!
//! The engine has exactly one construction-time toggle worth configuring: the
//! transition protocol the boundary dispatcher speaks. Everything else is
//! wiring supplied by the embedder. All sections are optional; a missing file
//! is not an error.

use serde::Deserialize;
use std::{fs, path::PathBuf};

/// Which compositor-boundary protocol visibility changes are forwarded over.
///
/// The two protocols are mutually exclusive per process lifetime; the choice
/// is made once when the coordinator is constructed.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionProtocolMode {
    /// `set_lock_surface_shown` plus a dedicated going-away request.
    #[default]
    Legacy,
    /// Everything is expressed as a `start_transition` call.
    Shell,
}

impl TransitionProtocolMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Shell => "shell",
        }
    }
}

/// Transition/dispatch configuration.
///
/// ```toml
/// [transitions]
/// protocol = "shell"
/// worker_thread_name = "veil-boundary"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct TransitionsConfig {
    /// Boundary protocol. Default: `legacy`.
    #[serde(default)]
    pub protocol: TransitionProtocolMode,
    /// Name given to the serial background worker thread.
    pub worker_thread_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VeilConfig {
    pub transitions: Option<TransitionsConfig>,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

impl VeilConfig {
    /// Load the config from the default path, if one exists.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let path = match config_path() {
            Some(path) => path,
            None => return Ok(None),
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(path).map(Some)
    }

    /// Load the config from an explicit path.
    pub fn load_from(path: PathBuf) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read { path, source: err });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse { path, source: err })
            }
        }
    }

    /// The protocol mode, falling back to the default when unconfigured.
    #[must_use]
    pub fn protocol(&self) -> TransitionProtocolMode {
        self.transitions
            .as_ref()
            .map(|t| t.protocol)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".veil").join("config.toml"))
}

#![forbid(unsafe_code)]

//! Project configuration read from `rocket.toml`.
//!
//! ```toml
//! project_name = "todo"
//! version = "1.2.0"
//! release = true
//!
//! [window]
//! title = "Todo"
//! geometry = "1024x768"
//! resizable = false
//! icon = "assets/icon.png"
//! ```
//!
//! Every key is optional; unknown keys are ignored.
//!
//! # Failure Modes
//!
//! - [`RocketConfig::load`] returns a [`ConfigError`] for an unreadable or
//!   malformed file. A missing file is not an error.
//! - [`RocketConfig::discover`] never fails: it logs the error and returns
//!   the defaults.

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// File name looked up by [`RocketConfig::discover`].
pub const CONFIG_FILE: &str = "rocket.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid window geometry {0:?}: expected WIDTHxHEIGHT")]
    Geometry(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RocketConfig {
    pub project_name: String,
    pub version: String,
    /// Release builds log at `info` instead of `debug`.
    pub release: bool,
    pub window: WindowConfig,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            project_name: "rocket_app".into(),
            version: "0.0.0".into(),
            release: false,
            window: WindowConfig::default(),
        }
    }
}

impl RocketConfig {
    /// Read `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no project config; using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_owned(),
                    source,
                });
            }
        };
        Self::parse(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load `rocket.toml` from the current directory, falling back to the
    /// defaults (with a warning) if it cannot be read or parsed.
    #[must_use]
    pub fn discover() -> Self {
        let path = std::env::current_dir()
            .map(|dir| dir.join(CONFIG_FILE))
            .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE));
        Self::load(&path).unwrap_or_else(|err| {
            warn!(error = %err, "ignoring project config");
            Self::default()
        })
    }
}

/// Main window settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    /// `"WIDTHxHEIGHT"` in pixels.
    pub geometry: String,
    pub resizable: bool,
    pub icon: Option<PathBuf>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rocket App".into(),
            geometry: "800x600".into(),
            resizable: true,
            icon: None,
        }
    }
}

impl WindowConfig {
    /// Parse [`geometry`](Self::geometry) into `(width, height)`.
    pub fn size(&self) -> Result<(u32, u32), ConfigError> {
        let invalid = || ConfigError::Geometry(self.geometry.clone());
        let (w, h) = self
            .geometry
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(invalid)?;
        let width = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let height = h.trim().parse::<u32>().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok((width, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = RocketConfig::default();
        assert_eq!(config.project_name, "rocket_app");
        assert_eq!(config.version, "0.0.0");
        assert!(!config.release);
        assert_eq!(config.window.title, "Rocket App");
        assert_eq!(config.window.size().unwrap(), (800, 600));
        assert!(config.window.resizable);
        assert!(config.window.icon.is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RocketConfig::load(dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, RocketConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "release = true\nunknown = 1\n\n[window]\ntitle = \"Todo\"\ngeometry = \"1024x768\""
        )
        .unwrap();

        let config = RocketConfig::load(file.path()).unwrap();
        assert!(config.release);
        assert_eq!(config.project_name, "rocket_app");
        assert_eq!(config.window.title, "Todo");
        assert_eq!(config.window.size().unwrap(), (1024, 768));
        assert!(config.window.resizable);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "release = \"sometimes\"").unwrap();
        let err = RocketConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RocketConfig::load(dir.path()),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn geometry_parsing() {
        let window = |g: &str| WindowConfig {
            geometry: g.into(),
            ..WindowConfig::default()
        };
        assert_eq!(window(" 640X480 ").size().unwrap(), (640, 480));
        for bad in ["", "800", "800x", "x600", "0x600", "wide x tall", "-1x5"] {
            assert!(
                matches!(window(bad).size(), Err(ConfigError::Geometry(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}

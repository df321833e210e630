//! Engine configuration for locating the image store.
//!
//! The reporter does not hard-code where the container engine keeps its
//! data. It is constructed against the narrow [`EngineInfo`] trait, and
//! [`EngineConfig`] is the file-backed implementation of it: a TOML
//! document naming the engine's on-disk roots.
//!
//! Configuration is searched in:
//! - the file named by `$IMAGEFS_ENGINE_CONFIG`
//! - system-wide: `/etc/containers/engine.toml`
//! - user-specific: `$XDG_CONFIG_HOME/containers/engine.toml` or
//!   `~/.config/containers/engine.toml`
//!
//! A typical engine.toml looks like:
//! ```toml
//! data_root = "/var/lib/engine"
//! state_root = "/run/engine"
//! ```
//!
//! Missing files fall back to built-in defaults; unreadable or malformed
//! files are configuration errors, never silently skipped.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Result, UsageError};

/// Environment variable naming an explicit configuration file, checked
/// before the fixed search locations.
pub const CONFIG_PATH_ENV: &str = "IMAGEFS_ENGINE_CONFIG";

fn default_data_root() -> PathBuf {
    PathBuf::from("/var/lib/engine")
}

fn default_state_root() -> PathBuf {
    PathBuf::from("/run/engine")
}

/// Read-only view of the engine configuration consumed by the usage
/// reporter.
///
/// The reporter pulls exactly one value through this seam, which keeps it
/// trivial to substitute a fake provider in tests.
pub trait EngineInfo {
    /// Absolute path of the engine's data root directory.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConfigResolution`] when no usable root can be
    /// supplied.
    fn data_root(&self) -> Result<PathBuf>;
}

/// Engine configuration, typically parsed from an engine.toml file.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Root directory for persistent engine data, including the image
    /// store.
    #[serde(default = "default_data_root")]
    pub data_root: PathBuf,

    /// Root directory for transient runtime state.
    #[serde(default = "default_state_root")]
    pub state_root: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            data_root: default_data_root(),
            state_root: default_state_root(),
        }
    }
}

impl EngineConfig {
    /// Parse engine configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is invalid.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse engine configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConfigResolution`] if the file cannot be read
    /// or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            UsageError::ConfigResolution(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content).map_err(|e| {
            UsageError::ConfigResolution(format!("invalid configuration {}: {}", path.display(), e))
        })
    }

    /// Load engine configuration from the default search locations.
    ///
    /// The first existing file wins. When no file exists at any location
    /// the built-in defaults are returned.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::ConfigResolution`] if a found file cannot be
    /// read or parsed.
    pub fn load() -> Result<Self> {
        for path in Self::default_search_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Build a configuration measuring `data_root` directly, bypassing
    /// file discovery.
    pub fn with_data_root(data_root: impl Into<PathBuf>) -> Self {
        EngineConfig {
            data_root: data_root.into(),
            ..Default::default()
        }
    }

    /// Get the default search paths for configuration discovery.
    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(explicit));
        }

        paths.push(PathBuf::from("/etc/containers/engine.toml"));

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("containers/engine.toml"));
        } else if let Ok(home) = env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/containers/engine.toml"));
        }

        paths
    }
}

impl EngineInfo for EngineConfig {
    fn data_root(&self) -> Result<PathBuf> {
        if self.data_root.as_os_str().is_empty() {
            return Err(UsageError::ConfigResolution(
                "data_root is empty".to_string(),
            ));
        }
        if self.data_root.is_relative() {
            return Err(UsageError::ConfigResolution(format!(
                "data_root must be absolute: {}",
                self.data_root.display()
            )));
        }
        Ok(self.data_root.clone())
    }
}

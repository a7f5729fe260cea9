//! Configuration file handling for GCodeVM
//!
//! The configuration holds the initial machine setup: units, distance modes,
//! work plane and arc tolerances. Files are JSON or TOML, chosen by
//! extension, and live under the platform config directory by default.

use gcodevm_core::MachineConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const APP_DIR: &str = "gcodevm";

/// Default config file name
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Initial machine configuration
    pub machine: MachineConfig,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    ///
    /// Missing keys take their default value. The result is validated.
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        self.machine.validate()?;
        Ok(())
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        let dir = dirs::config_dir().ok_or_else(|| {
            SettingsError::ConfigDirectory("no platform config directory".to_string())
        })?;
        Ok(dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the config at `path`, or at the default location when `None`
    ///
    /// A missing default file yields the default config; an explicitly named
    /// file must exist.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let path = match Self::default_path() {
                    Ok(path) => path,
                    Err(_) => return Ok(Self::default()),
                };
                if path.exists() {
                    Self::load_from_file(&path)
                } else {
                    debug!("No config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodevm_core::{MeasurementSystem, Plane};

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")).unwrap(), Format::Json);
        assert_eq!(Format::from_path(Path::new("a.toml")).unwrap(), Format::Toml);
        assert!(matches!(
            Format::from_path(Path::new("a.yaml")),
            Err(SettingsError::UnsupportedFormat(ext)) if ext == "yaml"
        ));
        assert!(Format::from_path(Path::new("config")).is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [machine]
            units = "imperial"
            plane = "YZ"
            "#,
        )
        .unwrap();
        assert_eq!(config.machine.units, MeasurementSystem::Imperial);
        assert_eq!(config.machine.plane, Plane::YZ);
        assert_eq!(config.machine.max_arc_deviation, 0.002);
    }

    #[test]
    fn test_default_path_file_name() {
        if let Ok(path) = Config::default_path() {
            assert!(path.ends_with("gcodevm/config.toml"));
        }
    }
}

//! Game settings and configuration
//!
//! User preferences stored as RON: where the loss history lives, the log
//! filter and an optional fixed seed.
//!
//! Settings are read before the tracing subscriber exists, so loading
//! returns a [`SettingsSource`] for the caller to report once logging is
//! up.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{GameError, Result};
use crate::vengeance::{JsonFileStore, VengeanceMemory};

/// User-configurable game settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Directory holding the loss history file
    pub history_dir: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Fixed seed for reproducible matches
    pub seed: Option<u64>,
}

/// Where a [`GameSettings`] value came from.
#[derive(Debug)]
pub enum SettingsSource {
    File(PathBuf),
    Missing(PathBuf),
    /// The file exists but could not be used; defaults were taken instead.
    Invalid(GameError),
}

impl SettingsSource {
    /// Log how the settings were obtained.
    pub fn report(&self) {
        match self {
            SettingsSource::File(path) => info!("Loaded settings from {:?}", path),
            SettingsSource::Missing(path) => {
                info!("No settings file found at {:?}, using defaults", path)
            }
            SettingsSource::Invalid(e) => warn!("{}; using default settings", e),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            history_dir: default_data_dir(),
            log_filter: "info".to_string(),
            seed: None,
        }
    }
}

/// Platform data directory, or the working directory when none exists.
fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "trinity-clash")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

impl GameSettings {
    /// Default location of the settings file
    pub fn settings_path() -> PathBuf {
        ProjectDirs::from("", "", "trinity-clash")
            .map(|dirs| dirs.config_dir().join("settings.ron"))
            .unwrap_or_else(|| PathBuf::from("settings.ron"))
    }

    /// Load settings from `path`, falling back to defaults when the file
    /// is missing or invalid. Nothing is logged here; see
    /// [`SettingsSource::report`].
    pub fn load_from(path: &Path) -> (Self, SettingsSource) {
        if !path.exists() {
            return (Self::default(), SettingsSource::Missing(path.to_path_buf()));
        }
        match Self::read(path) {
            Ok(settings) => (settings, SettingsSource::File(path.to_path_buf())),
            Err(e) => (Self::default(), SettingsSource::Invalid(e)),
        }
    }

    /// Strict variant of [`GameSettings::load_from`].
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        ron::from_str(&contents).map_err(|e| GameError::DataParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::InvalidConfig(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| GameError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        fs::write(path, contents).map_err(|source| GameError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Loss history backed by a JSON file in [`GameSettings::history_dir`].
    pub fn vengeance_memory(&self) -> VengeanceMemory {
        VengeanceMemory::new(Box::new(JsonFileStore::new(&self.history_dir)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, source) = GameSettings::load_from(&dir.path().join("settings.ron"));
        assert_eq!(settings, GameSettings::default());
        assert!(matches!(source, SettingsSource::Missing(_)));
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "not ron at all (").unwrap();
        let (settings, source) = GameSettings::load_from(&path);
        assert_eq!(settings, GameSettings::default());
        assert!(matches!(
            source,
            SettingsSource::Invalid(GameError::DataParseError { .. })
        ));
        assert!(GameSettings::read(&path).is_err());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.ron");
        let settings = GameSettings {
            history_dir: dir.path().to_path_buf(),
            log_filter: "debug".to_string(),
            seed: Some(42),
        };
        settings.save_to(&path).unwrap();
        let (loaded, source) = GameSettings::load_from(&path);
        assert_eq!(loaded, settings);
        assert!(matches!(source, SettingsSource::File(p) if p == path));
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(seed: Some(5))").unwrap();
        let (settings, _) = GameSettings::load_from(&path);
        assert_eq!(settings.seed, Some(5));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_log_filter_is_available_before_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");
        fs::write(&path, "(log_filter: \"trinity_clash=debug\")").unwrap();
        // Loading must not need a subscriber; the filter feeds its setup.
        let (settings, source) = GameSettings::load_from(&path);
        assert_eq!(settings.log_filter, "trinity_clash=debug");
        assert!(matches!(source, SettingsSource::File(_)));
    }
}

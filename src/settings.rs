//! Committed game options and their JSON save file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::options::{RESOLUTION_COUNT, SPEED_MAX, SPEED_MIN};

const SETTINGS_FILE: &str = "snek_settings.json";
const SETTINGS_PATH_ENV: &str = "SNEK_SETTINGS";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options the player has applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Index into the display's resolution list.
    pub resolution: usize,
    pub fullscreen: bool,
    pub soft_filter: bool,
    /// Snake speed in tenths.
    pub speed: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: 1,
            fullscreen: false,
            soft_filter: false,
            speed: 200,
        }
    }
}

impl Settings {
    /// Milliseconds between snake steps.
    pub fn logic_interval_ms(&self) -> u64 {
        let steps = u64::from(self.speed / 10).max(1);
        2000 / steps
    }

    /// Pulls out-of-range values from a hand-edited file back into range.
    pub fn clamped(self) -> Self {
        Self {
            resolution: self.resolution.min(RESOLUTION_COUNT - 1),
            speed: self.speed.clamp(SPEED_MIN, SPEED_MAX),
            ..self
        }
    }

    /// Loads from the save file, or falls back to defaults.
    pub fn load() -> Self {
        let path = settings_path();
        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::read_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        let path = settings_path();
        match self.write_to(&path) {
            Ok(()) => log::debug!("Saved settings to {}", path.display()),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }

    pub fn read_from(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&text)?;
        Ok(settings.clamped())
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SettingsError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn settings_path() -> PathBuf {
    std::env::var_os(SETTINGS_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}

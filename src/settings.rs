//! Runtime settings
//!
//! Loaded from a JSON file; every field is optional and falls back to the
//! shipped defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{COUNTDOWN_STEP_MS, SCREEN_HEIGHT, SCREEN_WIDTH, TICK_MS};
use crate::sim::{FIRST_LEVEL, Screen};
use crate::tuning::Tuning;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access settings file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Simulation interval in milliseconds
    pub tick_ms: u64,
    /// Fixed RNG seed; random per run when absent
    pub seed: Option<u64>,
    /// Level loaded by "start" and "play again"
    pub start_level: String,
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tick_ms: TICK_MS,
            seed: None,
            start_level: FIRST_LEVEL.to_string(),
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// Read and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(io_err)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "screen must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be at least 1".into()));
        }
        self.tuning.validate()
    }

    pub fn screen(&self) -> Screen {
        Screen::new(self.screen_width, self.screen_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Ticks each countdown label is held for at this tick rate
    pub fn countdown_step_ticks(&self) -> u32 {
        (COUNTDOWN_STEP_MS / self.tick_ms.max(1)).max(1) as u32
    }
}

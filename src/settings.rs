//! Session settings
//!
//! Serialized as JSON; the device's settings store owns persistence and
//! hands the text over when a game screen is built.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::FRAME_TIME_MS;

/// Shortest tick period accepted from settings
const MIN_FRAME_TIME_MS: u64 = 1;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Play hit/miss tones
    pub sound_enabled: bool,
    /// Tick period in milliseconds
    pub frame_time_ms: u64,
    /// Fixed RNG seed (random per session when absent)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            frame_time_ms: FRAME_TIME_MS,
            seed: None,
        }
    }
}

impl Settings {
    /// Parse settings, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        log::debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Tick period, never shorter than one millisecond
    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(self.frame_time_ms.max(MIN_FRAME_TIME_MS))
    }

    /// Seed for a new session
    pub fn session_seed(&self) -> u64 {
        self.seed.unwrap_or_else(rand::random)
    }
}

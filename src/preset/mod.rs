//! Presets and the session configuration they feed.
//!
//! - [`catalog`]: the built-in workout and meditation presets
//! - [`SessionConfigurator`]: holds the active preset and stages changes made
//!   while a session is in progress until they are confirmed
//! - [`CustomWorkoutDraft`] / [`CustomMeditationDraft`]: the editable "Custom" slot

pub mod catalog;
mod config;
mod custom;
mod error;

use serde::{Deserialize, Serialize};

pub use catalog::{all_presets, find_preset, meditation_presets, workout_presets};
pub use config::{SelectOutcome, SessionConfigurator};
pub use custom::{CustomMeditationDraft, CustomWorkoutDraft};
pub use error::PresetError;

use crate::types::{
    MeditationConfig, MeditationState, SessionKind, SessionState, WorkoutConfig, WorkoutState,
};

/// Name of the user-editable preset slot.
pub const CUSTOM_PRESET_NAME: &str = "Custom";

/// Settings carried by a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PresetSettings {
    Workout(WorkoutConfig),
    Meditation(MeditationConfig),
}

/// A named timer configuration. The name is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub settings: PresetSettings,
}

impl Preset {
    pub fn workout(name: impl Into<String>, config: WorkoutConfig) -> Self {
        Self {
            name: name.into(),
            settings: PresetSettings::Workout(config),
        }
    }

    pub fn meditation(name: impl Into<String>, config: MeditationConfig) -> Self {
        Self {
            name: name.into(),
            settings: PresetSettings::Meditation(config),
        }
    }

    /// The session kind this preset configures.
    pub fn kind(&self) -> SessionKind {
        match self.settings {
            PresetSettings::Workout(_) => SessionKind::Workout,
            PresetSettings::Meditation(_) => SessionKind::Meditation,
        }
    }

    /// Returns true for the user-editable slot.
    pub fn is_custom(&self) -> bool {
        self.name == CUSTOM_PRESET_NAME
    }

    /// Validates the settings.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::Invalid` if any value is out of range.
    pub fn validate(&self) -> Result<(), PresetError> {
        let result = match &self.settings {
            PresetSettings::Workout(config) => config.validate(),
            PresetSettings::Meditation(config) => config.validate(),
        };
        result.map_err(|reason| PresetError::Invalid {
            name: self.name.clone(),
            reason,
        })
    }

    /// A fresh idle session for this preset.
    pub fn idle_session(&self) -> SessionState {
        match self.settings {
            PresetSettings::Workout(config) => SessionState::Workout(WorkoutState::new(config)),
            PresetSettings::Meditation(config) => {
                SessionState::Meditation(MeditationState::new(config))
            }
        }
    }

    /// One-line description of the settings.
    pub fn summary(&self) -> String {
        match &self.settings {
            PresetSettings::Workout(config) => format!(
                "{}s work / {}s rest x {} rounds",
                config.work_seconds, config.rest_seconds, config.rounds
            ),
            PresetSettings::Meditation(config) => {
                let sound = config.sound.map_or("no sound", |s| s.as_str());
                format!(
                    "{} min {} ({})",
                    config.duration_minutes,
                    config.mode.as_str(),
                    sound
                )
            }
        }
    }
}

//! The editable "Custom" preset.
//!
//! Drafts keep the raw text the user typed so a transiently empty or
//! non-numeric field is allowed while editing. Conversion to a preset coerces
//! every numeric field into `1..=max` for that field.

use super::{Preset, PresetSettings, CUSTOM_PRESET_NAME};
use crate::types::{
    AmbientSound, MeditationConfig, MeditationMode, WorkoutConfig, MAX_INTERVAL_SECONDS,
    MAX_MEDITATION_MINUTES, MAX_ROUNDS,
};

/// Parses a field into `1..=max`. Empty, non-numeric or zero input becomes 1
/// and anything larger than `max` becomes `max`.
fn clamped(raw: &str, max: u32) -> u32 {
    match raw.trim().parse::<u64>() {
        Ok(0) | Err(_) => 1,
        Ok(value) => u32::try_from(value).unwrap_or(u32::MAX).min(max),
    }
}

/// Custom workout under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomWorkoutDraft {
    pub work_seconds: String,
    pub rest_seconds: String,
    pub rounds: String,
}

impl CustomWorkoutDraft {
    /// Starts a draft from existing settings.
    pub fn from_config(config: &WorkoutConfig) -> Self {
        Self {
            work_seconds: config.work_seconds.to_string(),
            rest_seconds: config.rest_seconds.to_string(),
            rounds: config.rounds.to_string(),
        }
    }

    /// The coerced configuration.
    pub fn to_config(&self) -> WorkoutConfig {
        WorkoutConfig::new(
            clamped(&self.work_seconds, MAX_INTERVAL_SECONDS),
            clamped(&self.rest_seconds, MAX_INTERVAL_SECONDS),
            clamped(&self.rounds, MAX_ROUNDS),
        )
    }

    /// The coerced "Custom" preset.
    pub fn to_preset(&self) -> Preset {
        Preset::workout(CUSTOM_PRESET_NAME, self.to_config())
    }
}

impl Default for CustomWorkoutDraft {
    fn default() -> Self {
        Self::from_config(&WorkoutConfig::default())
    }
}

/// Custom meditation under edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomMeditationDraft {
    pub duration_minutes: String,
    pub mode: MeditationMode,
    pub sound: Option<AmbientSound>,
}

impl CustomMeditationDraft {
    /// Starts a draft from existing settings.
    pub fn from_config(config: &MeditationConfig) -> Self {
        Self {
            duration_minutes: config.duration_minutes.to_string(),
            mode: config.mode,
            sound: config.sound,
        }
    }

    /// The coerced configuration.
    pub fn to_config(&self) -> MeditationConfig {
        MeditationConfig::new(
            clamped(&self.duration_minutes, MAX_MEDITATION_MINUTES),
            self.mode,
            self.sound,
        )
    }

    /// The coerced "Custom" preset.
    pub fn to_preset(&self) -> Preset {
        Preset::meditation(CUSTOM_PRESET_NAME, self.to_config())
    }
}

impl Default for CustomMeditationDraft {
    fn default() -> Self {
        Self::from_config(&MeditationConfig::default())
    }
}

/// Regenerates the "Custom" preset from any preset's settings.
pub fn custom_from(preset: &Preset) -> Preset {
    match &preset.settings {
        PresetSettings::Workout(config) => CustomWorkoutDraft::from_config(config).to_preset(),
        PresetSettings::Meditation(config) => {
            CustomMeditationDraft::from_config(config).to_preset()
        }
    }
}

//! Built-in preset catalog.

use super::{Preset, PresetError};
use crate::types::{AmbientSound, MeditationConfig, MeditationMode, WorkoutConfig};

/// Built-in workout presets.
pub fn workout_presets() -> Vec<Preset> {
    [
        ("Tabata", 20, 10, 8),
        ("HIIT", 30, 10, 8),
        ("Yoga", 60, 15, 5),
        ("Stretching", 45, 20, 6),
    ]
    .into_iter()
    .map(|(name, work, rest, rounds)| Preset::workout(name, WorkoutConfig::new(work, rest, rounds)))
    .collect()
}

/// Built-in meditation presets. All of them are guided.
pub fn meditation_presets() -> Vec<Preset> {
    use AmbientSound::*;

    [
        ("Quick Calm", 5, Calm),
        ("Mindful Break", 10, Rain),
        ("Nature Connection", 10, Nature),
        ("Zen Moment", 10, Zen),
        ("Deep Relaxation", 15, Spa),
        ("Ocean Peace", 15, Ocean),
        ("Forest Serenity", 15, Nature),
        ("Inner Calm", 15, Calm),
        ("Nature Escape", 20, Rain),
        ("Zen Mastery", 20, Zen),
        ("Zen Session", 30, Ocean),
        ("Wilderness Journey", 30, Nature),
        ("Ultimate Zen", 30, Zen),
        ("Deep Calm", 30, Calm),
    ]
    .into_iter()
    .map(|(name, minutes, sound)| {
        Preset::meditation(
            name,
            MeditationConfig::new(minutes, MeditationMode::Guided, Some(sound)),
        )
    })
    .collect()
}

/// Every built-in preset, workouts first.
pub fn all_presets() -> Vec<Preset> {
    let mut presets = workout_presets();
    presets.extend(meditation_presets());
    presets
}

/// Finds a built-in preset by name, ignoring case and surrounding whitespace.
///
/// # Errors
///
/// Returns `PresetError::NotFound` if no preset matches.
pub fn find_preset(name: &str) -> Result<Preset, PresetError> {
    let wanted = name.trim();
    all_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(wanted))
        .ok_or_else(|| PresetError::NotFound(wanted.to_string()))
}

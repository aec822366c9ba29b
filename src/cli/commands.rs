//! Command definitions for the tiktik CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::preset::{
    find_preset, CustomMeditationDraft, CustomWorkoutDraft, Preset, PresetError,
};
use crate::types::{AmbientSound, MeditationMode};

// ============================================================================
// CLI Structure
// ============================================================================

/// tiktik - interval workout and meditation timer
#[derive(Parser, Debug)]
#[command(
    name = "tiktik",
    version,
    about = "Interval workout and meditation timer with audio cues",
    long_about = "A terminal timer for interval workouts (Tabata, HIIT, ...) and guided \
                  meditation.\nPhase changes are announced with chimes and voice cues; \
                  background music or ambience plays along.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file (default: <config dir>/tiktik/config.json)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interval workout
    Workout(WorkoutArgs),

    /// Run a meditation session
    Meditate(MeditateArgs),

    /// List the built-in presets
    Presets {
        /// Print the presets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Shared Session Options
// ============================================================================

/// Audio switches shared by both session commands
#[derive(Args, Debug, Clone, Default)]
pub struct AudioArgs {
    /// Start with voice cues muted (chimes still play)
    #[arg(long)]
    pub mute_voice: bool,

    /// Start with background music/ambience muted
    #[arg(long)]
    pub mute_music: bool,

    /// Disable all audio output
    #[arg(long)]
    pub no_sound: bool,
}

// ============================================================================
// Workout Command Arguments
// ============================================================================

/// Arguments for the workout command
#[derive(Args, Debug, Clone, Default)]
pub struct WorkoutArgs {
    /// Preset name (Tabata, HIIT, Yoga, Stretching)
    #[arg(short, long, conflicts_with_all = ["work", "rest", "rounds"])]
    pub preset: Option<String>,

    /// Work interval in seconds (custom workout)
    #[arg(short, long, value_name = "SECONDS")]
    pub work: Option<String>,

    /// Rest interval in seconds (custom workout)
    #[arg(short, long, value_name = "SECONDS")]
    pub rest: Option<String>,

    /// Number of rounds (custom workout)
    #[arg(short = 'n', long)]
    pub rounds: Option<String>,

    #[command(flatten)]
    pub audio: AudioArgs,
}

impl WorkoutArgs {
    /// Resolves the preset to run: a named preset, a custom one, or Tabata.
    ///
    /// Custom fields left out keep the default custom values; bad values are
    /// coerced to 1.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::NotFound` if the named preset does not exist.
    pub fn to_preset(&self) -> Result<Preset, PresetError> {
        if let Some(name) = &self.preset {
            return find_preset(name);
        }
        if self.work.is_none() && self.rest.is_none() && self.rounds.is_none() {
            return find_preset("Tabata");
        }
        let mut draft = CustomWorkoutDraft::default();
        if let Some(work) = &self.work {
            draft.work_seconds = work.clone();
        }
        if let Some(rest) = &self.rest {
            draft.rest_seconds = rest.clone();
        }
        if let Some(rounds) = &self.rounds {
            draft.rounds = rounds.clone();
        }
        Ok(draft.to_preset())
    }
}

// ============================================================================
// Meditate Command Arguments
// ============================================================================

/// Arguments for the meditate command
#[derive(Args, Debug, Clone, Default)]
pub struct MeditateArgs {
    /// Preset name (e.g. "Quick Calm", "Ocean Peace")
    #[arg(short, long, conflicts_with_all = ["minutes", "mode", "sound"])]
    pub preset: Option<String>,

    /// Duration in minutes (custom meditation)
    #[arg(short, long)]
    pub minutes: Option<String>,

    /// Mode: silent, guided or ambient
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<MeditationMode>,

    /// Ambient sound: rain, ocean, spa, nature, zen or calm
    #[arg(short, long, value_parser = parse_sound)]
    pub sound: Option<AmbientSound>,

    #[command(flatten)]
    pub audio: AudioArgs,
}

impl MeditateArgs {
    /// Resolves the preset to run: a named preset, a custom one, or Quick Calm.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::NotFound` if the named preset does not exist.
    pub fn to_preset(&self) -> Result<Preset, PresetError> {
        if let Some(name) = &self.preset {
            return find_preset(name);
        }
        if self.minutes.is_none() && self.mode.is_none() && self.sound.is_none() {
            return find_preset("Quick Calm");
        }
        let mut draft = CustomMeditationDraft::default();
        if let Some(minutes) = &self.minutes {
            draft.duration_minutes = minutes.clone();
        }
        if let Some(mode) = self.mode {
            draft.mode = mode;
        }
        if let Some(sound) = self.sound {
            draft.sound = Some(sound);
        }
        Ok(draft.to_preset())
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

fn parse_mode(s: &str) -> Result<MeditationMode, String> {
    s.parse()
}

fn parse_sound(s: &str) -> Result<AmbientSound, String> {
    s.parse()
}

// ============================================================================
// Tests
// ============================================================================

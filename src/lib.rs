//! tiktik library
//!
//! This library provides the core functionality for the tiktik CLI.
//! It includes:
//! - Workout and meditation session state machines
//! - The countdown engine that gates phase changes on audio cues
//! - Foreground cue and background track playback
//! - The preset catalog and the confirm-before-reconfigure flow
//! - CLI command parsing and display utilities

pub mod cli;
pub mod config;
pub mod preset;
pub mod session;
pub mod sound;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    AmbientSound, MeditationConfig, MeditationMode, SessionKind, SessionSnapshot, SessionState,
    SessionStatus, WorkoutConfig, WorkoutPhase,
};

pub use config::{AppConfig, ConfigError};

pub use preset::{all_presets, find_preset, Preset, PresetError, SessionConfigurator};

pub use session::{EngineOptions, SessionCommand, SessionEngine, SessionEvent};

// Re-export sound types
pub use sound::{
    AudioCue, AudioSubsystem, MockSoundPlayer, RodioSoundPlayer, SilentSoundPlayer, SoundError,
    SoundPlayer, SoundSource,
};

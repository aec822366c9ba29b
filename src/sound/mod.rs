//! Audio subsystem for workout and meditation sessions.
//!
//! This module provides:
//!
//! - Asset lookup by naming convention (`{root}/{category}/{name}.mp3`)
//! - A foreground cue player with "play and wait" semantics bounded by a
//!   per-category fallback timeout
//! - A background controller for looping ambience and shuffled workout music
//! - Playback backends behind the [`SoundPlayer`] trait
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │              AudioSubsystem              │ ← owned by the engine
//! │  ┌──────────────┐   ┌─────────────────┐  │
//! │  │  CuePlayer   │   │AmbientController│  │
//! │  └──────┬───────┘   └────────┬────────┘  │
//! └─────────┼────────────────────┼───────────┘
//!           ▼                    ▼
//! ┌──────────────────────────────────────────┐
//! │        dyn SoundPlayer (cue + track)     │
//! │  RodioSoundPlayer / SilentSoundPlayer /  │
//! │  MockSoundPlayer                         │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Playback failures never leave this module as errors: they are logged and
//! the sound is skipped so a missing asset cannot stall the countdown.

mod ambient;
mod cue;
mod error;
mod player;
mod source;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::oneshot;

pub use ambient::{AmbientController, MusicQueue, Track, AMBIENT_VOLUME_FACTOR, MUSIC_VOLUME_FACTOR};
pub use cue::CuePlayer;
pub use error::SoundError;
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{AssetCategory, AssetLibrary, AudioCue, SoundSource};

// ============================================================================
// SoundPlayer
// ============================================================================

/// Trait for sound playback backends.
///
/// A backend owns two channels: a foreground cue channel and a background
/// track channel. Starting a cue replaces any cue still playing; starting a
/// track replaces the current track.
pub trait SoundPlayer: Send + Sync {
    /// Starts a short clip. The returned handle completes when the clip ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be decoded or played.
    fn play_cue(&self, source: &SoundSource, volume: f32) -> Result<CuePlayback, SoundError>;

    /// Stops the foreground cue, if any.
    fn stop_cues(&self);

    /// Starts a background track from position 0, replacing the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or cannot be decoded or played.
    fn start_track(&self, source: &SoundSource, looping: bool, volume: f32)
        -> Result<(), SoundError>;

    /// Pauses the background track, keeping its position.
    fn pause_track(&self);

    /// Continues the background track from where it was paused.
    fn resume_track(&self);

    /// Stops the background track and discards its position.
    fn stop_track(&self);

    /// Returns true if a non-looping track has played to its end.
    fn track_finished(&self) -> bool;
}

/// Completion handle of a started cue.
#[derive(Debug)]
pub struct CuePlayback {
    done: Option<oneshot::Receiver<()>>,
}

impl CuePlayback {
    /// Wraps a receiver that fires (or closes) when the clip ends.
    pub fn new(done: oneshot::Receiver<()>) -> Self {
        Self { done: Some(done) }
    }

    /// A handle that is already complete.
    pub fn finished() -> Self {
        Self { done: None }
    }

    /// Waits for the natural end of the clip.
    pub async fn wait(self) {
        if let Some(done) = self.done {
            let _ = done.await;
        }
    }
}

// ============================================================================
// SilentSoundPlayer
// ============================================================================

/// Backend used when audio is disabled or unavailable. Every cue ends immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSoundPlayer;

impl SoundPlayer for SilentSoundPlayer {
    fn play_cue(&self, _source: &SoundSource, _volume: f32) -> Result<CuePlayback, SoundError> {
        Ok(CuePlayback::finished())
    }

    fn stop_cues(&self) {}

    fn start_track(
        &self,
        _source: &SoundSource,
        _looping: bool,
        _volume: f32,
    ) -> Result<(), SoundError> {
        Ok(())
    }

    fn pause_track(&self) {}

    fn resume_track(&self) {}

    fn stop_track(&self) {}

    fn track_finished(&self) -> bool {
        false
    }
}

// ============================================================================
// MockSoundPlayer
// ============================================================================

/// A call recorded by [`MockSoundPlayer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundCall {
    Cue { category: AssetCategory, name: String },
    StopCues,
    StartTrack { name: String, looping: bool },
    PauseTrack,
    ResumeTrack,
    StopTrack,
}

/// Mock sound player for testing.
#[derive(Debug, Default)]
pub struct MockSoundPlayer {
    calls: Mutex<Vec<SoundCall>>,
    pending: Mutex<Vec<oneshot::Sender<()>>>,
    should_fail: AtomicBool,
    hang_cues: AtomicBool,
    track_finished: AtomicBool,
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every playback attempt fail like a missing file.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Makes cues never report their end, as if the end signal got lost.
    pub fn set_hang_cues(&self, hang: bool) {
        self.hang_cues.store(hang, Ordering::SeqCst);
    }

    /// Sets what `track_finished` reports.
    pub fn set_track_finished(&self, finished: bool) {
        self.track_finished.store(finished, Ordering::SeqCst);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<SoundCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Names of the cues played in `category`, in order.
    #[must_use]
    pub fn cues_in(&self, category: AssetCategory) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SoundCall::Cue { category: c, name } if c == category => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Names of the tracks started, in order.
    #[must_use]
    pub fn tracks_started(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SoundCall::StartTrack { name, .. } => Some(name),
                _ => None,
            })
            .collect()
    }

    /// Number of times `call` was recorded.
    #[must_use]
    pub fn count(&self, call: &SoundCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn record(&self, call: SoundCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play_cue(&self, source: &SoundSource, _volume: f32) -> Result<CuePlayback, SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::FileNotFound(source.path.display().to_string()));
        }
        self.record(SoundCall::Cue {
            category: source.category,
            name: source.name.clone(),
        });
        if self.hang_cues.load(Ordering::SeqCst) {
            let (tx, rx) = oneshot::channel();
            self.pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(tx);
            return Ok(CuePlayback::new(rx));
        }
        Ok(CuePlayback::finished())
    }

    fn stop_cues(&self) {
        self.record(SoundCall::StopCues);
    }

    fn start_track(
        &self,
        source: &SoundSource,
        looping: bool,
        _volume: f32,
    ) -> Result<(), SoundError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(SoundError::FileNotFound(source.path.display().to_string()));
        }
        self.track_finished.store(false, Ordering::SeqCst);
        self.record(SoundCall::StartTrack {
            name: source.name.clone(),
            looping,
        });
        Ok(())
    }

    fn pause_track(&self) {
        self.record(SoundCall::PauseTrack);
    }

    fn resume_track(&self) {
        self.record(SoundCall::ResumeTrack);
    }

    fn stop_track(&self) {
        self.record(SoundCall::StopTrack);
    }

    fn track_finished(&self) -> bool {
        self.track_finished.load(Ordering::SeqCst)
    }
}

// ============================================================================
// AudioSubsystem
// ============================================================================

/// Audio options applied when the subsystem is built.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    /// Initial voice mute
    pub voice_muted: bool,
    /// Initial background mute
    pub music_muted: bool,
    /// Workout music pool
    pub music_tracks: Vec<String>,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 0.7,
            voice_muted: false,
            music_muted: false,
            music_tracks: (1..=3).map(|n| format!("workout_music{}", n)).collect(),
        }
    }
}

/// The foreground and background audio channels of one session.
///
/// Built explicitly and handed to the engine; there is no global instance.
pub struct AudioSubsystem {
    /// Foreground cue channel, shared with in-flight gate futures
    pub cues: Arc<CuePlayer>,
    /// Background track channel
    pub ambient: AmbientController,
}

impl AudioSubsystem {
    /// Builds both channels over one backend.
    pub fn new(player: Arc<dyn SoundPlayer>, library: AssetLibrary, settings: AudioSettings) -> Self {
        let volume = settings.volume.clamp(0.0, 1.0);
        let cues = CuePlayer::new(Arc::clone(&player), library.clone(), volume);
        cues.set_voice_muted(settings.voice_muted);
        let mut ambient = AmbientController::new(player, library, volume, settings.music_tracks);
        ambient.set_muted(settings.music_muted);
        Self {
            cues: Arc::new(cues),
            ambient,
        }
    }

    /// A subsystem that produces no sound.
    pub fn silent() -> Self {
        Self::new(
            Arc::new(SilentSoundPlayer),
            AssetLibrary::default(),
            AudioSettings::default(),
        )
    }

    /// Stops foreground and background audio.
    pub fn stop_all(&mut self) {
        self.cues.stop();
        self.ambient.stop();
    }
}

impl std::fmt::Debug for AudioSubsystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioSubsystem")
            .field("voice_muted", &self.cues.is_voice_muted())
            .field("music_muted", &self.ambient.is_muted())
            .finish_non_exhaustive()
    }
}

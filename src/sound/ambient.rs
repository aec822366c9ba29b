//! Background audio: looping meditation ambience and the shuffled workout
//! music queue.
//!
//! At most one background track plays at a time. Foreground cues suspend the
//! track through [`AmbientController::suspend_for_cue`] and hand it back with
//! [`AmbientController::resume_after_cue`]; a user pause, stop or mute taken
//! in between wins over the cue's resume.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use super::source::{AssetCategory, AssetLibrary};
use super::SoundPlayer;
use crate::types::AmbientSound;

/// Ambient loops play at half the master volume.
pub const AMBIENT_VOLUME_FACTOR: f32 = 0.5;

/// Workout music plays at 60% of the master volume.
pub const MUSIC_VOLUME_FACTOR: f32 = 0.6;

/// A background track request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// A looping meditation ambience
    Ambient(AmbientSound),
    /// The shuffled workout music queue
    Music,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackState {
    Stopped,
    Playing,
    Paused { by_cue: bool },
}

// ============================================================================
// MusicQueue
// ============================================================================

/// Shuffled playlist over a fixed pool, reshuffled each time it runs out.
#[derive(Debug, Clone)]
pub struct MusicQueue {
    pool: Vec<String>,
    order: Vec<String>,
    position: usize,
}

impl MusicQueue {
    pub fn new(pool: Vec<String>) -> Self {
        Self {
            pool,
            order: Vec::new(),
            position: 0,
        }
    }

    /// Number of tracks in the pool.
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Returns the next track, reshuffling when the current order is used up.
    pub fn next_track(&mut self) -> Option<String> {
        if self.pool.is_empty() {
            return None;
        }
        if self.position >= self.order.len() {
            self.reshuffle();
        }
        let track = self.order.get(self.position).cloned();
        self.position += 1;
        track
    }

    fn reshuffle(&mut self) {
        self.order = self.pool.clone();
        self.order.shuffle(&mut rand::thread_rng());
        self.position = 0;
        debug!("Music queue shuffled: {:?}", self.order);
    }
}

// ============================================================================
// AmbientController
// ============================================================================

/// Manages the single background track.
pub struct AmbientController {
    player: Arc<dyn SoundPlayer>,
    library: AssetLibrary,
    volume: f32,
    muted: bool,
    current: Option<Track>,
    state: TrackState,
    queue: MusicQueue,
}

impl AmbientController {
    pub fn new(
        player: Arc<dyn SoundPlayer>,
        library: AssetLibrary,
        volume: f32,
        music_tracks: Vec<String>,
    ) -> Self {
        Self {
            player,
            library,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            current: None,
            state: TrackState::Stopped,
            queue: MusicQueue::new(music_tracks),
        }
    }

    /// Stops the current track and starts `track` from the beginning.
    ///
    /// Does nothing while muted.
    pub fn start(&mut self, track: Track) {
        if self.muted {
            debug!("Background muted, not starting {:?}", track);
            return;
        }
        self.stop();
        self.current = Some(track);
        match track {
            Track::Ambient(sound) => {
                let source = self
                    .library
                    .resolve(AssetCategory::MeditationAmbient, sound.as_str());
                match self
                    .player
                    .start_track(&source, true, self.volume * AMBIENT_VOLUME_FACTOR)
                {
                    Ok(()) => {
                        debug!("Ambient '{}' started", sound.as_str());
                        self.state = TrackState::Playing;
                    }
                    Err(e) => warn!("Skipping ambient '{}': {}", sound.as_str(), e),
                }
            }
            Track::Music => self.play_next_music(),
        }
    }

    /// Starts the next playable queue entry; every pool entry gets one try.
    fn play_next_music(&mut self) {
        for _ in 0..self.queue.len() {
            let Some(name) = self.queue.next_track() else {
                break;
            };
            let source = self.library.resolve(AssetCategory::WorkoutMusic, &name);
            match self
                .player
                .start_track(&source, false, self.volume * MUSIC_VOLUME_FACTOR)
            {
                Ok(()) => {
                    debug!("Music '{}' started", name);
                    self.state = TrackState::Playing;
                    return;
                }
                Err(e) => warn!("Skipping music track '{}': {}", name, e),
            }
        }
        self.state = TrackState::Stopped;
    }

    /// Pauses the track, keeping its position.
    pub fn pause(&mut self) {
        match self.state {
            TrackState::Playing => {
                self.player.pause_track();
                self.state = TrackState::Paused { by_cue: false };
            }
            // The user now owns this pause; the cue must not undo it.
            TrackState::Paused { by_cue: true } => {
                self.state = TrackState::Paused { by_cue: false };
            }
            _ => {}
        }
    }

    /// Continues a paused track. Does nothing while muted.
    pub fn resume(&mut self) {
        if self.muted {
            return;
        }
        if let TrackState::Paused { .. } = self.state {
            self.player.resume_track();
            self.state = TrackState::Playing;
        }
    }

    /// Stops the track and forgets its position.
    pub fn stop(&mut self) {
        self.player.stop_track();
        self.state = TrackState::Stopped;
        self.current = None;
    }

    /// Pauses a playing track for a foreground cue.
    ///
    /// Returns true if the track was paused and must be handed back with
    /// [`resume_after_cue`](Self::resume_after_cue).
    pub fn suspend_for_cue(&mut self) -> bool {
        if self.state == TrackState::Playing {
            self.player.pause_track();
            self.state = TrackState::Paused { by_cue: true };
            true
        } else {
            false
        }
    }

    /// Resumes a track paused by [`suspend_for_cue`](Self::suspend_for_cue),
    /// unless it was paused, stopped or muted in the meantime.
    pub fn resume_after_cue(&mut self) {
        if self.state == (TrackState::Paused { by_cue: true }) && !self.muted {
            self.player.resume_track();
            self.state = TrackState::Playing;
        }
    }

    /// Sets the background mute. Muting stops the track.
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.player.stop_track();
            self.state = TrackState::Stopped;
        }
        debug!("Background audio {}", if muted { "muted" } else { "unmuted" });
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == TrackState::Playing
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        matches!(self.state, TrackState::Paused { .. })
    }

    /// The track last requested with `start`, while it has not been stopped.
    #[must_use]
    pub fn current(&self) -> Option<Track> {
        self.current
    }

    /// Advances the music queue when the current song has ended.
    pub fn poll(&mut self) {
        if self.state == TrackState::Playing
            && self.current == Some(Track::Music)
            && self.player.track_finished()
        {
            self.play_next_music();
        }
    }
}

impl std::fmt::Debug for AmbientController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbientController")
            .field("current", &self.current)
            .field("state", &self.state)
            .field("muted", &self.muted)
            .finish_non_exhaustive()
    }
}

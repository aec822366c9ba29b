//! Foreground cue playback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use super::source::{AssetLibrary, AudioCue};
use super::{CuePlayback, SoundPlayer};

/// Plays short clips on the foreground channel.
///
/// Voice clips respect the voice mute; chimes always play. Failures are
/// logged and swallowed.
pub struct CuePlayer {
    player: Arc<dyn SoundPlayer>,
    library: AssetLibrary,
    volume: f32,
    voice_muted: AtomicBool,
}

impl CuePlayer {
    /// Creates a cue player over a backend.
    pub fn new(player: Arc<dyn SoundPlayer>, library: AssetLibrary, volume: f32) -> Self {
        Self {
            player,
            library,
            volume: volume.clamp(0.0, 1.0),
            voice_muted: AtomicBool::new(false),
        }
    }

    pub fn set_voice_muted(&self, muted: bool) {
        self.voice_muted.store(muted, Ordering::Relaxed);
        debug!("Voice cues {}", if muted { "muted" } else { "unmuted" });
    }

    #[must_use]
    pub fn is_voice_muted(&self) -> bool {
        self.voice_muted.load(Ordering::Relaxed)
    }

    /// Starts a cue without waiting for it.
    pub fn play(&self, cue: &AudioCue) {
        let _ = self.start(cue);
    }

    /// Starts a cue and waits until it ends or its fallback timeout elapses.
    ///
    /// Always completes; a missing or broken clip returns right away.
    pub async fn play_and_wait(&self, cue: &AudioCue) {
        let Some(playback) = self.start(cue) else {
            return;
        };
        let limit = cue.category.fallback_timeout();
        if tokio::time::timeout(limit, playback.wait()).await.is_err() {
            debug!("Cue '{}' gave no end signal within {:?}", cue.name, limit);
        }
    }

    /// Stops whatever cue is playing.
    pub fn stop(&self) {
        self.player.stop_cues();
    }

    fn start(&self, cue: &AudioCue) -> Option<CuePlayback> {
        if !cue.is_unmutable() && self.is_voice_muted() {
            debug!("Voice muted, skipping cue '{}'", cue.name);
            return None;
        }
        let source = self.library.cue(cue);
        match self.player.play_cue(&source, self.volume) {
            Ok(playback) => {
                debug!("Playing cue '{}'", cue.name);
                Some(playback)
            }
            Err(e) => {
                warn!("Skipping cue '{}': {}", cue.name, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for CuePlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CuePlayer")
            .field("volume", &self.volume)
            .field("voice_muted", &self.is_voice_muted())
            .finish_non_exhaustive()
    }
}

//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform playback. The output stream is not
//! `Send`, so it lives on a dedicated audio thread for the lifetime of the
//! player; the player itself only keeps the stream handle and two sinks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::{mpsc, Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::SoundSource;
use super::{CuePlayback, SoundPlayer};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A sound player that uses rodio for audio playback.
///
/// This player is thread-safe and can be shared across threads using `Arc`.
pub struct RodioSoundPlayer {
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sink of the foreground cue currently playing.
    cue_sink: Mutex<Option<Arc<Sink>>>,
    /// Sink of the background track.
    track_sink: Mutex<Option<Sink>>,
    /// Dropping this ends the audio thread and closes the stream.
    _shutdown: mpsc::Sender<()>,
}

impl RodioSoundPlayer {
    /// Opens the default output device on a dedicated audio thread.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (handle_tx, handle_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        thread::Builder::new()
            .name("tiktik-audio".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    if handle_tx.send(Ok(handle)).is_ok() {
                        // Blocks until the player is dropped.
                        let _ = shutdown_rx.recv();
                    }
                    drop(stream);
                }
                Err(e) => {
                    let _ = handle_tx.send(Err(SoundError::DeviceNotAvailable(e.to_string())));
                }
            })
            .map_err(|e| SoundError::StreamError(e.to_string()))?;

        let stream_handle = handle_rx
            .recv()
            .map_err(|e| SoundError::StreamError(e.to_string()))??;

        debug!("Audio output stream initialized");

        Ok(Self {
            stream_handle,
            cue_sink: Mutex::new(None),
            track_sink: Mutex::new(None),
            _shutdown: shutdown_tx,
        })
    }

    fn new_sink(&self, volume: f32) -> Result<Sink, SoundError> {
        let sink =
            Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))?;
        sink.set_volume(volume);
        Ok(sink)
    }
}

/// Opens and decodes an audio file.
fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, SoundError> {
    let file = File::open(path)
        .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;
    Decoder::new(BufReader::new(file))
        .map_err(|e| SoundError::DecodeError(format!("{}: {}", path.display(), e)))
}

impl SoundPlayer for RodioSoundPlayer {
    fn play_cue(&self, source: &SoundSource, volume: f32) -> Result<CuePlayback, SoundError> {
        let decoder = open_decoder(&source.path)?;
        let sink = Arc::new(self.new_sink(volume)?);
        sink.append(decoder);

        if let Some(previous) = lock(&self.cue_sink).replace(Arc::clone(&sink)) {
            previous.stop();
        }

        let (done_tx, done_rx) = oneshot::channel();
        thread::Builder::new()
            .name("tiktik-cue".to_string())
            .spawn(move || {
                sink.sleep_until_end();
                let _ = done_tx.send(());
            })
            .map_err(|e| SoundError::PlaybackError(e.to_string()))?;

        debug!("Cue '{}' playing", source.name);
        Ok(CuePlayback::new(done_rx))
    }

    fn stop_cues(&self) {
        if let Some(sink) = lock(&self.cue_sink).take() {
            sink.stop();
        }
    }

    fn start_track(
        &self,
        source: &SoundSource,
        looping: bool,
        volume: f32,
    ) -> Result<(), SoundError> {
        let decoder = open_decoder(&source.path)?;
        let sink = self.new_sink(volume)?;
        if looping {
            sink.append(decoder.repeat_infinite());
        } else {
            sink.append(decoder);
        }

        if let Some(previous) = lock(&self.track_sink).replace(sink) {
            previous.stop();
        }
        debug!("Track '{}' playing (looping: {})", source.name, looping);
        Ok(())
    }

    fn pause_track(&self) {
        if let Some(sink) = lock(&self.track_sink).as_ref() {
            sink.pause();
        }
    }

    fn resume_track(&self) {
        if let Some(sink) = lock(&self.track_sink).as_ref() {
            sink.play();
        }
    }

    fn stop_track(&self) {
        if let Some(sink) = lock(&self.track_sink).take() {
            sink.stop();
        }
    }

    fn track_finished(&self) -> bool {
        lock(&self.track_sink)
            .as_ref()
            .is_some_and(|sink| sink.empty())
    }
}

impl Drop for RodioSoundPlayer {
    fn drop(&mut self) {
        self.stop_cues();
        self.stop_track();
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("cue_active", &lock(&self.cue_sink).is_some())
            .field("track_active", &lock(&self.track_sink).is_some())
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<Arc<RodioSoundPlayer>> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(Arc::new(player)),
        Err(e) => {
            warn!("Audio not available, sound disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}

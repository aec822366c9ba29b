//! Countdown engine.
//!
//! This module drives one session:
//! - One-second ticks with tokio::time::interval, only while ticking
//! - Phase boundaries gated on their cues (ticking halts until they finish)
//! - Fire-and-forget guided prompts, midway chime and halfway encouragement
//! - Background audio following the session (start, pause, resume, stop)
//! - Preset changes staged behind a confirmation while a session is active
//!
//! A gate is a boxed future tagged with a generation number. Reset and
//! confirmed reconfiguration bump the generation, stop all audio and drop the
//! gate, so a cue finishing after a reset never touches the new state.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::cues::{guided_prompt, halfway_cue, midway_cue, plan_for};
use crate::config::AppConfig;
use crate::preset::{Preset, SelectOutcome, SessionConfigurator};
use crate::sound::{AudioCue, AudioSubsystem, Track};
use crate::types::{
    Boundary, MeditationMode, SessionSnapshot, SessionState, SessionStatus, TickOutcome,
};

// ============================================================================
// SessionCommand / SessionEvent
// ============================================================================

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start the session (or restart it after completion)
    Start,
    /// Pause the session
    Pause,
    /// Resume a paused session
    Resume,
    /// Stop all audio and return to Idle
    Reset,
    /// Select a preset (staged while a session is active)
    SelectPreset(Preset),
    /// Apply the staged preset
    ConfirmChange,
    /// Discard the staged preset
    CancelChange,
    /// Toggle the voice-cue mute
    ToggleVoiceMute,
    /// Toggle the background-audio mute
    ToggleMusicMute,
    /// Stop all audio and end the run loop
    Shutdown,
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The pre-countdown advanced
    CountdownTick {
        /// Seconds left before the session begins
        remaining: u32,
    },
    /// One counted second elapsed
    Tick(SessionSnapshot),
    /// A new phase began
    PhaseChanged(SessionSnapshot),
    /// Session paused
    Paused(SessionSnapshot),
    /// Session resumed
    Resumed(SessionSnapshot),
    /// Session reset to Idle
    Reset(SessionSnapshot),
    /// A guided prompt is due
    PromptShown {
        /// Position in the schedule (0-based)
        index: usize,
        /// Line to display
        text: String,
    },
    /// A preset change is waiting for ConfirmChange or CancelChange
    ConfirmationRequired {
        /// Name of the staged preset
        preset: String,
    },
    /// A preset became active; the session is Idle
    PresetApplied(SessionSnapshot),
    /// The selected preset was already active
    PresetUnchanged {
        /// Name of the active preset
        preset: String,
    },
    /// The staged preset was discarded
    ChangeCancelled {
        /// Name of the discarded preset
        preset: String,
    },
    /// Voice mute toggled
    VoiceMuteChanged {
        /// New state
        muted: bool,
    },
    /// Background mute toggled
    MusicMuteChanged {
        /// New state
        muted: bool,
    },
    /// The session finished and its completion cues have played
    Completed(SessionSnapshot),
}

// ============================================================================
// EngineOptions
// ============================================================================

/// Engine settings taken from the application configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Length of the 3-2-1 pre-countdown (0 disables it)
    pub pre_countdown_seconds: u32,
    /// Play the music queue during workouts
    pub workout_music: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            pre_countdown_seconds: 3,
            workout_music: true,
        }
    }
}

impl From<&AppConfig> for EngineOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            pre_countdown_seconds: config.pre_countdown_seconds,
            workout_music: config.workout_music,
        }
    }
}

// ============================================================================
// SessionEngine
// ============================================================================

/// Cues in flight for a boundary.
struct CueGate {
    generation: u64,
    boundary: Boundary,
    /// Background audio was paused for these cues
    suspended_background: bool,
    future: Pin<Box<dyn Future<Output = ()> + Send>>,
}

/// Resolves with the gate's generation once its cues have played.
/// Never resolves when no gate is open.
async fn wait_gate(gate: &mut Option<CueGate>) -> u64 {
    match gate {
        Some(gate) => {
            (&mut gate.future).await;
            gate.generation
        }
        None => std::future::pending().await,
    }
}

/// Countdown engine for one session at a time.
pub struct SessionEngine {
    state: SessionState,
    configurator: SessionConfigurator,
    audio: AudioSubsystem,
    options: EngineOptions,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    gate: Option<CueGate>,
    generation: u64,
}

impl SessionEngine {
    /// Creates an engine with `configurator`'s active preset loaded and Idle.
    pub fn new(
        configurator: SessionConfigurator,
        audio: AudioSubsystem,
        options: EngineOptions,
        event_tx: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            state: configurator.active().idle_session(),
            configurator,
            audio,
            options,
            event_tx,
            gate: None,
            generation: 0,
        }
    }

    /// Runs the engine until `Shutdown` arrives or the command channel closes.
    ///
    /// It should be spawned as a separate tokio task.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<SessionCommand>) -> Result<()> {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    let command = match command {
                        None | Some(SessionCommand::Shutdown) => break,
                        Some(command) => command,
                    };
                    let was_ticking = self.is_ticking();
                    if let Err(e) = self.handle_command(command) {
                        warn!("{:#}", e);
                    }
                    if !was_ticking && self.is_ticking() {
                        ticker.reset();
                    }
                }
                _ = ticker.tick(), if self.is_ticking() => {
                    self.on_tick()?;
                }
                generation = wait_gate(&mut self.gate) => {
                    self.finish_gate(generation)?;
                    if self.is_ticking() {
                        ticker.reset();
                    }
                }
            }
        }

        info!("Session engine shutting down");
        self.cancel_pending();
        Ok(())
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command does not fit the current state
    /// (e.g., pausing when nothing is running) or an event cannot be sent.
    pub fn handle_command(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::Start => self.start(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Resume => self.resume(),
            SessionCommand::Reset => self.reset(),
            SessionCommand::SelectPreset(preset) => self.select_preset(preset),
            SessionCommand::ConfirmChange => self.confirm_change(),
            SessionCommand::CancelChange => self.cancel_change(),
            SessionCommand::ToggleVoiceMute => self.toggle_voice_mute(),
            SessionCommand::ToggleMusicMute => self.toggle_music_mute(),
            SessionCommand::Shutdown => {
                self.cancel_pending();
                Ok(())
            }
        }
    }

    /// Returns true if the ticker should be running.
    pub fn is_ticking(&self) -> bool {
        self.gate.is_none() && self.state.status().is_ticking()
    }

    /// Returns true while boundary cues are playing.
    pub fn is_gated(&self) -> bool {
        self.gate.is_some()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn configurator(&self) -> &SessionConfigurator {
        &self.configurator
    }

    pub fn audio(&self) -> &AudioSubsystem {
        &self.audio
    }

    /// Current state for display.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.snapshot(&self.configurator.active().name)
    }

    fn emit(&self, event: SessionEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .context("Failed to send session event")
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    fn start(&mut self) -> Result<()> {
        match self.state.status() {
            SessionStatus::Idle | SessionStatus::Complete => {}
            _ => bail!("a session is already in progress"),
        }
        self.cancel_pending();

        info!(
            "Starting {} '{}'",
            self.state.kind().as_str(),
            self.configurator.active().name
        );
        let pre_countdown = self.options.pre_countdown_seconds;
        match self.state.begin(pre_countdown) {
            Some(boundary) => self.open_gate(boundary, None),
            None => self.emit(SessionEvent::CountdownTick {
                remaining: pre_countdown,
            })?,
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if !self.state.status().is_ticking() {
            bail!("no session is running");
        }
        self.state.pause();
        self.audio.ambient.pause();
        debug!("Session paused at {}s", self.state.remaining_seconds());
        self.emit(SessionEvent::Paused(self.snapshot()))
    }

    fn resume(&mut self) -> Result<()> {
        if self.state.status() != SessionStatus::Paused {
            bail!("the session is not paused");
        }
        self.state.resume();
        self.audio.ambient.resume();
        if let Some(gate) = self.gate.as_mut() {
            gate.suspended_background |= self.audio.ambient.suspend_for_cue();
        }
        debug!("Session resumed at {}s", self.state.remaining_seconds());
        self.emit(SessionEvent::Resumed(self.snapshot()))
    }

    fn reset(&mut self) -> Result<()> {
        self.cancel_pending();
        self.state.reset();
        info!("Session reset");
        self.emit(SessionEvent::Reset(self.snapshot()))
    }

    fn select_preset(&mut self, preset: Preset) -> Result<()> {
        let active = self.state.status().is_active() || self.gate.is_some();
        match self.configurator.select(preset, active)? {
            SelectOutcome::Applied => {
                self.cancel_pending();
                self.state = self.configurator.active().idle_session();
                self.emit(SessionEvent::PresetApplied(self.snapshot()))
            }
            SelectOutcome::Unchanged => self.emit(SessionEvent::PresetUnchanged {
                preset: self.configurator.active().name.clone(),
            }),
            SelectOutcome::ConfirmationRequired => {
                let preset = self
                    .configurator
                    .staged()
                    .map(|preset| preset.name.clone())
                    .unwrap_or_default();
                self.emit(SessionEvent::ConfirmationRequired { preset })
            }
        }
    }

    fn confirm_change(&mut self) -> Result<()> {
        let preset = self.configurator.confirm()?.clone();
        self.cancel_pending();
        self.state = preset.idle_session();
        self.emit(SessionEvent::PresetApplied(self.snapshot()))
    }

    fn cancel_change(&mut self) -> Result<()> {
        match self.configurator.cancel() {
            Some(preset) => self.emit(SessionEvent::ChangeCancelled {
                preset: preset.name,
            }),
            None => bail!("no preset change is waiting for confirmation"),
        }
    }

    fn toggle_voice_mute(&mut self) -> Result<()> {
        let muted = !self.audio.cues.is_voice_muted();
        self.audio.cues.set_voice_muted(muted);
        self.emit(SessionEvent::VoiceMuteChanged { muted })
    }

    fn toggle_music_mute(&mut self) -> Result<()> {
        let muted = !self.audio.ambient.is_muted();
        self.audio.ambient.set_muted(muted);
        if !muted && self.state.has_begun() {
            self.start_background();
            if let Some(gate) = self.gate.as_mut() {
                gate.suspended_background |= self.audio.ambient.suspend_for_cue();
            } else if self.state.status() == SessionStatus::Paused {
                self.audio.ambient.pause();
            }
        }
        self.emit(SessionEvent::MusicMuteChanged { muted })
    }

    // ------------------------------------------------------------------------
    // Ticks and gates
    // ------------------------------------------------------------------------

    fn on_tick(&mut self) -> Result<()> {
        self.audio.ambient.poll();
        match self.state.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Countdown { remaining } => {
                self.emit(SessionEvent::CountdownTick { remaining })?;
            }
            TickOutcome::Counted { .. } => {
                self.emit(SessionEvent::Tick(self.snapshot()))?;
                if let Some(cue) = self.timed_cue()? {
                    self.audio.cues.play(&cue);
                }
            }
            TickOutcome::Boundary(Boundary::SessionStart) => {
                self.open_gate(Boundary::SessionStart, None);
            }
            TickOutcome::Boundary(boundary) => {
                self.emit(SessionEvent::Tick(self.snapshot()))?;
                // Queued behind the boundary cues so the gate chime cannot cut it off.
                let trailing = self.timed_cue()?;
                self.open_gate(boundary, trailing);
            }
        }
        Ok(())
    }

    /// The cue tied to elapsed time rather than a boundary, if one is due.
    ///
    /// Only one cue is returned per second since a new cue replaces the one
    /// playing. A guided prompt wins over the midway chime.
    fn timed_cue(&mut self) -> Result<Option<AudioCue>> {
        let (prompt, midway, halfway) = match &mut self.state {
            SessionState::Meditation(meditation) => {
                (meditation.due_prompt(), meditation.at_midway(), false)
            }
            SessionState::Workout(workout) => (None, false, workout.at_halfway()),
        };

        if let Some(index) = prompt {
            let prompt = guided_prompt(index);
            debug!("Guided prompt {} '{}'", index + 1, prompt.key);
            self.emit(SessionEvent::PromptShown {
                index,
                text: prompt.text.to_string(),
            })?;
            if midway {
                debug!("Midway chime skipped for prompt {}", index + 1);
            }
            return Ok(Some(AudioCue::prompt(prompt.key)));
        }
        if midway {
            return Ok(Some(midway_cue()));
        }
        Ok(halfway.then(halfway_cue))
    }

    /// Halts ticking and plays the cues for `boundary`.
    ///
    /// A `trailing` cue plays after the boundary's own cues.
    fn open_gate(&mut self, boundary: Boundary, trailing: Option<AudioCue>) {
        let mut plan = plan_for(&self.state, boundary);
        plan.extend(trailing);
        debug!("Boundary {:?}: {} cue(s)", boundary, plan.len());

        let suspended_background = self.audio.ambient.suspend_for_cue();
        let cues = Arc::clone(&self.audio.cues);
        self.gate = Some(CueGate {
            generation: self.generation,
            boundary,
            suspended_background,
            future: Box::pin(async move {
                for cue in &plan {
                    cues.play_and_wait(cue).await;
                }
            }),
        });
    }

    /// Applies the boundary whose cues have finished.
    fn finish_gate(&mut self, generation: u64) -> Result<()> {
        let Some(gate) = self.gate.take() else {
            return Ok(());
        };
        if gate.generation != self.generation || generation != self.generation {
            debug!("Dropping stale cue gate");
            return Ok(());
        }

        self.state.apply(gate.boundary);
        match gate.boundary {
            Boundary::SessionStart => {
                if gate.suspended_background {
                    self.audio.ambient.resume_after_cue();
                }
                self.start_background();
                if self.state.status() == SessionStatus::Paused {
                    self.audio.ambient.pause();
                }
                self.emit(SessionEvent::PhaseChanged(self.snapshot()))
            }
            Boundary::SessionEnded => {
                self.audio.ambient.stop();
                info!("Session '{}' complete", self.configurator.active().name);
                self.emit(SessionEvent::Completed(self.snapshot()))
            }
            Boundary::WorkEnded { .. } | Boundary::RestEnded { .. } => {
                if gate.suspended_background {
                    self.audio.ambient.resume_after_cue();
                }
                self.emit(SessionEvent::PhaseChanged(self.snapshot()))
            }
        }
    }

    /// Starts the background track that belongs to the session, if any.
    fn start_background(&mut self) {
        let track = match &self.state {
            SessionState::Workout(_) if self.options.workout_music => Some(Track::Music),
            SessionState::Workout(_) => None,
            SessionState::Meditation(meditation) => match meditation.config.mode {
                MeditationMode::Silent => None,
                _ => meditation.config.sound.map(Track::Ambient),
            },
        };
        if let Some(track) = track {
            self.audio.ambient.start(track);
        }
    }

    /// Drops any gate, invalidates late completions and silences everything.
    fn cancel_pending(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.gate = None;
        self.audio.stop_all();
    }
}

impl std::fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEngine")
            .field("state", &self.state)
            .field("preset", &self.configurator.active().name)
            .field("gated", &self.gate.is_some())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

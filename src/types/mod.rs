//! Core data types for the timer.
//!
//! This module defines the data structures used for:
//! - Session kinds, workout phases and session statuses
//! - Workout and meditation configuration with validation
//! - Pure per-second state machines for both session kinds
//! - Guided prompt scheduling
//! - The state snapshot rendered by the presentation layer

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// SessionKind / WorkoutPhase / SessionStatus
// ============================================================================

/// The two timer experiences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
    /// Interval workout (work / rest rounds)
    Workout,
    /// Single-stretch meditation
    Meditation,
}

impl SessionKind {
    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionKind::Workout => "workout",
            SessionKind::Meditation => "meditation",
        }
    }
}

/// Phase of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkoutPhase {
    /// Work interval
    #[default]
    Work,
    /// Rest interval between rounds
    Rest,
    /// Terminal phase after the last work interval
    Break,
}

impl WorkoutPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkoutPhase::Work => "work",
            WorkoutPhase::Rest => "rest",
            WorkoutPhase::Break => "break",
        }
    }
}

/// Activity status of a session.
///
/// For meditation sessions this is the whole phase; workout sessions pair it
/// with a [`WorkoutPhase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not started (or reset)
    #[default]
    Idle,
    /// Cosmetic 3-2-1 pre-phase, not part of the session time
    Countdown,
    /// Counting down the session time
    Running,
    /// Paused by the user
    Paused,
    /// Session finished
    Complete,
}

impl SessionStatus {
    /// Returns the string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "idle",
            SessionStatus::Countdown => "countdown",
            SessionStatus::Running => "running",
            SessionStatus::Paused => "paused",
            SessionStatus::Complete => "complete",
        }
    }

    /// Returns true if the one-second ticker should advance this session.
    pub fn is_ticking(&self) -> bool {
        matches!(self, SessionStatus::Countdown | SessionStatus::Running)
    }

    /// Returns true if a session is in progress (including paused).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionStatus::Countdown | SessionStatus::Running | SessionStatus::Paused
        )
    }
}

// ============================================================================
// WorkoutConfig
// ============================================================================

/// Longest work or rest interval accepted (one hour).
pub const MAX_INTERVAL_SECONDS: u32 = 60 * 60;

/// Most rounds a workout may have.
pub const MAX_ROUNDS: u32 = 100;

/// Configuration for an interval workout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutConfig {
    /// Work interval length in seconds
    pub work_seconds: u32,
    /// Rest interval length in seconds
    pub rest_seconds: u32,
    /// Number of work intervals
    pub rounds: u32,
}

impl Default for WorkoutConfig {
    fn default() -> Self {
        Self {
            work_seconds: 30,
            rest_seconds: 10,
            rounds: 5,
        }
    }
}

impl WorkoutConfig {
    /// Creates a new workout configuration.
    pub fn new(work_seconds: u32, rest_seconds: u32, rounds: u32) -> Self {
        Self {
            work_seconds,
            rest_seconds,
            rounds,
        }
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.work_seconds < 1 {
            return Err("work interval must be at least 1 second".to_string());
        }
        if self.rest_seconds < 1 {
            return Err("rest interval must be at least 1 second".to_string());
        }
        if self.rounds < 1 {
            return Err("a workout needs at least 1 round".to_string());
        }
        if self.work_seconds > MAX_INTERVAL_SECONDS || self.rest_seconds > MAX_INTERVAL_SECONDS {
            return Err(format!(
                "intervals can be at most {} seconds",
                MAX_INTERVAL_SECONDS
            ));
        }
        if self.rounds > MAX_ROUNDS {
            return Err(format!("a workout can have at most {} rounds", MAX_ROUNDS));
        }
        Ok(())
    }

    /// Total counted seconds of an uninterrupted run (no rest after the last round).
    ///
    /// Saturates at `u32::MAX` for configurations `validate` rejects.
    pub fn total_seconds(&self) -> u32 {
        self.work_seconds
            .saturating_mul(self.rounds)
            .saturating_add(self.rest_seconds.saturating_mul(self.rounds.saturating_sub(1)))
    }
}

// ============================================================================
// MeditationConfig
// ============================================================================

/// How a meditation session is accompanied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeditationMode {
    /// No voice prompts
    Silent,
    /// Periodic spoken prompts and a midway chime
    #[default]
    Guided,
    /// Background ambience only
    Ambient,
}

impl MeditationMode {
    /// All modes, in display order.
    pub const ALL: [MeditationMode; 3] = [
        MeditationMode::Silent,
        MeditationMode::Guided,
        MeditationMode::Ambient,
    ];

    /// Returns the string representation of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationMode::Silent => "silent",
            MeditationMode::Guided => "guided",
            MeditationMode::Ambient => "ambient",
        }
    }
}

impl FromStr for MeditationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown meditation mode '{}' (silent, guided, ambient)", s))
    }
}

/// Looping background sound for meditation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientSound {
    Rain,
    Ocean,
    Spa,
    Nature,
    Zen,
    Calm,
}

impl AmbientSound {
    /// All ambient sounds, in display order.
    pub const ALL: [AmbientSound; 6] = [
        AmbientSound::Rain,
        AmbientSound::Ocean,
        AmbientSound::Spa,
        AmbientSound::Nature,
        AmbientSound::Zen,
        AmbientSound::Calm,
    ];

    /// Returns the asset name of the sound.
    pub fn as_str(&self) -> &'static str {
        match self {
            AmbientSound::Rain => "rain",
            AmbientSound::Ocean => "ocean",
            AmbientSound::Spa => "spa",
            AmbientSound::Nature => "nature",
            AmbientSound::Zen => "zen",
            AmbientSound::Calm => "calm",
        }
    }
}

impl FromStr for AmbientSound {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "unknown ambient sound '{}' (rain, ocean, spa, nature, zen, calm)",
                    s
                )
            })
    }
}

/// Longest meditation accepted (three hours).
pub const MAX_MEDITATION_MINUTES: u32 = 180;

/// Configuration for a meditation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeditationConfig {
    /// Session length in minutes
    pub duration_minutes: u32,
    /// Accompaniment mode
    pub mode: MeditationMode,
    /// Optional looping background sound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<AmbientSound>,
}

impl Default for MeditationConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 5,
            mode: MeditationMode::Guided,
            sound: Some(AmbientSound::Spa),
        }
    }
}

impl MeditationConfig {
    /// Creates a new meditation configuration.
    pub fn new(duration_minutes: u32, mode: MeditationMode, sound: Option<AmbientSound>) -> Self {
        Self {
            duration_minutes,
            mode,
            sound,
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_minutes < 1 {
            return Err("meditation must last at least 1 minute".to_string());
        }
        if self.duration_minutes > MAX_MEDITATION_MINUTES {
            return Err(format!(
                "meditation can last at most {} minutes",
                MAX_MEDITATION_MINUTES
            ));
        }
        Ok(())
    }

    /// Session length in seconds.
    pub fn total_seconds(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }
}

// ============================================================================
// PromptSchedule
// ============================================================================

/// Number of guided prompts for a session length: 4 minimum, one more per
/// additional 5 minutes starting at 10, capped at 8.
pub fn prompt_count(duration_minutes: u32) -> usize {
    match duration_minutes {
        0..=9 => 4,
        10..=14 => 5,
        15..=19 => 6,
        20..=24 => 7,
        _ => 8,
    }
}

/// At-most-once schedule of guided prompts.
///
/// The session is split into `count + 1` equal intervals and prompt `k` is due
/// exactly when `k * interval` seconds have elapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSchedule {
    interval: u32,
    fired: Vec<bool>,
}

impl PromptSchedule {
    /// Builds the schedule for a configuration. Non-guided sessions get an empty schedule.
    pub fn new(config: &MeditationConfig) -> Self {
        if config.mode != MeditationMode::Guided {
            return Self {
                interval: 0,
                fired: Vec::new(),
            };
        }
        let count = prompt_count(config.duration_minutes);
        Self {
            interval: config.total_seconds() / (count as u32 + 1),
            fired: vec![false; count],
        }
    }

    /// Number of prompts in the schedule.
    pub fn count(&self) -> usize {
        self.fired.len()
    }

    /// Seconds between prompts.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Number of prompts already consumed.
    pub fn fired_count(&self) -> usize {
        self.fired.iter().filter(|fired| **fired).count()
    }

    /// Returns the prompt index due at `elapsed` seconds and marks it consumed.
    pub fn due(&mut self, elapsed: u32) -> Option<usize> {
        if self.interval == 0 || elapsed == 0 || elapsed % self.interval != 0 {
            return None;
        }
        let index = (elapsed / self.interval) as usize - 1;
        match self.fired.get_mut(index) {
            Some(fired) if !*fired => {
                *fired = true;
                Some(index)
            }
            _ => None,
        }
    }

    /// Clears all consumed prompts.
    pub fn reset(&mut self) {
        self.fired.iter_mut().for_each(|fired| *fired = false);
    }
}

// ============================================================================
// Boundary / TickOutcome
// ============================================================================

/// A phase boundary. The engine gates these on cue playback before applying them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// Pre-countdown finished; the first phase is about to begin
    SessionStart,
    /// A work interval ended and a rest follows
    WorkEnded {
        /// The round that just finished
        round: u32,
    },
    /// A rest ended and the next work interval follows
    RestEnded {
        /// The round about to begin
        next_round: u32,
    },
    /// The last unit of the session ended
    SessionEnded,
}

/// Result of advancing a session by one second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The session is not ticking
    Idle,
    /// The pre-countdown advanced
    Countdown {
        /// Seconds left before the session begins
        remaining: u32,
    },
    /// The current phase advanced
    Counted {
        /// Seconds left in the current phase
        remaining: u32,
    },
    /// The current phase (or pre-countdown) reached zero
    Boundary(Boundary),
}

// ============================================================================
// WorkoutState
// ============================================================================

/// Pure state machine of a workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutState {
    /// Activity status
    pub status: SessionStatus,
    /// Current phase
    pub phase: WorkoutPhase,
    /// Remaining seconds in the current phase
    pub remaining_seconds: u32,
    /// Current round (1-based)
    pub current_round: u32,
    /// Remaining pre-countdown seconds
    pub countdown: u32,
    /// Counted seconds since the first phase began
    pub elapsed_seconds: u32,
    /// Configuration copied at session creation
    pub config: WorkoutConfig,
    /// Status to restore on resume
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_to: Option<SessionStatus>,
}

impl WorkoutState {
    /// Creates a new idle workout.
    pub fn new(config: WorkoutConfig) -> Self {
        Self {
            status: SessionStatus::Idle,
            phase: WorkoutPhase::Work,
            remaining_seconds: config.work_seconds,
            current_round: 1,
            countdown: 0,
            elapsed_seconds: 0,
            config,
            resume_to: None,
        }
    }

    /// Begins a session with the given pre-countdown.
    ///
    /// Returns the start boundary immediately when there is no pre-countdown.
    pub fn begin(&mut self, pre_countdown: u32) -> Option<Boundary> {
        *self = Self::new(self.config);
        self.status = SessionStatus::Countdown;
        self.countdown = pre_countdown;
        (pre_countdown == 0).then_some(Boundary::SessionStart)
    }

    /// Advances the session by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            SessionStatus::Countdown => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    TickOutcome::Boundary(Boundary::SessionStart)
                } else {
                    TickOutcome::Countdown {
                        remaining: self.countdown,
                    }
                }
            }
            SessionStatus::Running => {
                if self.remaining_seconds > 0 {
                    self.remaining_seconds -= 1;
                    self.elapsed_seconds += 1;
                }
                if self.remaining_seconds == 0 {
                    TickOutcome::Boundary(self.phase_boundary())
                } else {
                    TickOutcome::Counted {
                        remaining: self.remaining_seconds,
                    }
                }
            }
            _ => TickOutcome::Idle,
        }
    }

    fn phase_boundary(&self) -> Boundary {
        match self.phase {
            WorkoutPhase::Work if self.current_round < self.config.rounds => Boundary::WorkEnded {
                round: self.current_round,
            },
            WorkoutPhase::Work | WorkoutPhase::Break => Boundary::SessionEnded,
            WorkoutPhase::Rest => Boundary::RestEnded {
                next_round: self.current_round + 1,
            },
        }
    }

    /// Applies a boundary: the next phase and its duration are set together.
    pub fn apply(&mut self, boundary: Boundary) {
        match boundary {
            Boundary::SessionStart => {
                self.phase = WorkoutPhase::Work;
                self.current_round = 1;
                self.remaining_seconds = self.config.work_seconds;
                self.countdown = 0;
                self.enter_running();
            }
            Boundary::WorkEnded { .. } => {
                self.phase = WorkoutPhase::Rest;
                self.remaining_seconds = self.config.rest_seconds;
            }
            Boundary::RestEnded { next_round } => {
                self.current_round = next_round;
                self.phase = WorkoutPhase::Work;
                self.remaining_seconds = self.config.work_seconds;
            }
            Boundary::SessionEnded => {
                self.phase = WorkoutPhase::Break;
                self.remaining_seconds = 0;
                self.status = SessionStatus::Complete;
                self.resume_to = None;
            }
        }
    }

    fn enter_running(&mut self) {
        if self.status == SessionStatus::Paused {
            self.resume_to = Some(SessionStatus::Running);
        } else {
            self.status = SessionStatus::Running;
        }
    }

    /// Pauses the session. Only works while ticking.
    pub fn pause(&mut self) {
        if self.status.is_ticking() {
            self.resume_to = Some(self.status);
            self.status = SessionStatus::Paused;
        }
    }

    /// Resumes the status held before the pause.
    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = self.resume_to.take().unwrap_or(SessionStatus::Running);
        }
    }

    /// Returns true once the first phase has begun and until the session ends.
    pub fn has_begun(&self) -> bool {
        self.status == SessionStatus::Running
            || (self.status == SessionStatus::Paused
                && self.resume_to == Some(SessionStatus::Running))
    }

    /// Returns to the idle state of the current configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Returns true once the counted time reaches half of the whole workout.
    pub fn at_halfway(&self) -> bool {
        let total = self.config.total_seconds();
        total >= 2 && self.elapsed_seconds == total / 2
    }

    /// Returns true if the session is ticking.
    pub fn is_running(&self) -> bool {
        self.status.is_ticking()
    }

    /// Returns true if the session is paused.
    pub fn is_paused(&self) -> bool {
        self.status == SessionStatus::Paused
    }
}

// ============================================================================
// MeditationState
// ============================================================================

/// Pure state machine of a meditation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeditationState {
    /// Activity status (the meditation phase)
    pub status: SessionStatus,
    /// Remaining seconds
    pub remaining_seconds: u32,
    /// Remaining pre-countdown seconds
    pub countdown: u32,
    /// Configuration copied at session creation
    pub config: MeditationConfig,
    /// Guided prompt schedule
    pub prompts: PromptSchedule,
    /// Status to restore on resume
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_to: Option<SessionStatus>,
}

impl MeditationState {
    /// Creates a new idle meditation.
    pub fn new(config: MeditationConfig) -> Self {
        Self {
            status: SessionStatus::Idle,
            remaining_seconds: config.total_seconds(),
            countdown: 0,
            prompts: PromptSchedule::new(&config),
            config,
            resume_to: None,
        }
    }

    /// Begins a session with the given pre-countdown.
    pub fn begin(&mut self, pre_countdown: u32) -> Option<Boundary> {
        *self = Self::new(self.config);
        self.status = SessionStatus::Countdown;
        self.countdown = pre_countdown;
        (pre_countdown == 0).then_some(Boundary::SessionStart)
    }

    /// Seconds counted since the session began.
    pub fn elapsed_seconds(&self) -> u32 {
        self.config.total_seconds() - self.remaining_seconds
    }

    /// Advances the session by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            SessionStatus::Countdown => {
                self.countdown = self.countdown.saturating_sub(1);
                if self.countdown == 0 {
                    TickOutcome::Boundary(Boundary::SessionStart)
                } else {
                    TickOutcome::Countdown {
                        remaining: self.countdown,
                    }
                }
            }
            SessionStatus::Running => {
                self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
                if self.remaining_seconds == 0 {
                    TickOutcome::Boundary(Boundary::SessionEnded)
                } else {
                    TickOutcome::Counted {
                        remaining: self.remaining_seconds,
                    }
                }
            }
            _ => TickOutcome::Idle,
        }
    }

    /// Applies a boundary. Meditation only knows start and end.
    pub fn apply(&mut self, boundary: Boundary) {
        match boundary {
            Boundary::SessionStart => {
                self.remaining_seconds = self.config.total_seconds();
                self.countdown = 0;
                if self.status == SessionStatus::Paused {
                    self.resume_to = Some(SessionStatus::Running);
                } else {
                    self.status = SessionStatus::Running;
                }
            }
            Boundary::SessionEnded => {
                self.remaining_seconds = 0;
                self.status = SessionStatus::Complete;
                self.resume_to = None;
            }
            Boundary::WorkEnded { .. } | Boundary::RestEnded { .. } => {}
        }
    }

    /// Returns the guided prompt due at the current elapsed time, consuming it.
    pub fn due_prompt(&mut self) -> Option<usize> {
        if self.status != SessionStatus::Running {
            return None;
        }
        let elapsed = self.elapsed_seconds();
        self.prompts.due(elapsed)
    }

    /// Returns true exactly at the midpoint of a guided session.
    pub fn at_midway(&self) -> bool {
        self.config.mode == MeditationMode::Guided
            && self.remaining_seconds > 0
            && self.elapsed_seconds() == self.config.total_seconds() / 2
    }

    /// Pauses the session. Only works while ticking.
    pub fn pause(&mut self) {
        if self.status.is_ticking() {
            self.resume_to = Some(self.status);
            self.status = SessionStatus::Paused;
        }
    }

    /// Resumes the status held before the pause.
    pub fn resume(&mut self) {
        if self.status == SessionStatus::Paused {
            self.status = self.resume_to.take().unwrap_or(SessionStatus::Running);
        }
    }

    /// Returns true once the first phase has begun and until the session ends.
    pub fn has_begun(&self) -> bool {
        self.status == SessionStatus::Running
            || (self.status == SessionStatus::Paused
                && self.resume_to == Some(SessionStatus::Running))
    }

    /// Returns to the idle state of the current configuration.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }
}

// ============================================================================
// SessionState
// ============================================================================

/// The active session, either kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionState {
    Workout(WorkoutState),
    Meditation(MeditationState),
}

impl SessionState {
    /// Returns the session kind.
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionState::Workout(_) => SessionKind::Workout,
            SessionState::Meditation(_) => SessionKind::Meditation,
        }
    }

    /// Returns the activity status.
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Workout(state) => state.status,
            SessionState::Meditation(state) => state.status,
        }
    }

    /// Remaining seconds in the current phase.
    pub fn remaining_seconds(&self) -> u32 {
        match self {
            SessionState::Workout(state) => state.remaining_seconds,
            SessionState::Meditation(state) => state.remaining_seconds,
        }
    }

    /// Starts the session, returning the first boundary when there is no pre-countdown.
    pub fn begin(&mut self, pre_countdown: u32) -> Option<Boundary> {
        match self {
            SessionState::Workout(state) => state.begin(pre_countdown),
            SessionState::Meditation(state) => state.begin(pre_countdown),
        }
    }

    /// Advances the session by one second.
    pub fn tick(&mut self) -> TickOutcome {
        match self {
            SessionState::Workout(state) => state.tick(),
            SessionState::Meditation(state) => state.tick(),
        }
    }

    /// Applies a boundary once its cues have played.
    pub fn apply(&mut self, boundary: Boundary) {
        match self {
            SessionState::Workout(state) => state.apply(boundary),
            SessionState::Meditation(state) => state.apply(boundary),
        }
    }

    /// Pauses the session.
    pub fn pause(&mut self) {
        match self {
            SessionState::Workout(state) => state.pause(),
            SessionState::Meditation(state) => state.pause(),
        }
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        match self {
            SessionState::Workout(state) => state.resume(),
            SessionState::Meditation(state) => state.resume(),
        }
    }

    /// Returns to the idle state of the current configuration.
    pub fn reset(&mut self) {
        match self {
            SessionState::Workout(state) => state.reset(),
            SessionState::Meditation(state) => state.reset(),
        }
    }

    /// Returns true once the first phase has begun and until the session ends.
    pub fn has_begun(&self) -> bool {
        match self {
            SessionState::Workout(state) => state.has_begun(),
            SessionState::Meditation(state) => state.has_begun(),
        }
    }

    /// Captures the values the presentation layer renders.
    pub fn snapshot(&self, preset: &str) -> SessionSnapshot {
        let preset = preset.to_string();
        match self {
            SessionState::Workout(state) => SessionSnapshot {
                preset,
                kind: SessionKind::Workout,
                status: state.status,
                phase: Some(state.phase),
                remaining_seconds: state.remaining_seconds,
                current_round: Some(state.current_round),
                total_rounds: Some(state.config.rounds),
            },
            SessionState::Meditation(state) => SessionSnapshot {
                preset,
                kind: SessionKind::Meditation,
                status: state.status,
                phase: None,
                remaining_seconds: state.remaining_seconds,
                current_round: None,
                total_rounds: None,
            },
        }
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub preset: String,
    pub kind: SessionKind,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase: Option<WorkoutPhase>,
    #[serde(rename = "remainingSeconds")]
    pub remaining_seconds: u32,
    #[serde(rename = "currentRound", skip_serializing_if = "Option::is_none")]
    pub current_round: Option<u32>,
    #[serde(rename = "totalRounds", skip_serializing_if = "Option::is_none")]
    pub total_rounds: Option<u32>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tabata() -> WorkoutConfig {
        WorkoutConfig::new(20, 10, 8)
    }

    /// Runs a workout to completion, applying boundaries immediately.
    fn run_workout(state: &mut WorkoutState) -> (u32, Vec<WorkoutPhase>) {
        let mut counted = 0;
        let mut phases = vec![state.phase];
        loop {
            match state.tick() {
                TickOutcome::Counted { .. } => counted += 1,
                TickOutcome::Boundary(boundary) => {
                    if state.status == SessionStatus::Running {
                        counted += 1;
                    }
                    state.apply(boundary);
                    phases.push(state.phase);
                    if state.status == SessionStatus::Complete {
                        return (counted, phases);
                    }
                }
                TickOutcome::Countdown { .. } => {}
                TickOutcome::Idle => panic!("workout stopped ticking"),
            }
        }
    }

    // ------------------------------------------------------------------------
    // Enum Tests
    // ------------------------------------------------------------------------

    mod enum_tests {
        use super::*;

        #[test]
        fn test_default_status_is_idle() {
            assert_eq!(SessionStatus::default(), SessionStatus::Idle);
            assert_eq!(WorkoutPhase::default(), WorkoutPhase::Work);
        }

        #[test]
        fn test_status_is_ticking() {
            assert!(!SessionStatus::Idle.is_ticking());
            assert!(SessionStatus::Countdown.is_ticking());
            assert!(SessionStatus::Running.is_ticking());
            assert!(!SessionStatus::Paused.is_ticking());
            assert!(!SessionStatus::Complete.is_ticking());
        }

        #[test]
        fn test_status_is_active() {
            assert!(!SessionStatus::Idle.is_active());
            assert!(SessionStatus::Paused.is_active());
            assert!(!SessionStatus::Complete.is_active());
        }

        #[test]
        fn test_phase_serialize() {
            let json = serde_json::to_string(&WorkoutPhase::Rest).unwrap();
            assert_eq!(json, "\"rest\"");
        }

        #[test]
        fn test_parse_mode_case_insensitive() {
            assert_eq!("Guided".parse::<MeditationMode>(), Ok(MeditationMode::Guided));
            assert_eq!("silent".parse::<MeditationMode>(), Ok(MeditationMode::Silent));
            assert!("loud".parse::<MeditationMode>().is_err());
        }

        #[test]
        fn test_parse_ambient_sound() {
            assert_eq!("OCEAN".parse::<AmbientSound>(), Ok(AmbientSound::Ocean));
            let err = "thunder".parse::<AmbientSound>().unwrap_err();
            assert!(err.contains("thunder"));
        }
    }

    // ------------------------------------------------------------------------
    // Config Tests
    // ------------------------------------------------------------------------

    mod config_tests {
        use super::*;

        #[test]
        fn test_workout_total_seconds() {
            assert_eq!(tabata().total_seconds(), 8 * 20 + 7 * 10);
            assert_eq!(WorkoutConfig::new(30, 15, 1).total_seconds(), 30);
        }

        #[test]
        fn test_workout_validate() {
            assert!(tabata().validate().is_ok());
            assert!(WorkoutConfig::new(0, 10, 8).validate().is_err());
            assert!(WorkoutConfig::new(20, 0, 8).validate().is_err());
            assert!(WorkoutConfig::new(20, 10, 0).validate().is_err());
        }

        #[test]
        fn test_workout_upper_limits() {
            assert!(WorkoutConfig::new(MAX_INTERVAL_SECONDS, MAX_INTERVAL_SECONDS, MAX_ROUNDS)
                .validate()
                .is_ok());
            assert!(WorkoutConfig::new(u32::MAX, 1, 2).validate().is_err());
            assert!(WorkoutConfig::new(20, MAX_INTERVAL_SECONDS + 1, 8).validate().is_err());
            assert!(WorkoutConfig::new(20, 10, MAX_ROUNDS + 1).validate().is_err());
        }

        #[test]
        fn test_workout_total_seconds_saturates() {
            assert_eq!(WorkoutConfig::new(u32::MAX, 1, 2).total_seconds(), u32::MAX);
            assert_eq!(WorkoutConfig::new(1, u32::MAX, 3).total_seconds(), u32::MAX);
        }

        #[test]
        fn test_meditation_upper_limit() {
            let longest = MeditationConfig::new(MAX_MEDITATION_MINUTES, MeditationMode::Guided, None);
            assert!(longest.validate().is_ok());
            assert_eq!(longest.total_seconds(), 180 * 60);

            let huge = MeditationConfig::new(71_582_789, MeditationMode::Guided, None);
            assert!(huge.validate().is_err());
            assert_eq!(huge.total_seconds(), u32::MAX);
        }

        #[test]
        fn test_meditation_defaults() {
            let config = MeditationConfig::default();
            assert_eq!(config.duration_minutes, 5);
            assert_eq!(config.mode, MeditationMode::Guided);
            assert_eq!(config.total_seconds(), 300);
        }

        #[test]
        fn test_meditation_deserialize_without_sound() {
            let json = r#"{"duration_minutes":10,"mode":"silent"}"#;
            let config: MeditationConfig = serde_json::from_str(json).unwrap();
            assert_eq!(config.sound, None);
            assert_eq!(config.mode, MeditationMode::Silent);
        }
    }

    // ------------------------------------------------------------------------
    // PromptSchedule Tests
    // ------------------------------------------------------------------------

    mod prompt_schedule_tests {
        use super::*;

        #[test]
        fn test_prompt_count_tiers() {
            assert_eq!(prompt_count(1), 4);
            assert_eq!(prompt_count(5), 4);
            assert_eq!(prompt_count(9), 4);
            assert_eq!(prompt_count(10), 5);
            assert_eq!(prompt_count(15), 6);
            assert_eq!(prompt_count(20), 7);
            assert_eq!(prompt_count(25), 8);
            assert_eq!(prompt_count(90), 8);
        }

        #[test]
        fn test_five_minute_schedule() {
            let config = MeditationConfig::new(5, MeditationMode::Guided, None);
            let mut schedule = PromptSchedule::new(&config);

            assert_eq!(schedule.count(), 4);
            assert_eq!(schedule.interval(), 60);

            let fired: Vec<_> = (0..=300).filter_map(|s| schedule.due(s)).collect();
            assert_eq!(fired, vec![0, 1, 2, 3]);
        }

        #[test]
        fn test_prompt_fires_at_most_once() {
            let config = MeditationConfig::new(5, MeditationMode::Guided, None);
            let mut schedule = PromptSchedule::new(&config);

            assert_eq!(schedule.due(60), Some(0));
            assert_eq!(schedule.due(60), None);
            assert_eq!(schedule.fired_count(), 1);
        }

        #[test]
        fn test_silent_mode_has_no_prompts() {
            let config = MeditationConfig::new(20, MeditationMode::Silent, None);
            let mut schedule = PromptSchedule::new(&config);

            assert_eq!(schedule.count(), 0);
            assert_eq!(schedule.due(200), None);
        }

        #[test]
        fn test_reset_clears_fired() {
            let config = MeditationConfig::new(5, MeditationMode::Guided, None);
            let mut schedule = PromptSchedule::new(&config);
            schedule.due(60);
            schedule.reset();
            assert_eq!(schedule.fired_count(), 0);
        }
    }

    // ------------------------------------------------------------------------
    // WorkoutState Tests
    // ------------------------------------------------------------------------

    mod workout_state_tests {
        use super::*;

        #[test]
        fn test_new_state() {
            let state = WorkoutState::new(tabata());

            assert_eq!(state.status, SessionStatus::Idle);
            assert_eq!(state.phase, WorkoutPhase::Work);
            assert_eq!(state.remaining_seconds, 20);
            assert_eq!(state.current_round, 1);
        }

        #[test]
        fn test_begin_with_countdown() {
            let mut state = WorkoutState::new(tabata());

            assert_eq!(state.begin(3), None);
            assert_eq!(state.status, SessionStatus::Countdown);
            assert_eq!(state.tick(), TickOutcome::Countdown { remaining: 2 });
            assert_eq!(state.tick(), TickOutcome::Countdown { remaining: 1 });
            assert_eq!(state.tick(), TickOutcome::Boundary(Boundary::SessionStart));
            // Countdown is not part of the phase time
            assert_eq!(state.remaining_seconds, 20);
        }

        #[test]
        fn test_begin_without_countdown() {
            let mut state = WorkoutState::new(tabata());
            assert_eq!(state.begin(0), Some(Boundary::SessionStart));
        }

        #[test]
        fn test_tabata_runs_230_ticks() {
            let mut state = WorkoutState::new(tabata());
            state.begin(0);
            state.apply(Boundary::SessionStart);

            let (counted, phases) = run_workout(&mut state);

            assert_eq!(counted, 230);
            let mut expected = Vec::new();
            for round in 1..=8 {
                expected.push(WorkoutPhase::Work);
                if round < 8 {
                    expected.push(WorkoutPhase::Rest);
                }
            }
            expected.push(WorkoutPhase::Break);
            assert_eq!(phases, expected);
            assert_eq!(state.current_round, 8);
        }

        #[test]
        fn test_last_work_ends_session() {
            let mut state = WorkoutState::new(WorkoutConfig::new(2, 1, 1));
            state.begin(0);
            state.apply(Boundary::SessionStart);

            assert_eq!(state.tick(), TickOutcome::Counted { remaining: 1 });
            assert_eq!(state.tick(), TickOutcome::Boundary(Boundary::SessionEnded));

            state.apply(Boundary::SessionEnded);
            assert_eq!(state.status, SessionStatus::Complete);
            assert_eq!(state.phase, WorkoutPhase::Break);
            assert_eq!(state.tick(), TickOutcome::Idle);
        }

        #[test]
        fn test_boundary_is_stable_until_applied() {
            let mut state = WorkoutState::new(WorkoutConfig::new(1, 5, 2));
            state.begin(0);
            state.apply(Boundary::SessionStart);

            let first = state.tick();
            let second = state.tick();
            assert_eq!(first, TickOutcome::Boundary(Boundary::WorkEnded { round: 1 }));
            assert_eq!(first, second);
            assert_eq!(state.elapsed_seconds, 1);
        }

        #[test]
        fn test_pause_preserves_remaining() {
            let mut state = WorkoutState::new(tabata());
            state.begin(0);
            state.apply(Boundary::SessionStart);
            state.tick();
            state.tick();

            state.pause();
            assert_eq!(state.tick(), TickOutcome::Idle);
            assert_eq!(state.remaining_seconds, 18);

            state.resume();
            assert_eq!(state.status, SessionStatus::Running);
            assert_eq!(state.remaining_seconds, 18);
        }

        #[test]
        fn test_pause_during_countdown_resumes_countdown() {
            let mut state = WorkoutState::new(tabata());
            state.begin(3);
            state.pause();
            state.resume();
            assert_eq!(state.status, SessionStatus::Countdown);
        }

        #[test]
        fn test_boundary_applied_while_paused_keeps_pause() {
            let mut state = WorkoutState::new(tabata());
            state.begin(1);
            state.tick();
            state.pause();

            state.apply(Boundary::SessionStart);
            assert_eq!(state.status, SessionStatus::Paused);
            assert_eq!(state.remaining_seconds, 20);

            state.resume();
            assert_eq!(state.status, SessionStatus::Running);
        }

        #[test]
        fn test_has_begun() {
            let mut state = WorkoutState::new(tabata());
            state.begin(2);
            assert!(!state.has_begun());
            state.pause();
            assert!(!state.has_begun());
            state.resume();
            state.apply(Boundary::SessionStart);
            assert!(state.has_begun());
            state.pause();
            assert!(state.has_begun());
            state.apply(Boundary::SessionEnded);
            assert!(!state.has_begun());
        }

        #[test]
        fn test_pause_from_idle_does_nothing() {
            let mut state = WorkoutState::new(tabata());
            state.pause();
            assert_eq!(state.status, SessionStatus::Idle);
        }

        #[test]
        fn test_reset() {
            let mut state = WorkoutState::new(tabata());
            state.begin(0);
            state.apply(Boundary::SessionStart);
            state.apply(Boundary::WorkEnded { round: 1 });
            state.apply(Boundary::RestEnded { next_round: 2 });

            state.reset();

            assert_eq!(state.status, SessionStatus::Idle);
            assert_eq!(state.current_round, 1);
            assert_eq!(state.phase, WorkoutPhase::Work);
            assert_eq!(state.remaining_seconds, 20);
        }

        #[test]
        fn test_halfway() {
            let mut state = WorkoutState::new(WorkoutConfig::new(4, 2, 2));
            state.begin(0);
            state.apply(Boundary::SessionStart);
            // total = 10, halfway at 5 counted seconds
            let mut halfway_hits = 0;
            for _ in 0..12 {
                if let TickOutcome::Boundary(boundary) = state.tick() {
                    state.apply(boundary);
                }
                if state.at_halfway() {
                    halfway_hits += 1;
                }
                if state.status == SessionStatus::Complete {
                    break;
                }
            }
            assert!(halfway_hits >= 1);
        }
    }

    // ------------------------------------------------------------------------
    // MeditationState Tests
    // ------------------------------------------------------------------------

    mod meditation_state_tests {
        use super::*;

        #[test]
        fn test_runs_duration_ticks() {
            let mut state = MeditationState::new(MeditationConfig::new(5, MeditationMode::Silent, None));
            state.begin(0);
            state.apply(Boundary::SessionStart);

            let mut counted = 0;
            loop {
                match state.tick() {
                    TickOutcome::Counted { .. } => counted += 1,
                    TickOutcome::Boundary(Boundary::SessionEnded) => {
                        counted += 1;
                        state.apply(Boundary::SessionEnded);
                        break;
                    }
                    other => panic!("unexpected outcome {:?}", other),
                }
            }

            assert_eq!(counted, 300);
            assert_eq!(state.status, SessionStatus::Complete);
        }

        #[test]
        fn test_guided_prompts_not_replayed_after_pause() {
            let mut state = MeditationState::new(MeditationConfig::new(5, MeditationMode::Guided, None));
            state.begin(0);
            state.apply(Boundary::SessionStart);

            let mut prompts = Vec::new();
            for second in 1..=300 {
                if second == 60 {
                    state.tick();
                    if let Some(index) = state.due_prompt() {
                        prompts.push(index);
                    }
                    state.pause();
                    assert_eq!(state.due_prompt(), None);
                    state.resume();
                    assert_eq!(state.due_prompt(), None);
                    continue;
                }
                if let TickOutcome::Boundary(boundary) = state.tick() {
                    state.apply(boundary);
                }
                if let Some(index) = state.due_prompt() {
                    prompts.push(index);
                }
            }

            assert_eq!(prompts, vec![0, 1, 2, 3]);
        }

        #[test]
        fn test_midway_only_in_guided() {
            let mut guided = MeditationState::new(MeditationConfig::new(1, MeditationMode::Guided, None));
            guided.begin(0);
            guided.apply(Boundary::SessionStart);
            guided.remaining_seconds = 30;
            assert!(guided.at_midway());

            let mut silent = MeditationState::new(MeditationConfig::new(1, MeditationMode::Silent, None));
            silent.begin(0);
            silent.apply(Boundary::SessionStart);
            silent.remaining_seconds = 30;
            assert!(!silent.at_midway());
        }

        #[test]
        fn test_ignores_workout_boundaries() {
            let mut state = MeditationState::new(MeditationConfig::default());
            state.begin(0);
            state.apply(Boundary::SessionStart);
            state.apply(Boundary::WorkEnded { round: 1 });
            assert_eq!(state.status, SessionStatus::Running);
            assert_eq!(state.remaining_seconds, 300);
        }
    }

    // ------------------------------------------------------------------------
    // Snapshot Tests
    // ------------------------------------------------------------------------

    mod snapshot_tests {
        use super::*;

        #[test]
        fn test_workout_snapshot() {
            let state = SessionState::Workout(WorkoutState::new(tabata()));
            let snapshot = state.snapshot("Tabata");
            assert_eq!(snapshot.preset, "Tabata");

            assert_eq!(snapshot.kind, SessionKind::Workout);
            assert_eq!(snapshot.phase, Some(WorkoutPhase::Work));
            assert_eq!(snapshot.current_round, Some(1));
            assert_eq!(snapshot.total_rounds, Some(8));
        }

        #[test]
        fn test_meditation_snapshot_serialize() {
            let state = SessionState::Meditation(MeditationState::new(MeditationConfig::default()));
            let json = serde_json::to_string(&state.snapshot("Quick Calm")).unwrap();

            assert!(json.contains("\"kind\":\"meditation\""));
            assert!(json.contains("\"remainingSeconds\":300"));
            assert!(!json.contains("currentRound"));
        }
    }
}

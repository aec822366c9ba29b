//! Display utilities for the tiktik CLI.
//!
//! This module provides formatted output for:
//! - Session events (countdown, ticks, phase changes, prompts)
//! - The preset catalog
//! - Error messages

use std::io::{self, Write};

use crate::preset::Preset;
use crate::session::SessionEvent;
use crate::types::{SessionKind, SessionSnapshot, SessionStatus, WorkoutPhase};

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the session header and the keyboard controls.
    pub fn show_session_start(preset: &Preset) {
        println!("{} ({})", preset.name, preset.summary());
        Self::show_controls();
    }

    /// Shows the keyboard controls.
    pub fn show_controls() {
        println!("Controls: p pause | r resume | s start | x reset | v voice | m music | q quit");
        println!("          preset <name> to switch, then y/n to confirm");
    }

    /// Shows what can follow a finished session.
    pub fn show_finished_hint() {
        println!("s to run it again, q to quit");
    }

    /// Shows one session event.
    ///
    /// Ticks rewrite the current terminal line; everything else clears it and
    /// prints a line of its own.
    pub fn show_event(event: &SessionEvent) {
        let Some(line) = Self::render_event(event) else {
            return;
        };
        if matches!(event, SessionEvent::Tick(_)) {
            print!("\r\x1b[2K{}", line);
            let _ = io::stdout().flush();
        } else {
            println!("\r\x1b[2K{}", line);
        }
    }

    /// Shows the preset catalog as a table.
    pub fn show_presets(presets: &[Preset]) {
        let width = presets
            .iter()
            .map(|preset| preset.name.len())
            .max()
            .unwrap_or(0);
        let mut kind = None;
        for preset in presets {
            if kind != Some(preset.kind()) {
                kind = Some(preset.kind());
                println!("{}", Self::kind_heading(preset.kind()));
            }
            println!("  {:width$}  {}", preset.name, preset.summary(), width = width);
        }
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }

    /// Formats remaining seconds as (minutes, seconds).
    fn format_time(total_seconds: u32) -> (u32, u32) {
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;
        (minutes, seconds)
    }

    fn kind_heading(kind: SessionKind) -> &'static str {
        match kind {
            SessionKind::Workout => "Workout presets",
            SessionKind::Meditation => "Meditation presets",
        }
    }

    /// The line printed for an event, if any.
    fn render_event(event: &SessionEvent) -> Option<String> {
        let line = match event {
            SessionEvent::CountdownTick { remaining } if *remaining > 0 => {
                format!("Starting in {}...", remaining)
            }
            SessionEvent::CountdownTick { .. } => return None,
            SessionEvent::Tick(snapshot) => Self::status_line(snapshot),
            SessionEvent::PhaseChanged(snapshot) => {
                format!("> {}", Self::phase_label(snapshot))
            }
            SessionEvent::Paused(snapshot) => {
                format!("|| Paused  {}", Self::clock(snapshot.remaining_seconds))
            }
            SessionEvent::Resumed(snapshot) => {
                format!("> Resumed  {}", Self::clock(snapshot.remaining_seconds))
            }
            SessionEvent::Reset(snapshot) => {
                format!("[] Reset  {}", Self::clock(snapshot.remaining_seconds))
            }
            SessionEvent::PromptShown { text, .. } => format!("  ~ {}", text),
            SessionEvent::ConfirmationRequired { preset } => {
                format!("Switch to '{}'? This resets the session. [y/n]", preset)
            }
            SessionEvent::PresetApplied(snapshot) => format!(
                "* Preset '{}' ready ({})",
                snapshot.preset,
                Self::clock(snapshot.remaining_seconds)
            ),
            SessionEvent::PresetUnchanged { preset } => {
                format!("'{}' is already selected", preset)
            }
            SessionEvent::ChangeCancelled { preset } => {
                format!("Kept the current session ('{}' discarded)", preset)
            }
            SessionEvent::VoiceMuteChanged { muted } => {
                format!("Voice cues {}", if *muted { "muted" } else { "on" })
            }
            SessionEvent::MusicMuteChanged { muted } => {
                format!("Background audio {}", if *muted { "muted" } else { "on" })
            }
            SessionEvent::Completed(snapshot) => format!("* '{}' complete!", snapshot.preset),
        };
        Some(line)
    }

    /// `mm:ss`
    fn clock(total_seconds: u32) -> String {
        let (minutes, seconds) = Self::format_time(total_seconds);
        format!("{:02}:{:02}", minutes, seconds)
    }

    fn phase_label(snapshot: &SessionSnapshot) -> String {
        match (snapshot.kind, snapshot.phase) {
            (SessionKind::Workout, Some(WorkoutPhase::Work)) => format!(
                "WORK  round {}/{}",
                snapshot.current_round.unwrap_or(1),
                snapshot.total_rounds.unwrap_or(1)
            ),
            (SessionKind::Workout, Some(WorkoutPhase::Rest)) => "REST".to_string(),
            (SessionKind::Workout, _) => "DONE".to_string(),
            (SessionKind::Meditation, _) => match snapshot.status {
                SessionStatus::Complete => "DONE".to_string(),
                _ => "MEDITATE".to_string(),
            },
        }
    }

    fn status_line(snapshot: &SessionSnapshot) -> String {
        format!(
            "  {}  {}",
            Self::clock(snapshot.remaining_seconds),
            Self::phase_label(snapshot)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Keyboard controls read from stdin while a session runs.

use crate::preset::{find_preset, PresetError};
use crate::session::{SessionCommand, SessionEvent};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    /// Forward a command to the engine
    Command(SessionCommand),
    /// Leave the program
    Quit,
    /// Show the controls again
    Help,
}

/// Parses one input line. Blank or unknown input yields `None`.
///
/// # Errors
///
/// Returns `PresetError::NotFound` for `preset <name>` with an unknown name.
pub fn parse_control(line: &str) -> Result<Option<Control>, PresetError> {
    let line = line.trim();
    if let Some(name) = line.strip_prefix("preset ") {
        let preset = find_preset(name)?;
        return Ok(Some(Control::Command(SessionCommand::SelectPreset(preset))));
    }

    let control = match line.to_ascii_lowercase().as_str() {
        "p" | "pause" => Control::Command(SessionCommand::Pause),
        "r" | "resume" => Control::Command(SessionCommand::Resume),
        "s" | "start" => Control::Command(SessionCommand::Start),
        "x" | "reset" => Control::Command(SessionCommand::Reset),
        "v" | "voice" => Control::Command(SessionCommand::ToggleVoiceMute),
        "m" | "music" => Control::Command(SessionCommand::ToggleMusicMute),
        "y" | "yes" => Control::Command(SessionCommand::ConfirmChange),
        "n" | "no" => Control::Command(SessionCommand::CancelChange),
        "q" | "quit" => Control::Quit,
        "h" | "?" | "help" => Control::Help,
        _ => return Ok(None),
    };
    Ok(Some(control))
}

/// Decides when the interactive loop ends.
///
/// A finished or reset session keeps the loop alive while stdin can still
/// start it again. Once stdin is closed there is nothing left to wait for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopState {
    stdin_closed: bool,
    settled: bool,
}

impl LoopState {
    /// Records an engine event. Returns true when the loop should end.
    pub fn on_event(&mut self, event: &SessionEvent) -> bool {
        match event {
            SessionEvent::Completed(_) | SessionEvent::Reset(_) => self.settled = true,
            SessionEvent::CountdownTick { .. } | SessionEvent::PhaseChanged(_) => {
                self.settled = false;
            }
            _ => {}
        }
        self.settled && self.stdin_closed
    }

    /// Records the end of input. Returns true when the loop should end.
    pub fn on_stdin_closed(&mut self) -> bool {
        self.stdin_closed = true;
        self.settled
    }

    #[must_use]
    pub fn stdin_open(&self) -> bool {
        !self.stdin_closed
    }
}

//! CLI module for tiktik.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `controls`: Keyboard controls read while a session runs
//! - `display`: Output formatting and display logic

pub mod commands;
pub mod controls;
pub mod display;

pub use commands::{AudioArgs, Cli, Commands, MeditateArgs, WorkoutArgs};
pub use controls::{parse_control, Control, LoopState};
pub use display::Display;

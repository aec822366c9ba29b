//! Session engine: the countdown, its cue gating and the command/event channel.

mod cues;
mod engine;

pub use cues::{guided_prompt, plan_for, GuidedPrompt, GUIDED_PROMPTS};
pub use engine::{EngineOptions, SessionCommand, SessionEngine, SessionEvent};

//! Preset error types.

use thiserror::Error;

/// Errors raised while looking up or applying presets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PresetError {
    /// No preset with the given name exists in the catalog.
    #[error("unknown preset '{0}' (run `tiktik presets` to list them)")]
    NotFound(String),

    /// The preset holds an unusable configuration.
    #[error("invalid preset '{name}': {reason}")]
    Invalid { name: String, reason: String },

    /// Confirm was requested but no change is waiting.
    #[error("no preset change is waiting for confirmation")]
    NothingStaged,
}

//! Active preset and the confirm-before-reset protocol.

use tracing::{debug, info};

use super::custom::custom_from;
use super::{Preset, PresetError};

/// Result of selecting a preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// No session was in progress; the preset is now active.
    Applied,
    /// The preset is already active; nothing changed.
    Unchanged,
    /// A session is in progress; the preset is staged until confirmed.
    ConfirmationRequired,
}

/// Holds the active preset and mediates changes to it.
#[derive(Debug, Clone)]
pub struct SessionConfigurator {
    active: Preset,
    staged: Option<Preset>,
}

impl SessionConfigurator {
    /// Creates a configurator with `preset` active.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::Invalid` if the preset fails validation.
    pub fn new(preset: Preset) -> Result<Self, PresetError> {
        preset.validate()?;
        Ok(Self {
            active: preset,
            staged: None,
        })
    }

    /// The preset in effect.
    pub fn active(&self) -> &Preset {
        &self.active
    }

    /// The preset waiting for confirmation, if any.
    pub fn staged(&self) -> Option<&Preset> {
        self.staged.as_ref()
    }

    pub fn has_staged(&self) -> bool {
        self.staged.is_some()
    }

    /// Selects a preset.
    ///
    /// Selecting the active preset again is a no-op. Otherwise the preset is
    /// applied at once when no session is in progress, and staged for
    /// confirmation when one is.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::Invalid` if the preset fails validation.
    pub fn select(
        &mut self,
        preset: Preset,
        session_active: bool,
    ) -> Result<SelectOutcome, PresetError> {
        preset.validate()?;

        // Catalog presets are immutable, so only "Custom" can share a name
        // with different settings.
        if preset == self.active {
            debug!("Preset '{}' already active", preset.name);
            self.staged = None;
            return Ok(SelectOutcome::Unchanged);
        }

        if session_active {
            info!("Preset '{}' staged until confirmed", preset.name);
            self.staged = Some(preset);
            return Ok(SelectOutcome::ConfirmationRequired);
        }

        info!("Preset '{}' applied", preset.name);
        self.active = preset;
        self.staged = None;
        Ok(SelectOutcome::Applied)
    }

    /// Makes the staged preset active and returns it.
    ///
    /// # Errors
    ///
    /// Returns `PresetError::NothingStaged` if no change is waiting.
    pub fn confirm(&mut self) -> Result<&Preset, PresetError> {
        let preset = self.staged.take().ok_or(PresetError::NothingStaged)?;
        info!("Preset '{}' confirmed", preset.name);
        self.active = preset;
        Ok(&self.active)
    }

    /// Discards the staged preset.
    pub fn cancel(&mut self) -> Option<Preset> {
        let staged = self.staged.take();
        if let Some(preset) = &staged {
            debug!("Preset change to '{}' cancelled", preset.name);
        }
        staged
    }

    /// A "Custom" preset holding the active settings.
    pub fn custom_from_active(&self) -> Preset {
        custom_from(&self.active)
    }
}

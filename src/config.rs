//! Application configuration.
//!
//! Settings are read from a JSON file, either the path given with `--config`
//! or `<config dir>/tiktik/config.json`. A missing file means defaults; every
//! field is optional.
//!
//! ```json
//! {
//!   "asset_root": "public/audio",
//!   "volume": 0.7,
//!   "pre_countdown_seconds": 3,
//!   "voice_muted": false,
//!   "music_muted": false,
//!   "workout_music": true,
//!   "music_tracks": ["workout_music1", "workout_music2", "workout_music3"]
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::sound::AudioSettings;

/// Errors raised while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid configuration JSON.
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

fn default_asset_root() -> PathBuf {
    PathBuf::from("public/audio")
}

fn default_volume() -> f32 {
    0.7
}

fn default_pre_countdown_seconds() -> u32 {
    3
}

fn default_workout_music() -> bool {
    true
}

fn default_music_tracks() -> Vec<String> {
    (1..=3).map(|n| format!("workout_music{}", n)).collect()
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Root directory of the audio assets.
    #[serde(default = "default_asset_root")]
    pub asset_root: PathBuf,

    /// Master volume (0.0 - 1.0). Out-of-range values are clamped.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Length of the 3-2-1 pre-countdown. 0 disables it.
    #[serde(default = "default_pre_countdown_seconds")]
    pub pre_countdown_seconds: u32,

    /// Start with voice cues muted.
    #[serde(default)]
    pub voice_muted: bool,

    /// Start with background audio muted.
    #[serde(default)]
    pub music_muted: bool,

    /// Play the music queue during workouts.
    #[serde(default = "default_workout_music")]
    pub workout_music: bool,

    /// Workout music pool, as asset names under `workout/music`.
    #[serde(default = "default_music_tracks")]
    pub music_tracks: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            asset_root: default_asset_root(),
            volume: default_volume(),
            pre_countdown_seconds: default_pre_countdown_seconds(),
            voice_muted: false,
            music_muted: false,
            workout_music: default_workout_music(),
            music_tracks: default_music_tracks(),
        }
    }
}

impl AppConfig {
    /// Default location of the config file, if a config directory exists.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tiktik").join("config.json"))
    }

    /// Loads the configuration from `path`, or from the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    /// Loads the configuration from a file. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config.normalized())
    }

    /// Clamps values into their valid ranges.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.volume = if self.volume.is_finite() {
            self.volume.clamp(0.0, 1.0)
        } else {
            default_volume()
        };
        self
    }

    /// Audio settings for building the audio subsystem.
    pub fn audio_settings(&self) -> AudioSettings {
        AudioSettings {
            volume: self.volume,
            voice_muted: self.voice_muted,
            music_muted: self.music_muted,
            music_tracks: self.music_tracks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.asset_root, PathBuf::from("public/audio"));
        assert_eq!(config.volume, 0.7);
        assert_eq!(config.pre_countdown_seconds, 3);
        assert!(!config.voice_muted);
        assert!(!config.music_muted);
        assert!(config.workout_music);
        assert_eq!(config.music_tracks.len(), 3);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"pre_countdown_seconds": 0, "voice_muted": true}}"#).unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();

        assert_eq!(config.pre_countdown_seconds, 0);
        assert!(config.voice_muted);
        assert_eq!(config.volume, 0.7);
        assert_eq!(config.asset_root, PathBuf::from("public/audio"));
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"volume": 4.5}}"#).unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.volume, 1.0);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("invalid config file"));
    }

    #[test]
    fn test_audio_settings() {
        let config = AppConfig {
            volume: 0.5,
            music_muted: true,
            ..AppConfig::default()
        };
        let settings = config.audio_settings();
        assert_eq!(settings.volume, 0.5);
        assert!(settings.music_muted);
        assert!(!settings.voice_muted);
    }

    #[test]
    fn test_default_path_file_name() {
        if let Some(path) = AppConfig::default_path() {
            assert!(path.ends_with("tiktik/config.json"));
        }
    }
}

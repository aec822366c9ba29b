//! Audio asset lookup.
//!
//! Assets live on disk by convention under `{root}/{category dir}/{name}.mp3`.
//! Resolution never touches the filesystem; a missing file is reported by the
//! player when playback is attempted.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Extension of every bundled asset.
const ASSET_EXTENSION: &str = "mp3";

/// Asset category, which fixes the directory, mute policy and wait bound of a cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetCategory {
    /// Start/rest/round/completion/midway chimes
    Chimes,
    /// Spoken workout cues ("start", "rest", "round-3", ...)
    WorkoutCore,
    /// Spoken encouragement during a workout
    WorkoutMotivational,
    /// Background workout music
    WorkoutMusic,
    /// Spoken guided-meditation prompts
    MeditationPrompts,
    /// Spoken meditation begin/end cues
    MeditationCues,
    /// Looping meditation ambience
    MeditationAmbient,
}

impl AssetCategory {
    /// Directory of the category, relative to the asset root.
    pub fn dir(&self) -> &'static str {
        match self {
            AssetCategory::Chimes => "chimes",
            AssetCategory::WorkoutCore => "workout/core",
            AssetCategory::WorkoutMotivational => "workout/motivational",
            AssetCategory::WorkoutMusic => "workout/music",
            AssetCategory::MeditationPrompts => "meditation/prompts",
            AssetCategory::MeditationCues => "meditation/cues",
            AssetCategory::MeditationAmbient => "meditation/ambient",
        }
    }

    /// Upper bound on how long `play_and_wait` blocks for a cue of this category.
    pub fn fallback_timeout(&self) -> Duration {
        match self {
            AssetCategory::Chimes => Duration::from_millis(2000),
            AssetCategory::MeditationPrompts | AssetCategory::MeditationCues => {
                Duration::from_millis(4000)
            }
            _ => Duration::from_millis(3000),
        }
    }

    /// Chimes always play; everything else is a voice clip and obeys the voice mute.
    pub fn is_unmutable(&self) -> bool {
        matches!(self, AssetCategory::Chimes)
    }
}

/// A named short clip in a category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioCue {
    pub category: AssetCategory,
    pub name: String,
}

impl AudioCue {
    /// Creates a cue in the given category.
    pub fn new(category: AssetCategory, name: impl Into<String>) -> Self {
        Self {
            category,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn chime(name: impl Into<String>) -> Self {
        Self::new(AssetCategory::Chimes, name)
    }

    #[must_use]
    pub fn workout(name: impl Into<String>) -> Self {
        Self::new(AssetCategory::WorkoutCore, name)
    }

    #[must_use]
    pub fn motivational(name: impl Into<String>) -> Self {
        Self::new(AssetCategory::WorkoutMotivational, name)
    }

    #[must_use]
    pub fn prompt(name: impl Into<String>) -> Self {
        Self::new(AssetCategory::MeditationPrompts, name)
    }

    #[must_use]
    pub fn meditation(name: impl Into<String>) -> Self {
        Self::new(AssetCategory::MeditationCues, name)
    }

    /// Returns true if this cue ignores the voice mute.
    pub fn is_unmutable(&self) -> bool {
        self.category.is_unmutable()
    }
}

/// A resolved asset: the cue identity plus the file it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundSource {
    /// The asset name (e.g., "start-chime")
    pub name: String,
    /// The asset category
    pub category: AssetCategory,
    /// Full path of the audio file
    pub path: PathBuf,
}

impl SoundSource {
    /// Returns true if the file exists on disk.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Resolves cue names to files under an asset root.
#[derive(Debug, Clone)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    /// Creates a library rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the asset root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `name` in `category` to `{root}/{dir}/{name}.mp3`.
    pub fn resolve(&self, category: AssetCategory, name: &str) -> SoundSource {
        let path = self
            .root
            .join(category.dir())
            .join(format!("{}.{}", name, ASSET_EXTENSION));
        SoundSource {
            name: name.to_string(),
            category,
            path,
        }
    }

    /// Resolves a cue.
    pub fn cue(&self, cue: &AudioCue) -> SoundSource {
        self.resolve(cue.category, &cue.name)
    }
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::new("public/audio")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_follows_convention() {
        let library = AssetLibrary::new("/srv/audio");
        let source = library.resolve(AssetCategory::MeditationPrompts, "take-deep-breath");

        assert_eq!(
            source.path,
            PathBuf::from("/srv/audio/meditation/prompts/take-deep-breath.mp3")
        );
        assert_eq!(source.name, "take-deep-breath");
        assert_eq!(source.category, AssetCategory::MeditationPrompts);
    }

    #[test]
    fn test_resolve_every_category() {
        let library = AssetLibrary::default();
        let dirs = [
            (AssetCategory::Chimes, "public/audio/chimes/x.mp3"),
            (AssetCategory::WorkoutCore, "public/audio/workout/core/x.mp3"),
            (
                AssetCategory::WorkoutMotivational,
                "public/audio/workout/motivational/x.mp3",
            ),
            (AssetCategory::WorkoutMusic, "public/audio/workout/music/x.mp3"),
            (AssetCategory::MeditationCues, "public/audio/meditation/cues/x.mp3"),
            (
                AssetCategory::MeditationAmbient,
                "public/audio/meditation/ambient/x.mp3",
            ),
        ];
        for (category, expected) in dirs {
            assert_eq!(library.resolve(category, "x").path, PathBuf::from(expected));
        }
    }

    #[test]
    fn test_missing_asset_resolves_but_does_not_exist() {
        let library = AssetLibrary::new("/nonexistent/root");
        let source = library.cue(&AudioCue::chime("start-chime"));
        assert!(!source.exists());
    }

    #[test]
    fn test_only_chimes_are_unmutable() {
        assert!(AudioCue::chime("rest-chime").is_unmutable());
        assert!(!AudioCue::workout("rest").is_unmutable());
        assert!(!AudioCue::motivational("keep-going").is_unmutable());
        assert!(!AudioCue::prompt("let-go-tension").is_unmutable());
        assert!(!AudioCue::meditation("meditation-complete").is_unmutable());
    }

    #[test]
    fn test_fallback_timeouts() {
        assert_eq!(AssetCategory::Chimes.fallback_timeout(), Duration::from_secs(2));
        assert_eq!(AssetCategory::WorkoutCore.fallback_timeout(), Duration::from_secs(3));
        assert_eq!(
            AssetCategory::MeditationCues.fallback_timeout(),
            Duration::from_secs(4)
        );
        assert_eq!(
            AssetCategory::MeditationPrompts.fallback_timeout(),
            Duration::from_secs(4)
        );
    }
}

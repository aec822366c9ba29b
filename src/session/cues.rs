//! Which cues play at each boundary.

use crate::sound::AudioCue;
use crate::types::{Boundary, SessionState};

/// Highest round with its own spoken announcement.
const ANNOUNCED_ROUNDS: u32 = 8;

/// A guided-meditation prompt: the asset key and the line shown with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidedPrompt {
    pub key: &'static str,
    pub text: &'static str,
}

/// Prompts in playback order. Long sessions use all eight.
pub const GUIDED_PROMPTS: [GuidedPrompt; 8] = [
    GuidedPrompt {
        key: "take-deep-breath",
        text: "Take a deep breath in... and out.",
    },
    GuidedPrompt {
        key: "return-focus-breath",
        text: "Return your focus to your breath.",
    },
    GuidedPrompt {
        key: "relax-jaw-shoulders",
        text: "Relax your jaw and shoulders.",
    },
    GuidedPrompt {
        key: "doing-well-stay-present",
        text: "You're doing well. Stay present.",
    },
    GuidedPrompt {
        key: "let-go-tension",
        text: "Let go of any tension in your body.",
    },
    GuidedPrompt {
        key: "focus-breathing-rhythm",
        text: "Focus on the rhythm of your breathing.",
    },
    GuidedPrompt {
        key: "thoughts-pass-clouds",
        text: "Allow thoughts to pass like clouds.",
    },
    GuidedPrompt {
        key: "feel-peace-within",
        text: "Feel the peace within you.",
    },
];

/// The prompt for a schedule slot.
pub fn guided_prompt(index: usize) -> GuidedPrompt {
    GUIDED_PROMPTS[index % GUIDED_PROMPTS.len()]
}

/// Chime played once at the middle of a guided meditation.
pub fn midway_cue() -> AudioCue {
    AudioCue::chime("midway-chime")
}

/// Encouragement played once halfway through a workout.
pub fn halfway_cue() -> AudioCue {
    AudioCue::motivational("halfway-there")
}

/// Cues that gate `boundary`, played one after the other.
pub fn plan_for(state: &SessionState, boundary: Boundary) -> Vec<AudioCue> {
    match state {
        SessionState::Workout(workout) => match boundary {
            Boundary::SessionStart => vec![AudioCue::chime("start-chime"), AudioCue::workout("start")],
            Boundary::WorkEnded { .. } => {
                vec![AudioCue::chime("rest-chime"), AudioCue::workout("rest")]
            }
            Boundary::RestEnded { next_round } => {
                let mut plan = vec![AudioCue::chime("round-chime")];
                if next_round == workout.config.rounds {
                    plan.push(AudioCue::workout("final-round"));
                } else if next_round <= ANNOUNCED_ROUNDS {
                    plan.push(AudioCue::workout(format!("round-{}", next_round)));
                }
                plan
            }
            Boundary::SessionEnded => vec![
                AudioCue::chime("completion-chime"),
                AudioCue::workout("workout-complete"),
            ],
        },
        SessionState::Meditation(_) => match boundary {
            Boundary::SessionStart => vec![
                AudioCue::chime("meditation-start-chime"),
                AudioCue::meditation("meditation-beginning"),
            ],
            Boundary::SessionEnded => vec![
                AudioCue::chime("meditation-end-chime"),
                AudioCue::meditation("meditation-complete"),
            ],
            Boundary::WorkEnded { .. } | Boundary::RestEnded { .. } => Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::AssetCategory;
    use crate::types::{MeditationConfig, MeditationState, WorkoutConfig, WorkoutState};

    fn workout(rounds: u32) -> SessionState {
        SessionState::Workout(WorkoutState::new(WorkoutConfig::new(20, 10, rounds)))
    }

    fn names(plan: &[AudioCue]) -> Vec<&str> {
        plan.iter().map(|cue| cue.name.as_str()).collect()
    }

    #[test]
    fn test_every_plan_opens_with_a_chime() {
        let state = workout(8);
        for boundary in [
            Boundary::SessionStart,
            Boundary::WorkEnded { round: 1 },
            Boundary::RestEnded { next_round: 2 },
            Boundary::SessionEnded,
        ] {
            let plan = plan_for(&state, boundary);
            assert_eq!(plan[0].category, AssetCategory::Chimes);
        }
    }

    #[test]
    fn test_round_announcements() {
        let state = workout(8);
        assert_eq!(
            names(&plan_for(&state, Boundary::RestEnded { next_round: 3 })),
            vec!["round-chime", "round-3"]
        );
        assert_eq!(
            names(&plan_for(&state, Boundary::RestEnded { next_round: 8 })),
            vec!["round-chime", "final-round"]
        );
    }

    #[test]
    fn test_rounds_past_eight_get_only_the_chime() {
        let state = workout(12);
        assert_eq!(
            names(&plan_for(&state, Boundary::RestEnded { next_round: 9 })),
            vec!["round-chime"]
        );
        assert_eq!(
            names(&plan_for(&state, Boundary::RestEnded { next_round: 12 })),
            vec!["round-chime", "final-round"]
        );
    }

    #[test]
    fn test_meditation_plans() {
        let state = SessionState::Meditation(MeditationState::new(MeditationConfig::default()));
        assert_eq!(
            names(&plan_for(&state, Boundary::SessionStart)),
            vec!["meditation-start-chime", "meditation-beginning"]
        );
        assert_eq!(
            names(&plan_for(&state, Boundary::SessionEnded)),
            vec!["meditation-end-chime", "meditation-complete"]
        );
        assert!(plan_for(&state, Boundary::WorkEnded { round: 1 }).is_empty());
    }

    #[test]
    fn test_guided_prompts() {
        assert_eq!(guided_prompt(0).key, "take-deep-breath");
        assert_eq!(guided_prompt(7).text, "Feel the peace within you.");
        assert_eq!(guided_prompt(8), guided_prompt(0));
    }
}

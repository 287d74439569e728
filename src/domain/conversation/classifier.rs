//! Input classifier.
//!
//! Pure function mapping `(current state, raw user text)` to an [`Event`]
//! using length thresholds and keyword matching. No I/O, no side effects.
//!
//! Yes/no detection is substring-based on the normalized text, so "vielleicht
//! ja aber..." classifies as yes. That matches the observable behaviour of
//! the conversation script and is kept on purpose.

use once_cell::sync::Lazy;

use super::{ConversationState, Event};

/// Keywords that restart the conversation from any state.
pub static RESTART_KEYWORDS: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["neu", "restart", "von vorne"]);

/// Minimum length for a usable behaviour description.
pub const MIN_SYMPTOM_LEN: usize = 10;

/// Minimum length for usable contextual detail.
pub const MIN_CONTEXT_LEN: usize = 5;

/// Classifies raw user text against the session's current state.
///
/// Precedence: the global restart override wins over every per-state rule.
/// `Event::Invalid` means "no legal event"; the flow engine will find no
/// transition and the caller re-prompts without changing state.
pub fn classify(state: ConversationState, raw_text: &str) -> Event {
    let normalized = raw_text.trim().to_lowercase();

    if RESTART_KEYWORDS.iter().any(|kw| normalized == *kw) {
        return Event::RestartCommand;
    }

    match state {
        ConversationState::Greeting => Event::Start,
        ConversationState::AwaitingSymptom => {
            if normalized.chars().count() >= MIN_SYMPTOM_LEN {
                Event::SymptomReceived
            } else {
                Event::Invalid
            }
        }
        ConversationState::AwaitingConfirmation => {
            match yes_no(&normalized) {
                Some(true) => Event::ConfirmYes,
                Some(false) => Event::ConfirmNo,
                None => Event::Invalid,
            }
        }
        ConversationState::AwaitingContext => {
            if normalized.chars().count() >= MIN_CONTEXT_LEN {
                Event::ContextProvided
            } else {
                Event::Invalid
            }
        }
        ConversationState::AwaitingExerciseChoice => {
            match yes_no(&normalized) {
                Some(true) => Event::ExerciseYes,
                Some(false) => Event::ExerciseNo,
                None => Event::Invalid,
            }
        }
        ConversationState::EndOrRestart => {
            match yes_no(&normalized) {
                Some(true) => Event::RestartYes,
                Some(false) => Event::RestartNo,
                None => Event::Invalid,
            }
        }
        // Feedback answers are accepted verbatim; non-empty enforcement
        // lives in the handler, not here.
        ConversationState::Feedback1
        | ConversationState::Feedback2
        | ConversationState::Feedback3
        | ConversationState::Feedback4
        | ConversationState::Feedback5 => Event::FeedbackProvided,
    }
}

/// Substring-based yes/no detection. "ja" wins when both appear.
fn yes_no(normalized: &str) -> Option<bool> {
    if normalized.contains("ja") {
        Some(true)
    } else if normalized.contains("nein") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn restart_keywords_win_in_every_state() {
        for state in ConversationState::all() {
            for kw in RESTART_KEYWORDS.iter() {
                assert_eq!(
                    classify(state, kw),
                    Event::RestartCommand,
                    "state {:?}, keyword {:?}",
                    state,
                    kw
                );
            }
        }
    }

    #[test]
    fn restart_keywords_match_after_normalization() {
        assert_eq!(
            classify(ConversationState::AwaitingSymptom, "  NEU  "),
            Event::RestartCommand
        );
        assert_eq!(
            classify(ConversationState::Feedback3, "Von Vorne"),
            Event::RestartCommand
        );
    }

    #[test]
    fn short_symptom_is_invalid() {
        assert_eq!(
            classify(ConversationState::AwaitingSymptom, "bellt"),
            Event::Invalid
        );
    }

    #[test]
    fn long_symptom_is_received() {
        assert_eq!(
            classify(
                ConversationState::AwaitingSymptom,
                "Mein Hund bellt wenn es klingelt"
            ),
            Event::SymptomReceived
        );
    }

    #[test]
    fn confirmation_substring_matching_is_preserved() {
        assert_eq!(
            classify(ConversationState::AwaitingConfirmation, "vielleicht ja aber..."),
            Event::ConfirmYes
        );
        assert_eq!(
            classify(ConversationState::AwaitingConfirmation, "eher nein"),
            Event::ConfirmNo
        );
        assert_eq!(
            classify(ConversationState::AwaitingConfirmation, "weiss nicht"),
            Event::Invalid
        );
    }

    #[test]
    fn context_length_threshold_is_five() {
        assert_eq!(
            classify(ConversationState::AwaitingContext, "kurz"),
            Event::Invalid
        );
        assert_eq!(
            classify(ConversationState::AwaitingContext, "bei Besuch"),
            Event::ContextProvided
        );
    }

    #[test]
    fn exercise_choice_maps_yes_no() {
        assert_eq!(
            classify(ConversationState::AwaitingExerciseChoice, "ja gerne"),
            Event::ExerciseYes
        );
        assert_eq!(
            classify(ConversationState::AwaitingExerciseChoice, "nein danke"),
            Event::ExerciseNo
        );
    }

    #[test]
    fn end_or_restart_maps_yes_no() {
        assert_eq!(
            classify(ConversationState::EndOrRestart, "ja"),
            Event::RestartYes
        );
        assert_eq!(
            classify(ConversationState::EndOrRestart, "nein"),
            Event::RestartNo
        );
        assert_eq!(
            classify(ConversationState::EndOrRestart, "ok"),
            Event::Invalid
        );
    }

    #[test]
    fn feedback_states_accept_anything() {
        for state in [
            ConversationState::Feedback1,
            ConversationState::Feedback2,
            ConversationState::Feedback3,
            ConversationState::Feedback4,
            ConversationState::Feedback5,
        ] {
            assert_eq!(classify(state, "irgendwas"), Event::FeedbackProvided);
        }
    }

    proptest! {
        #[test]
        fn any_short_symptom_text_is_invalid(text in ".{0,9}") {
            let normalized = text.trim().to_lowercase();
            prop_assume!(!RESTART_KEYWORDS.iter().any(|kw| normalized == *kw));
            prop_assert_eq!(
                classify(ConversationState::AwaitingSymptom, &text),
                Event::Invalid
            );
        }

        #[test]
        fn classification_is_deterministic(text in ".*") {
            for state in ConversationState::all() {
                prop_assert_eq!(classify(state, &text), classify(state, &text));
            }
        }
    }
}

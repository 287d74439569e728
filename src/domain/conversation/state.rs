//! Conversation states.
//!
//! A session is always in exactly one of these states; there is no null or
//! freeform state. The machine is cyclic by design: `Feedback5` leads back
//! to `Greeting`, one conversation topic at a time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a session in the fixed conversation script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    Greeting,
    AwaitingSymptom,
    AwaitingConfirmation,
    AwaitingContext,
    AwaitingExerciseChoice,
    EndOrRestart,
    Feedback1,
    Feedback2,
    Feedback3,
    Feedback4,
    Feedback5,
}

impl ConversationState {
    /// All states, in script order. Useful for exhaustive table checks.
    pub fn all() -> [ConversationState; 11] {
        use ConversationState::*;
        [
            Greeting,
            AwaitingSymptom,
            AwaitingConfirmation,
            AwaitingContext,
            AwaitingExerciseChoice,
            EndOrRestart,
            Feedback1,
            Feedback2,
            Feedback3,
            Feedback4,
            Feedback5,
        ]
    }

    /// Returns true for any of the five feedback questionnaire states.
    pub fn is_feedback(&self) -> bool {
        self.feedback_index().is_some()
    }

    /// Zero-based questionnaire index for feedback states.
    pub fn feedback_index(&self) -> Option<usize> {
        use ConversationState::*;
        match self {
            Feedback1 => Some(0),
            Feedback2 => Some(1),
            Feedback3 => Some(2),
            Feedback4 => Some(3),
            Feedback5 => Some(4),
            _ => None,
        }
    }

    /// The state that follows a feedback state in the questionnaire.
    /// `Feedback5` wraps around to `Greeting`.
    pub fn next_feedback_state(&self) -> Option<ConversationState> {
        use ConversationState::*;
        match self {
            Feedback1 => Some(Feedback2),
            Feedback2 => Some(Feedback3),
            Feedback3 => Some(Feedback4),
            Feedback4 => Some(Feedback5),
            Feedback5 => Some(Greeting),
            _ => None,
        }
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationState::Greeting => "greeting",
            ConversationState::AwaitingSymptom => "awaiting_symptom",
            ConversationState::AwaitingConfirmation => "awaiting_confirmation",
            ConversationState::AwaitingContext => "awaiting_context",
            ConversationState::AwaitingExerciseChoice => "awaiting_exercise_choice",
            ConversationState::EndOrRestart => "end_or_restart",
            ConversationState::Feedback1 => "feedback_1",
            ConversationState::Feedback2 => "feedback_2",
            ConversationState::Feedback3 => "feedback_3",
            ConversationState::Feedback4 => "feedback_4",
            ConversationState::Feedback5 => "feedback_5",
        };
        write!(f, "{}", s)
    }
}

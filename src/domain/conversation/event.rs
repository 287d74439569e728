//! Events derived from user input.
//!
//! Events drive state transitions and are never stored; each inbound message
//! is classified fresh against the session's current state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Symbolic trigger derived from `(current state, raw user text)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// Bootstrap trigger for the very first contact of a session.
    Start,
    /// A behaviour description long enough to work with.
    SymptomReceived,
    ConfirmYes,
    ConfirmNo,
    ContextProvided,
    ExerciseYes,
    ExerciseNo,
    RestartYes,
    RestartNo,
    /// A feedback answer, accepted verbatim.
    FeedbackProvided,
    /// Global restart escape hatch, legal from any state.
    RestartCommand,
    /// No legal event could be derived; the caller must re-prompt.
    Invalid,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Event::Start => "start",
            Event::SymptomReceived => "symptom_received",
            Event::ConfirmYes => "confirm_yes",
            Event::ConfirmNo => "confirm_no",
            Event::ContextProvided => "context_provided",
            Event::ExerciseYes => "exercise_yes",
            Event::ExerciseNo => "exercise_no",
            Event::RestartYes => "restart_yes",
            Event::RestartNo => "restart_no",
            Event::FeedbackProvided => "feedback_provided",
            Event::RestartCommand => "restart_command",
            Event::Invalid => "invalid",
        };
        write!(f, "{}", s)
    }
}

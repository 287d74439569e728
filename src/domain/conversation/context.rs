//! Per-call request context.
//!
//! Constructed fresh for each incoming message and discarded after the
//! response is produced; only fields that handlers fold into the persisted
//! session survive the call.

use std::collections::HashMap;

use crate::domain::foundation::SessionId;

/// Everything a guard or handler may inspect while processing one message.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub session_id: SessionId,
    /// Raw user text as received.
    pub raw_text: String,
    /// The behaviour description currently under discussion, if any.
    pub active_symptom: Option<String>,
    /// Free-form context supplied in the context-gathering step.
    pub context_text: Option<String>,
    /// Feedback answers accumulated so far in this questionnaire run.
    pub feedback_answers: Vec<String>,
    /// Whether the flow engine found a legal transition for this message.
    /// Handlers use this to re-prompt without moving.
    pub transition_allowed: bool,
    /// Handler-to-handler scratch data, e.g. the last retrieval distance.
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Builds a context for one inbound message.
    pub fn new(session_id: SessionId, raw_text: impl Into<String>) -> Self {
        Self {
            session_id,
            raw_text: raw_text.into(),
            active_symptom: None,
            context_text: None,
            feedback_answers: Vec::new(),
            transition_allowed: false,
            metadata: HashMap::new(),
        }
    }

    /// Sets the active symptom carried over from the session.
    pub fn with_active_symptom(mut self, symptom: Option<String>) -> Self {
        self.active_symptom = symptom;
        self
    }

    /// Sets the accumulated feedback answers carried over from the session.
    pub fn with_feedback_answers(mut self, answers: Vec<String>) -> Self {
        self.feedback_answers = answers;
        self
    }

    /// Records a metadata entry.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Trimmed view of the raw text.
    pub fn trimmed_text(&self) -> &str {
        self.raw_text.trim()
    }
}

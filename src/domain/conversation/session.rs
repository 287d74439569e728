//! Durable per-conversation session record.
//!
//! Created on first contact, mutated exactly once per processed message,
//! never deleted automatically. Owned exclusively by the session store;
//! handlers only ever see a reference for the duration of one call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionId;

use super::{ConversationState, OutboundMessage, Sender};

/// Number of questions in the feedback questionnaire.
pub const FEEDBACK_SLOTS: usize = 5;

/// One continuous conversation, persisted across messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub state: ConversationState,
    /// The behaviour description currently under discussion.
    pub active_symptom: Option<String>,
    /// Ordered feedback answers, filled in sequence, at most five.
    pub feedback_answers: Vec<String>,
    /// Distance of the best retrieval match for the active symptom.
    pub last_confidence: Option<f32>,
    /// Everything said in this session, inbound and outbound.
    pub transcript: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    /// Creates a fresh session in the `Greeting` state.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: SessionId::new(),
            state: ConversationState::Greeting,
            active_symptom: None,
            feedback_answers: Vec::new(),
            last_confidence: None,
            transcript: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the session to a new state.
    pub fn set_state(&mut self, state: ConversationState) {
        self.state = state;
        self.updated_at = Utc::now();
    }

    /// Stores the behaviour description under discussion.
    pub fn set_active_symptom(&mut self, symptom: impl Into<String>) {
        self.active_symptom = Some(symptom.into());
        self.updated_at = Utc::now();
    }

    /// Records the best retrieval distance for the active symptom.
    pub fn set_last_confidence(&mut self, distance: f32) {
        self.last_confidence = Some(distance);
        self.updated_at = Utc::now();
    }

    /// Appends a feedback answer. Slots beyond the questionnaire length are
    /// refused so a double-processed message cannot overfill the record.
    pub fn push_feedback_answer(&mut self, answer: impl Into<String>) -> bool {
        if self.feedback_answers.len() >= FEEDBACK_SLOTS {
            return false;
        }
        self.feedback_answers.push(answer.into());
        self.updated_at = Utc::now();
        true
    }

    /// True once all five questionnaire slots are filled.
    pub fn feedback_complete(&self) -> bool {
        self.feedback_answers.len() == FEEDBACK_SLOTS
    }

    /// Clears the per-topic fields for a new topic or a restart. The
    /// transcript survives; the session outlives its topics.
    pub fn reset_topic(&mut self) {
        self.active_symptom = None;
        self.feedback_answers.clear();
        self.last_confidence = None;
        self.updated_at = Utc::now();
    }

    /// Appends an inbound user line to the transcript.
    pub fn record_user_line(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            sender: TranscriptSender::User,
            text: text.into(),
            at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Appends outbound messages to the transcript.
    pub fn record_outbound(&mut self, messages: &[OutboundMessage]) {
        for msg in messages {
            self.transcript.push(TranscriptEntry {
                sender: match msg.sender {
                    Sender::Dog => TranscriptSender::Dog,
                    Sender::Companion => TranscriptSender::Companion,
                },
                text: msg.text.clone(),
                at: Utc::now(),
            });
        }
        self.updated_at = Utc::now();
    }

    /// Builds the completed feedback record for persistence.
    pub fn feedback_record(&self) -> FeedbackRecord {
        FeedbackRecord {
            session_id: self.id,
            answers: self.feedback_answers.clone(),
            submitted_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// One line of the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub sender: TranscriptSender,
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Who said a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptSender {
    User,
    Dog,
    Companion,
}

/// Completed questionnaire, as handed to the feedback store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub session_id: SessionId,
    pub answers: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::MessageKind;

    #[test]
    fn new_session_starts_in_greeting() {
        let session = Session::new();
        assert_eq!(session.state, ConversationState::Greeting);
        assert!(session.active_symptom.is_none());
        assert!(session.transcript.is_empty());
    }

    #[test]
    fn feedback_answers_cap_at_five() {
        let mut session = Session::new();
        for i in 0..FEEDBACK_SLOTS {
            assert!(session.push_feedback_answer(format!("antwort {}", i)));
        }
        assert!(session.feedback_complete());
        assert!(!session.push_feedback_answer("eine zu viel"));
        assert_eq!(session.feedback_answers.len(), FEEDBACK_SLOTS);
    }

    #[test]
    fn reset_topic_keeps_transcript() {
        let mut session = Session::new();
        session.record_user_line("mein hund bellt");
        session.set_active_symptom("mein hund bellt");
        session.push_feedback_answer("gut");
        session.reset_topic();

        assert!(session.active_symptom.is_none());
        assert!(session.feedback_answers.is_empty());
        assert_eq!(session.transcript.len(), 1);
    }

    #[test]
    fn transcript_records_both_directions() {
        let mut session = Session::new();
        session.record_user_line("hallo");
        session.record_outbound(&[
            OutboundMessage::dog(MessageKind::Greeting, "Wuff!"),
            OutboundMessage::companion(MessageKind::Question, "Was ist los?"),
        ]);

        assert_eq!(session.transcript.len(), 3);
        assert_eq!(session.transcript[0].sender, TranscriptSender::User);
        assert_eq!(session.transcript[1].sender, TranscriptSender::Dog);
        assert_eq!(session.transcript[2].sender, TranscriptSender::Companion);
    }

    #[test]
    fn feedback_record_carries_session_id_and_answers() {
        let mut session = Session::new();
        for i in 0..FEEDBACK_SLOTS {
            session.push_feedback_answer(format!("a{}", i));
        }
        let record = session.feedback_record();
        assert_eq!(record.session_id, session.id);
        assert_eq!(record.answers.len(), 5);
        assert_eq!(record.answers[0], "a0");
    }
}

//! Outbound messages.
//!
//! Everything the system says is an [`OutboundMessage`]: immutable once
//! constructed, ordered, zero-to-many per handler invocation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Voice a message is spoken in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The dog's inner voice, used for perspectives and diagnoses.
    Dog,
    /// The neutral coaching companion, used for questions and prompts.
    Companion,
}

/// Kind of outbound message, for downstream rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Greeting,
    Perspective,
    Diagnosis,
    Exercise,
    Question,
    Fallback,
    Thanks,
}

/// A single message produced by a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub sender: Sender,
    pub text: String,
    pub kind: MessageKind,
    /// Handler-supplied extras, e.g. the retrieval distance behind a
    /// perspective message.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl OutboundMessage {
    /// Creates a new message without metadata.
    pub fn new(sender: Sender, kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            kind,
            metadata: HashMap::new(),
        }
    }

    /// Creates a message in the dog's voice.
    pub fn dog(kind: MessageKind, text: impl Into<String>) -> Self {
        Self::new(Sender::Dog, kind, text)
    }

    /// Creates a message in the companion's voice.
    pub fn companion(kind: MessageKind, text: impl Into<String>) -> Self {
        Self::new(Sender::Companion, kind, text)
    }

    /// Attaches a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

//! Conversation state machine: states, events, classification, flow and the
//! session record the machine operates on.

mod classifier;
mod context;
mod event;
mod flow;
mod message;
mod session;
mod state;

pub use classifier::{classify, MIN_CONTEXT_LEN, MIN_SYMPTOM_LEN, RESTART_KEYWORDS};
pub use context::RequestContext;
pub use event::Event;
pub use flow::{FlowEngine, Guard, Hook, TransitionRecord};
pub use message::{MessageKind, OutboundMessage, Sender};
pub use session::{FeedbackRecord, Session, TranscriptEntry, TranscriptSender, FEEDBACK_SLOTS};
pub use state::ConversationState;

//! Application layer: per-state handlers and the conversation orchestrator.

pub mod handlers;
mod orchestrator;
pub mod prompts;

pub use orchestrator::{ConversationError, ConversationService};

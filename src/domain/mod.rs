//! Domain layer: conversation state machine and its supporting value objects.

pub mod conversation;
pub mod foundation;

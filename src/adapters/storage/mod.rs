//! Storage adapters: session registry and feedback persistence.

mod in_memory_feedback_store;
mod in_memory_session_store;
mod redis_feedback_store;

pub use in_memory_feedback_store::InMemoryFeedbackStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use redis_feedback_store::RedisFeedbackStore;

//! Adapters: concrete implementations of the ports.

pub mod ai;
pub mod search;
pub mod storage;

pub use ai::{MockGenerator, OpenAiConfig, OpenAiGenerator};
pub use search::{MockRetriever, WeaviateConfig, WeaviateRetriever};
pub use storage::{InMemoryFeedbackStore, InMemorySessionStore, RedisFeedbackStore};

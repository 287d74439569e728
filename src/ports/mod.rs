//! Ports: interfaces the conversation core consumes.
//!
//! Implementations live in `adapters`; the core only ever sees these traits.

mod feedback;
mod generation;
mod retrieval;
mod session_store;

pub use feedback::{FeedbackStore, FeedbackStoreError};
pub use generation::{CompletionRequest, Generator, GenerationError};
pub use retrieval::{Retriever, RetrievalError, SearchHit, SearchMetadata};
pub use session_store::{SessionStore, SessionStoreError};

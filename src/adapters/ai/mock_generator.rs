//! Mock Generator for testing.
//!
//! Configurable implementation of the generation port: queued responses,
//! error injection and simulated latency, plus call tracking for
//! verification.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockGenerator::new()
//!     .with_reply("Wuff! Schön, dass du da bist.")
//!     .with_failure("model down");
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{CompletionRequest, Generator, GenerationError};

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with an upstream error carrying this message.
    Failure(String),
}

/// Mock generator for testing.
///
/// Replies are consumed in order; when the queue is empty a fixed default
/// reply is returned so long conversations keep flowing in tests.
#[derive(Debug, Clone)]
pub struct MockGenerator {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl MockGenerator {
    /// Creates a new mock generator.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Text(text.into()));
        self
    }

    /// Queues an upstream failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(message.into()));
        self
    }

    /// Adds artificial latency to every call (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completed calls.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// All recorded requests, in call order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError> {
        if self.delay > Duration::ZERO {
            sleep(self.delay).await;
        }

        self.calls.lock().unwrap().push(request);

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Failure(message)) => Err(GenerationError::upstream(message)),
            None => Ok("(mock reply)".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_are_consumed_in_order() {
        let generator = MockGenerator::new().with_reply("erste").with_reply("zweite");

        let first = generator
            .complete(CompletionRequest::new("a"))
            .await
            .unwrap();
        let second = generator
            .complete(CompletionRequest::new("b"))
            .await
            .unwrap();

        assert_eq!(first, "erste");
        assert_eq!(second, "zweite");
        assert_eq!(generator.call_count(), 2);
    }

    #[tokio::test]
    async fn failure_reply_surfaces_as_upstream_error() {
        let generator = MockGenerator::new().with_failure("kaputt");

        let result = generator.complete(CompletionRequest::new("a")).await;
        assert!(matches!(result, Err(GenerationError::Upstream(_))));
    }

    #[tokio::test]
    async fn empty_queue_returns_default_reply() {
        let generator = MockGenerator::new();
        let reply = generator
            .complete(CompletionRequest::new("a"))
            .await
            .unwrap();
        assert_eq!(reply, "(mock reply)");
    }

    #[tokio::test]
    async fn calls_record_the_request() {
        let generator = MockGenerator::new().with_reply("ok");
        generator
            .complete(CompletionRequest::new("Begrüßung").with_temperature(0.2))
            .await
            .unwrap();

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].prompt, "Begrüßung");
        assert_eq!(calls[0].temperature, 0.2);
    }
}

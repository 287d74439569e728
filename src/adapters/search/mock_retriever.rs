//! Mock Retriever for testing.
//!
//! Scripted per-collection results, error injection and call tracking.

use async_trait::async_trait;
use serde_json::{json, Map};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{Retriever, RetrievalError, SearchHit};

/// A scripted outcome for one collection.
#[derive(Debug, Clone)]
pub enum MockSearchResult {
    /// Return these hits.
    Hits(Vec<SearchHit>),
    /// Fail with an upstream error carrying this message.
    Failure(String),
}

/// Mock retriever for testing.
///
/// Collections without a script return an empty hit list, which is a
/// legitimate outcome of the real service.
#[derive(Debug, Clone)]
pub struct MockRetriever {
    scripts: Arc<Mutex<HashMap<String, MockSearchResult>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockRetriever {
    /// Creates a new mock retriever.
    pub fn new() -> Self {
        Self {
            scripts: Arc::new(Mutex::new(HashMap::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Scripts hits for a collection.
    pub fn with_hits(self, collection: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(collection.into(), MockSearchResult::Hits(hits));
        self
    }

    /// Scripts a failure for a collection.
    pub fn with_failure(self, collection: impl Into<String>, message: impl Into<String>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(collection.into(), MockSearchResult::Failure(message.into()));
        self
    }

    /// Adds artificial latency to every call (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Recorded `(collection, query)` pairs, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    /// Builds a hit with a `text` property and a distance, for test setup.
    pub fn text_hit(text: &str, distance: f32) -> SearchHit {
        let mut properties = Map::new();
        properties.insert("text".to_string(), json!(text));
        SearchHit::new(properties, Some(distance))
    }

    /// Builds a hit with `text` and `instinct` properties, for test setup.
    pub fn instinct_hit(text: &str, instinct: &str, distance: f32) -> SearchHit {
        let mut properties = Map::new();
        properties.insert("text".to_string(), json!(text));
        properties.insert("instinct".to_string(), json!(instinct));
        SearchHit::new(properties, Some(distance))
    }
}

impl Default for MockRetriever {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Retriever for MockRetriever {
    async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        _want_metadata: bool,
    ) -> Result<Vec<SearchHit>, RetrievalError> {
        if self.delay > Duration::ZERO {
            sleep(self.delay).await;
        }

        self.calls
            .lock()
            .unwrap()
            .push((collection.to_string(), query.to_string()));

        let script = self.scripts.lock().unwrap().get(collection).cloned();
        match script {
            Some(MockSearchResult::Hits(hits)) => Ok(hits.into_iter().take(limit).collect()),
            Some(MockSearchResult::Failure(message)) => Err(RetrievalError::upstream(message)),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_hits_are_returned_and_limited() {
        let retriever = MockRetriever::new().with_hits(
            "Symptom",
            vec![
                MockRetriever::text_hit("a", 0.1),
                MockRetriever::text_hit("b", 0.2),
                MockRetriever::text_hit("c", 0.3),
            ],
        );

        let hits = retriever.search("Symptom", "query", 2, true).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].property_str("text"), Some("a"));
    }

    #[tokio::test]
    async fn unscripted_collection_returns_empty() {
        let retriever = MockRetriever::new();
        let hits = retriever.search("Exercise", "query", 3, true).await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn scripted_failure_surfaces_as_upstream() {
        let retriever = MockRetriever::new().with_failure("Symptom", "down");
        let result = retriever.search("Symptom", "query", 3, true).await;
        assert!(matches!(result, Err(RetrievalError::Upstream(_))));
    }

    #[tokio::test]
    async fn calls_are_recorded() {
        let retriever = MockRetriever::new();
        retriever.search("Symptom", "bellt", 3, true).await.unwrap();
        assert_eq!(
            retriever.calls(),
            vec![("Symptom".to_string(), "bellt".to_string())]
        );
    }
}

//! Retrieval port - interface to the vector-search collaborator.
//!
//! The knowledge base is organized in named collections (symptoms, instincts,
//! exercises). Only the response contract matters here; the ranking algorithm
//! itself is the collaborator's business.

use async_trait::async_trait;
use serde_json::{Map, Value};

/// Port for nearest-neighbour search over the knowledge collections.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Searches `collection` for the `limit` nearest matches to `query`.
    ///
    /// With `want_metadata` the hits carry their distance; without it the
    /// metadata block may be empty. May legitimately return an empty list.
    async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        want_metadata: bool,
    ) -> Result<Vec<SearchHit>, RetrievalError>;
}

/// One search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// The stored object's properties, schema-free.
    pub properties: Map<String, Value>,
    pub metadata: SearchMetadata,
}

impl SearchHit {
    /// Creates a hit from properties and an optional distance.
    pub fn new(properties: Map<String, Value>, distance: Option<f32>) -> Self {
        Self {
            properties,
            metadata: SearchMetadata { distance },
        }
    }

    /// Convenience accessor for a string property.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// The hit's distance, if metadata was requested.
    pub fn distance(&self) -> Option<f32> {
        self.metadata.distance
    }
}

/// Per-hit search metadata.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchMetadata {
    /// Vector distance to the query; smaller is closer.
    pub distance: Option<f32>,
}

/// Retrieval collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// The search service failed or answered with an error.
    #[error("retrieval upstream failed: {0}")]
    Upstream(String),

    /// The request did not complete within the configured bound.
    #[error("retrieval timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The response could not be parsed.
    #[error("retrieval response unparseable: {0}")]
    Parse(String),
}

impl RetrievalError {
    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

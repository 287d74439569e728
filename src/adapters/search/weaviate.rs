//! Weaviate Retriever - Implementation of the retrieval port.
//!
//! Queries a Weaviate instance via its GraphQL endpoint using `nearText`.
//! Only the response contract matters to the core: a list of hits with
//! schema-free properties and an optional distance.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

use crate::config::RetrievalConfig;
use crate::ports::{Retriever, RetrievalError, SearchHit};

/// Configuration for the Weaviate retriever.
#[derive(Debug, Clone)]
pub struct WeaviateConfig {
    /// Base URL of the Weaviate instance.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Properties to request per collection object.
    pub properties: Vec<String>,
}

impl WeaviateConfig {
    /// Creates a new configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(10),
            properties: vec!["text".to_string(), "instinct".to_string()],
        }
    }

    /// Builds the adapter configuration from the application config.
    pub fn from_app_config(config: &RetrievalConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
            properties: vec!["text".to_string(), "instinct".to_string()],
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the properties requested per object.
    pub fn with_properties(mut self, properties: Vec<String>) -> Self {
        self.properties = properties;
        self
    }
}

/// Weaviate GraphQL retrieval adapter.
pub struct WeaviateRetriever {
    config: WeaviateConfig,
    client: Client,
}

impl WeaviateRetriever {
    /// Creates a new retriever with the given configuration.
    pub fn new(config: WeaviateConfig) -> Result<Self, RetrievalError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RetrievalError::upstream(format!("client build failed: {}", e)))?;

        Ok(Self { config, client })
    }

    fn graphql_url(&self) -> String {
        format!("{}/v1/graphql", self.config.base_url)
    }

    fn build_query(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        want_metadata: bool,
    ) -> String {
        let fields = self.config.properties.join(" ");
        let additional = if want_metadata {
            " _additional { distance }"
        } else {
            ""
        };
        // GraphQL string literals need the query text escaped.
        let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
        format!(
            "{{ Get {{ {collection}(nearText: {{concepts: [\"{escaped}\"]}}, limit: {limit}) {{ {fields}{additional} }} }} }}"
        )
    }

    fn parse_hits(
        &self,
        body: Value,
        collection: &str,
    ) -> Result<Vec<SearchHit>, RetrievalError> {
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(RetrievalError::upstream(format!(
                    "graphql errors: {}",
                    serde_json::to_string(errors).unwrap_or_default()
                )));
            }
        }

        let objects = body
            .pointer(&format!("/data/Get/{}", collection))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(objects.len());
        for object in objects {
            let mut properties = match object {
                Value::Object(map) => map,
                other => {
                    return Err(RetrievalError::parse(format!(
                        "expected object hit, got {}",
                        other
                    )))
                }
            };
            let distance = properties
                .remove("_additional")
                .as_ref()
                .and_then(|a| a.pointer("/distance"))
                .and_then(Value::as_f64)
                .map(|d| d as f32);
            hits.push(SearchHit::new(properties, distance));
        }
        Ok(hits)
    }
}

#[async_trait]
impl Retriever for WeaviateRetriever {
    async fn search(
        &self,
        collection: &str,
        query: &str,
        limit: usize,
        want_metadata: bool,
    ) -> Result<Vec<SearchHit>, RetrievalError> {
        let graphql = self.build_query(collection, query, limit, want_metadata);

        let response = self
            .client
            .post(self.graphql_url())
            .json(&json!({ "query": graphql }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RetrievalError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    RetrievalError::upstream(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RetrievalError::upstream(format!(
                "status {}: {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RetrievalError::parse(e.to_string()))?;

        self.parse_hits(body, collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn retriever() -> WeaviateRetriever {
        WeaviateRetriever::new(WeaviateConfig::new("http://localhost:8080")).unwrap()
    }

    #[test]
    fn query_includes_collection_concepts_and_limit() {
        let q = retriever().build_query("Symptom", "hund bellt", 3, true);
        assert!(q.contains("Symptom(nearText"));
        assert!(q.contains("concepts: [\"hund bellt\"]"));
        assert!(q.contains("limit: 3"));
        assert!(q.contains("_additional { distance }"));
    }

    #[test]
    fn query_without_metadata_omits_additional_block() {
        let q = retriever().build_query("Symptom", "hund bellt", 3, false);
        assert!(!q.contains("_additional"));
    }

    #[test]
    fn query_escapes_quotes_in_user_text() {
        let q = retriever().build_query("Symptom", "er \"bellt\"", 1, false);
        assert!(q.contains("concepts: [\"er \\\"bellt\\\"\"]"));
    }

    #[test]
    fn parse_extracts_properties_and_distance() {
        let body = json!({
            "data": { "Get": { "Symptom": [
                { "text": "bellt bei besuch", "_additional": { "distance": 0.31 } },
                { "text": "zieht an der leine" }
            ]}}
        });

        let hits = retriever().parse_hits(body, "Symptom").unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].property_str("text"), Some("bellt bei besuch"));
        assert!((hits[0].distance().unwrap() - 0.31).abs() < 1e-6);
        assert_eq!(hits[1].distance(), None);
        assert!(hits[0].properties.get("_additional").is_none());
    }

    #[test]
    fn parse_missing_collection_yields_empty_list() {
        let body = json!({ "data": { "Get": {} } });
        let hits = retriever().parse_hits(body, "Symptom").unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn parse_graphql_errors_surface_as_upstream() {
        let body = json!({ "errors": [{ "message": "class not found" }] });
        let result = retriever().parse_hits(body, "Symptom");
        assert!(matches!(result, Err(RetrievalError::Upstream(_))));
    }
}

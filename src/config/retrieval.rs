//! Retrieval collaborator configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Vector-search configuration, including the knowledge collection names
/// and the acceptance threshold for a "good enough" symptom match.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Base URL of the search service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum distance for a symptom match to count as "good enough".
    /// A tunable with no documented derivation; kept configurable on purpose.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    /// Number of nearest matches to request per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Symptom collection name
    #[serde(default = "default_symptom_collection")]
    pub symptom_collection: String,

    /// Instinct collection name
    #[serde(default = "default_instinct_collection")]
    pub instinct_collection: String,

    /// Exercise collection name
    #[serde(default = "default_exercise_collection")]
    pub exercise_collection: String,
}

impl RetrievalConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate retrieval configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidRetrievalUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.match_threshold <= 0.0 {
            return Err(ValidationError::InvalidMatchThreshold);
        }
        if self.top_k == 0 {
            return Err(ValidationError::InvalidTopK);
        }
        Ok(())
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            match_threshold: default_match_threshold(),
            top_k: default_top_k(),
            symptom_collection: default_symptom_collection(),
            instinct_collection: default_instinct_collection(),
            exercise_collection: default_exercise_collection(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_match_threshold() -> f32 {
    0.75
}

fn default_top_k() -> usize {
    3
}

fn default_symptom_collection() -> String {
    "Symptom".to_string()
}

fn default_instinct_collection() -> String {
    "Instinct".to_string()
}

fn default_exercise_collection() -> String {
    "Exercise".to_string()
}

//! Feedback persistence configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Key-value feedback storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Save timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl FeedbackConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate feedback configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.redis_url.starts_with("redis://") && !self.redis_url.starts_with("rediss://") {
            return Err(ValidationError::InvalidRedisUrl);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_timeout() -> u64 {
    5
}

//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `LEITWOLF`
//! prefix and nested sections use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use leitwolf::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod feedback;
mod generation;
mod retrieval;

pub use error::{ConfigError, ValidationError};
pub use feedback::FeedbackConfig;
pub use generation::GenerationConfig;
pub use retrieval::RetrievalConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Language-model completion configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Vector-search configuration (collections, acceptance threshold)
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Feedback persistence configuration (Redis)
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `LEITWOLF` prefix:
    ///
    /// - `LEITWOLF__GENERATION__API_KEY=sk-...` -> `generation.api_key`
    /// - `LEITWOLF__RETRIEVAL__MATCH_THRESHOLD=0.6` -> `retrieval.match_threshold`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LEITWOLF")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.generation.validate()?;
        self.retrieval.validate()?;
        self.feedback.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("LEITWOLF__GENERATION__API_KEY", "sk-test");
    }

    fn clear_env() {
        env::remove_var("LEITWOLF__GENERATION__API_KEY");
        env::remove_var("LEITWOLF__RETRIEVAL__MATCH_THRESHOLD");
        env::remove_var("LEITWOLF__FEEDBACK__REDIS_URL");
    }

    #[test]
    fn test_load_with_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.generation.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.retrieval.match_threshold, 0.75);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LEITWOLF__RETRIEVAL__MATCH_THRESHOLD", "0.6");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.retrieval.match_threshold, 0.6);
    }

    #[test]
    fn test_redis_url_override() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("LEITWOLF__FEEDBACK__REDIS_URL", "redis://cache:6379");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.feedback.redis_url, "redis://cache:6379");
    }
}

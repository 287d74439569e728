//! Generation port - interface to the language-model completion collaborator.
//!
//! Handlers use this to produce greeting lines, perspectives and diagnoses.
//! Every failure mode collapses to a canned fallback message at the handler
//! boundary, so the error type here stays deliberately coarse.

use async_trait::async_trait;

/// Port for text completion.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generates a completion for the given request.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}

/// A single completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// The user-facing prompt.
    pub prompt: String,
    /// Optional system prompt guiding the voice of the reply.
    pub system_prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: f32,
}

impl CompletionRequest {
    /// Creates a request with the default temperature.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            temperature: 0.7,
        }
    }

    /// Sets the system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Generation collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The upstream model service failed or answered with an error.
    #[error("generation upstream failed: {0}")]
    Upstream(String),

    /// The request did not complete within the configured bound.
    #[error("generation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The response could not be parsed.
    #[error("generation response unparseable: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Creates an upstream error.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}

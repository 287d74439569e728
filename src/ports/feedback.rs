//! Feedback persistence port.
//!
//! Persistence is best-effort: a failed save is logged by the caller and
//! must never prevent the thank-you message from reaching the user.

use async_trait::async_trait;

use crate::domain::conversation::FeedbackRecord;
use crate::domain::foundation::SessionId;

/// Port for storing completed feedback questionnaires.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Saves a completed feedback record.
    ///
    /// Returns `true` when the record was durably stored.
    async fn save(
        &self,
        session_id: SessionId,
        record: &FeedbackRecord,
    ) -> Result<bool, FeedbackStoreError>;
}

/// Feedback store errors.
#[derive(Debug, thiserror::Error)]
pub enum FeedbackStoreError {
    /// The backing store failed.
    #[error("feedback store unavailable: {0}")]
    Unavailable(String),

    /// The record could not be serialized.
    #[error("feedback record unserializable: {0}")]
    Serialization(String),

    /// The save did not complete within the configured bound.
    #[error("feedback save timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl FeedbackStoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

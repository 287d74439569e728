//! Redis-backed feedback store for production deployments.
//!
//! Each completed questionnaire is stored as a JSON value under
//! `feedback:{session_id}`. Records are write-once per session topic; a
//! repeat questionnaire in the same session overwrites the previous record,
//! matching the one-topic-at-a-time conversation model.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::conversation::FeedbackRecord;
use crate::domain::foundation::SessionId;
use crate::ports::{FeedbackStore, FeedbackStoreError};

/// Redis feedback store.
#[derive(Clone)]
pub struct RedisFeedbackStore {
    conn: MultiplexedConnection,
}

impl RedisFeedbackStore {
    /// Create a new store over an established connection.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }

    /// Connect to Redis and create the store.
    pub async fn connect(url: &str) -> Result<Self, FeedbackStoreError> {
        let client = redis::Client::open(url)
            .map_err(|e| FeedbackStoreError::unavailable(e.to_string()))?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(|e| FeedbackStoreError::unavailable(e.to_string()))?;
        Ok(Self::new(conn))
    }

    fn key_for(session_id: SessionId) -> String {
        format!("feedback:{}", session_id)
    }
}

#[async_trait]
impl FeedbackStore for RedisFeedbackStore {
    async fn save(
        &self,
        session_id: SessionId,
        record: &FeedbackRecord,
    ) -> Result<bool, FeedbackStoreError> {
        let payload = serde_json::to_string(record)
            .map_err(|e| FeedbackStoreError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(Self::key_for(session_id), payload)
            .await
            .map_err(|e: redis::RedisError| FeedbackStoreError::unavailable(e.to_string()))?;

        Ok(true)
    }
}

//! In-Memory Feedback Store Adapter
//!
//! Collects feedback records in memory. Useful for testing and development;
//! supports failure injection for resilience tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::FeedbackRecord;
use crate::domain::foundation::SessionId;
use crate::ports::{FeedbackStore, FeedbackStoreError};

/// In-memory feedback sink
#[derive(Debug, Clone)]
pub struct InMemoryFeedbackStore {
    records: Arc<RwLock<HashMap<SessionId, FeedbackRecord>>>,
    fail_saves: Arc<AtomicBool>,
}

impl InMemoryFeedbackStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            fail_saves: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent save fail (for resilience tests)
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Look up a stored record
    pub async fn record_for(&self, session_id: SessionId) -> Option<FeedbackRecord> {
        self.records.read().await.get(&session_id).cloned()
    }

    /// Number of stored records
    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

impl Default for InMemoryFeedbackStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedbackStore for InMemoryFeedbackStore {
    async fn save(
        &self,
        session_id: SessionId,
        record: &FeedbackRecord,
    ) -> Result<bool, FeedbackStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(FeedbackStoreError::unavailable("injected failure"));
        }
        let mut records = self.records.write().await;
        records.insert(session_id, record.clone());
        Ok(true)
    }
}

//! Collaborators the pipeline depends on: amendment lookup and feedback storage.

use afs_core::{FeedbackRecord, StoredFeedback};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::ModerationError;

/// Answers whether an amendment exists.
#[async_trait]
pub trait AmendmentLookup: Send + Sync {
    async fn exists(&self, amendment_id: i64) -> Result<bool, ModerationError>;
}

/// Durable storage for accepted feedback.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    async fn save(&self, record: FeedbackRecord) -> Result<StoredFeedback, ModerationError>;
}

/// In-process store for tests and dry runs. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    amendments: Vec<i64>,
    feedback: Vec<StoredFeedback>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the given amendments already registered.
    #[must_use]
    pub fn with_amendments(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                amendments: ids.into_iter().collect(),
                feedback: Vec::new(),
            }),
        }
    }

    pub async fn add_amendment(&self, amendment_id: i64) {
        let mut state = self.inner.lock().await;
        if !state.amendments.contains(&amendment_id) {
            state.amendments.push(amendment_id);
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.feedback.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// All stored feedback in insertion order.
    pub async fn records(&self) -> Vec<StoredFeedback> {
        self.inner.lock().await.feedback.clone()
    }
}

#[async_trait]
impl AmendmentLookup for MemoryStore {
    async fn exists(&self, amendment_id: i64) -> Result<bool, ModerationError> {
        Ok(self.inner.lock().await.amendments.contains(&amendment_id))
    }
}

#[async_trait]
impl FeedbackStore for MemoryStore {
    async fn save(&self, record: FeedbackRecord) -> Result<StoredFeedback, ModerationError> {
        let mut state = self.inner.lock().await;
        if !state.amendments.contains(&record.amendment_id) {
            return Err(ModerationError::Store(format!(
                "amendment {} does not exist",
                record.amendment_id
            )));
        }
        let id = i64::try_from(state.feedback.len())
            .map_err(|e| ModerationError::Store(format!("id overflow: {e}")))?
            + 1;
        let stored = StoredFeedback::from_record(id, record, Utc::now());
        state.feedback.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use afs_core::SentimentLabel;

    fn record(amendment_id: i64) -> FeedbackRecord {
        FeedbackRecord {
            amendment_id,
            original_text: "Reasonable change.".to_string(),
            summary: "Reasonable change.".to_string(),
            sentiment: SentimentLabel::Positive,
            sentiment_confidence: 0.8,
        }
    }

    #[tokio::test]
    async fn assigns_sequential_ids() {
        let store = MemoryStore::with_amendments([1]);
        let first = store.save(record(1)).await.expect("save");
        let second = store.save(record(1)).await.expect("save");
        assert_eq!((first.id, second.id), (1, 2));
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn rejects_unknown_amendment() {
        let store = MemoryStore::new();
        assert!(!store.exists(3).await.expect("exists"));
        let err = store.save(record(3)).await.unwrap_err();
        assert!(matches!(err, ModerationError::Store(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn add_amendment_is_idempotent() {
        let store = MemoryStore::new();
        store.add_amendment(4).await;
        store.add_amendment(4).await;
        assert!(store.exists(4).await.expect("exists"));
    }
}

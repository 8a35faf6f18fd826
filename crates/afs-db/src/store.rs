//! Postgres-backed moderation collaborators.

use afs_core::{FeedbackRecord, StoredFeedback};
use afs_moderation::{AmendmentLookup, FeedbackStore, ModerationError};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::DbError;

/// Amendment lookup and feedback storage over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[allow(clippy::needless_pass_by_value)]
fn store_error(error: DbError) -> ModerationError {
    ModerationError::Store(error.to_string())
}

#[async_trait]
impl AmendmentLookup for PgStore {
    async fn exists(&self, amendment_id: i64) -> Result<bool, ModerationError> {
        crate::amendment_exists(&self.pool, amendment_id)
            .await
            .map_err(store_error)
    }
}

#[async_trait]
impl FeedbackStore for PgStore {
    async fn save(&self, record: FeedbackRecord) -> Result<StoredFeedback, ModerationError> {
        let row = crate::insert_feedback(&self.pool, &record)
            .await
            .map_err(store_error)?;
        row.into_stored().map_err(store_error)
    }
}

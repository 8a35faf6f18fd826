//! Database operations for the `feedback` table.
//!
//! Rows are insert-only. Aggregates are computed on read.

use afs_core::{FeedbackRecord, SentimentLabel, StoredFeedback};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `feedback` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub amendment_id: i64,
    pub original_text: String,
    pub summary: String,
    pub sentiment: String,
    pub sentiment_confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl FeedbackRow {
    /// Convert into the domain type, parsing the stored sentiment label.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::InvalidRow`] if the sentiment column holds an unknown label.
    pub fn into_stored(self) -> Result<StoredFeedback, DbError> {
        let sentiment = self
            .sentiment
            .parse::<SentimentLabel>()
            .map_err(|e| DbError::InvalidRow(format!("feedback {}: {e}", self.id)))?;

        Ok(StoredFeedback {
            id: self.id,
            amendment_id: self.amendment_id,
            original_text: self.original_text,
            summary: self.summary,
            sentiment,
            sentiment_confidence: self.sentiment_confidence,
            created_at: self.created_at,
        })
    }
}

/// Number of feedback rows carrying one sentiment label.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SentimentCountRow {
    pub sentiment: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert an analysed feedback record and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a foreign-key
/// violation when the amendment does not exist).
pub async fn insert_feedback(pool: &PgPool, record: &FeedbackRecord) -> Result<FeedbackRow, DbError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        "INSERT INTO feedback \
             (amendment_id, original_text, summary, sentiment, sentiment_confidence) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id, amendment_id, original_text, summary, sentiment, \
                   sentiment_confidence, created_at",
    )
    .bind(record.amendment_id)
    .bind(&record.original_text)
    .bind(&record.summary)
    .bind(record.sentiment.as_str())
    .bind(record.sentiment_confidence)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// List feedback for one amendment, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feedback_for_amendment(
    pool: &PgPool,
    amendment_id: i64,
    limit: i64,
) -> Result<Vec<FeedbackRow>, DbError> {
    let rows = sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, amendment_id, original_text, summary, sentiment, \
                sentiment_confidence, created_at \
         FROM feedback \
         WHERE amendment_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(amendment_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Count feedback per sentiment label for one amendment.
///
/// Labels with no feedback are absent from the result.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn sentiment_counts(
    pool: &PgPool,
    amendment_id: i64,
) -> Result<Vec<SentimentCountRow>, DbError> {
    let rows = sqlx::query_as::<_, SentimentCountRow>(
        "SELECT sentiment, COUNT(*) AS count \
         FROM feedback \
         WHERE amendment_id = $1 \
         GROUP BY sentiment \
         ORDER BY sentiment",
    )
    .bind(amendment_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Return the original text of every feedback row for one amendment.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_feedback_texts(pool: &PgPool, amendment_id: i64) -> Result<Vec<String>, DbError> {
    let texts = sqlx::query_scalar::<_, String>(
        "SELECT original_text FROM feedback WHERE amendment_id = $1 ORDER BY id",
    )
    .bind(amendment_id)
    .fetch_all(pool)
    .await?;

    Ok(texts)
}

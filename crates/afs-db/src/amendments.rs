//! Database operations for the `amendments` table.

use afs_core::NewAmendment;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `amendments` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AmendmentRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a validated amendment and return the stored row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_amendment(
    pool: &PgPool,
    amendment: &NewAmendment,
) -> Result<AmendmentRow, DbError> {
    let row = sqlx::query_as::<_, AmendmentRow>(
        "INSERT INTO amendments (title, description) \
         VALUES ($1, $2) \
         RETURNING id, title, description, created_at",
    )
    .bind(&amendment.title)
    .bind(&amendment.description)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Returns all amendments, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_amendments(pool: &PgPool) -> Result<Vec<AmendmentRow>, DbError> {
    let rows = sqlx::query_as::<_, AmendmentRow>(
        "SELECT id, title, description, created_at \
         FROM amendments \
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns a single amendment by id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_amendment(pool: &PgPool, id: i64) -> Result<Option<AmendmentRow>, DbError> {
    let row = sqlx::query_as::<_, AmendmentRow>(
        "SELECT id, title, description, created_at \
         FROM amendments \
         WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns `true` when an amendment with this id exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn amendment_exists(pool: &PgPool, id: i64) -> Result<bool, DbError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM amendments WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

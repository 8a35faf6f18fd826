//! Live integration tests for afs-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/afs-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory. Run with `cargo test -- --ignored` and `DATABASE_URL`
//! pointing at a Postgres server.

use afs_core::{FeedbackRecord, NewAmendment, SentimentLabel};
use afs_db::{
    amendment_exists, get_amendment, insert_amendment, insert_feedback, list_amendments,
    list_feedback_for_amendment, list_feedback_texts, sentiment_counts,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_test_amendment(pool: &sqlx::PgPool, title: &str) -> i64 {
    let amendment = NewAmendment {
        title: title.to_string(),
        description: format!("Description for {title}"),
    };
    insert_amendment(pool, &amendment)
        .await
        .unwrap_or_else(|e| panic!("insert_test_amendment failed for '{title}': {e}"))
        .id
}

fn record(amendment_id: i64, text: &str, sentiment: SentimentLabel) -> FeedbackRecord {
    FeedbackRecord {
        amendment_id,
        original_text: text.to_string(),
        summary: text.to_string(),
        sentiment,
        sentiment_confidence: 0.75,
    }
}

// ---------------------------------------------------------------------------
// Amendments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres database (DATABASE_URL)"]
async fn insert_and_get_amendment(pool: sqlx::PgPool) {
    let id = insert_test_amendment(&pool, "Water Rights Amendment").await;

    let row = get_amendment(&pool, id)
        .await
        .expect("query")
        .expect("amendment exists");
    assert_eq!(row.title, "Water Rights Amendment");
    assert!(amendment_exists(&pool, id).await.expect("exists query"));
    assert!(!amendment_exists(&pool, id + 1000).await.expect("exists query"));
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres database (DATABASE_URL)"]
async fn list_amendments_newest_first(pool: sqlx::PgPool) {
    let first = insert_test_amendment(&pool, "First").await;
    let second = insert_test_amendment(&pool, "Second").await;

    let rows = list_amendments(&pool).await.expect("list");
    let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second, first]);
}

// ---------------------------------------------------------------------------
// Feedback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres database (DATABASE_URL)"]
async fn insert_feedback_round_trips_fields(pool: sqlx::PgPool) {
    let amendment_id = insert_test_amendment(&pool, "Transit Levy").await;

    let row = insert_feedback(
        &pool,
        &record(amendment_id, "Helpful and clear.", SentimentLabel::Positive),
    )
    .await
    .expect("insert feedback");

    let stored = row.into_stored().expect("valid row");
    assert_eq!(stored.amendment_id, amendment_id);
    assert_eq!(stored.original_text, "Helpful and clear.");
    assert_eq!(stored.sentiment, SentimentLabel::Positive);
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres database (DATABASE_URL)"]
async fn insert_feedback_for_missing_amendment_fails(pool: sqlx::PgPool) {
    let result = insert_feedback(
        &pool,
        &record(9_999, "Orphaned feedback", SentimentLabel::Neutral),
    )
    .await;
    assert!(result.is_err(), "foreign key should reject orphan feedback");
}

#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a live Postgres database (DATABASE_URL)"]
async fn sentiment_counts_group_by_label(pool: sqlx::PgPool) {
    let amendment_id = insert_test_amendment(&pool, "Housing Code").await;
    let other_id = insert_test_amendment(&pool, "Other").await;

    for (text, label) in [
        ("good", SentimentLabel::Positive),
        ("great", SentimentLabel::Positive),
        ("bad", SentimentLabel::Negative),
    ] {
        insert_feedback(&pool, &record(amendment_id, text, label))
            .await
            .expect("insert");
    }
    insert_feedback(&pool, &record(other_id, "meh", SentimentLabel::Neutral))
        .await
        .expect("insert");

    let counts = sentiment_counts(&pool, amendment_id).await.expect("counts");
    let positive = counts
        .iter()
        .find(|c| c.sentiment == "positive")
        .expect("positive row");
    assert_eq!(positive.count, 2);
    assert!(counts.iter().all(|c| c.sentiment != "neutral"));

    let texts = list_feedback_texts(&pool, amendment_id).await.expect("texts");
    assert_eq!(texts, vec!["good", "great", "bad"]);

    let listed = list_feedback_for_amendment(&pool, amendment_id, 2)
        .await
        .expect("list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].original_text, "bad");
}

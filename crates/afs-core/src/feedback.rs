use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Sentiment assigned to a piece of feedback. The set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const ALL: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            other => Err(CoreError::InvalidSentimentLabel(other.to_string())),
        }
    }
}

/// Raw feedback as received from the public. Never persisted directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub amendment_id: i64,
    pub original_text: String,
}

/// An accepted, analysed submission ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub amendment_id: i64,
    pub original_text: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    /// Always within `[0.0, 1.0]`.
    pub sentiment_confidence: f64,
}

/// A feedback record as returned by the store after a successful write.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredFeedback {
    pub id: i64,
    pub amendment_id: i64,
    pub original_text: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    pub sentiment_confidence: f64,
    pub created_at: DateTime<Utc>,
}

impl StoredFeedback {
    #[must_use]
    pub fn from_record(id: i64, record: FeedbackRecord, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            amendment_id: record.amendment_id,
            original_text: record.original_text,
            summary: record.summary,
            sentiment: record.sentiment,
            sentiment_confidence: record.sentiment_confidence,
            created_at,
        }
    }
}

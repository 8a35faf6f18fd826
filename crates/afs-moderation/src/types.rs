use std::time::Duration;

use afs_core::{SentimentLabel, StoredFeedback};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Result of the toxicity gate for one text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityAssessment {
    pub is_toxic: bool,
    /// Toxicity score in `[0.0, 1.0]`; higher is more toxic.
    pub score: f64,
}

/// Threshold policy applied to raw toxicity scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToxicityPolicy {
    pub threshold: f64,
}

impl ToxicityPolicy {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// A score is toxic when it is strictly above the threshold.
    #[must_use]
    pub fn assess(&self, score: f64) -> ToxicityAssessment {
        let score = score.clamp(0.0, 1.0);
        ToxicityAssessment {
            is_toxic: score > self.threshold,
            score,
        }
    }
}

impl Default for ToxicityPolicy {
    fn default() -> Self {
        Self { threshold: 0.6 }
    }
}

/// Sentiment classification. Label and confidence always travel together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl SentimentResult {
    #[must_use]
    pub fn new(label: SentimentLabel, confidence: f64) -> Self {
        Self {
            label,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// Tunables for [`crate::ModerationPipeline`].
#[derive(Debug, Clone)]
pub struct ModerationConfig {
    pub policy: ToxicityPolicy,
    pub max_text_chars: usize,
    /// Upper bound on each classifier call.
    pub call_timeout: Duration,
}

impl ModerationConfig {
    #[must_use]
    pub fn from_app_config(config: &afs_core::AppConfig) -> Self {
        Self {
            policy: ToxicityPolicy::new(config.toxicity_threshold),
            max_text_chars: config.max_feedback_chars,
            call_timeout: Duration::from_secs(config.classifier_timeout_secs),
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            policy: ToxicityPolicy::default(),
            max_text_chars: 5000,
            call_timeout: Duration::from_secs(30),
        }
    }
}

/// How a submission ended, short of a processing fault.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackOutcome {
    Accepted(AcceptedFeedback),
    Rejected(ToxicRejection),
    Invalid(ValidationFailure),
}

/// A stored submission, as reported back to the submitter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcceptedFeedback {
    pub id: i64,
    pub amendment_id: i64,
    pub original_text: String,
    pub summary: String,
    pub sentiment: SentimentLabel,
    pub sentiment_confidence: f64,
    pub toxic: bool,
    pub toxic_score: f64,
    pub created_at: DateTime<Utc>,
}

impl AcceptedFeedback {
    #[must_use]
    pub fn new(stored: StoredFeedback, toxic_score: f64) -> Self {
        Self {
            id: stored.id,
            amendment_id: stored.amendment_id,
            original_text: stored.original_text,
            summary: stored.summary,
            sentiment: stored.sentiment,
            sentiment_confidence: stored.sentiment_confidence,
            toxic: false,
            toxic_score,
            created_at: stored.created_at,
        }
    }
}

/// The toxicity gate tripped. Nothing was analysed further or stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToxicRejection {
    pub toxic: bool,
    pub toxic_score: f64,
}

impl ToxicRejection {
    pub const MESSAGE: &'static str = "The comment contains toxicity";

    #[must_use]
    pub fn new(toxic_score: f64) -> Self {
        Self {
            toxic: true,
            toxic_score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    InvalidInput(String),
    NotFound(i64),
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationFailure::InvalidInput(reason) => f.write_str(reason),
            ValidationFailure::NotFound(id) => write!(f, "Amendment {id} not found"),
        }
    }
}

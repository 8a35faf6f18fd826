//! Feedback moderation pipeline orchestration.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use afs_core::{FeedbackRecord, FeedbackSubmission};

use crate::classifier::Classifiers;
use crate::error::{ModerationError, Stage};
use crate::store::{AmendmentLookup, FeedbackStore};
use crate::types::{
    AcceptedFeedback, FeedbackOutcome, ModerationConfig, ToxicRejection, ValidationFailure,
};

/// Moderates one submission at a time; cheap to share behind an `Arc`.
///
/// Holds no per-submission state, so concurrent calls are independent.
pub struct ModerationPipeline {
    classifiers: Classifiers,
    amendments: Arc<dyn AmendmentLookup>,
    store: Arc<dyn FeedbackStore>,
    config: ModerationConfig,
}

impl ModerationPipeline {
    #[must_use]
    pub fn new(
        classifiers: Classifiers,
        amendments: Arc<dyn AmendmentLookup>,
        store: Arc<dyn FeedbackStore>,
        config: ModerationConfig,
    ) -> Self {
        Self {
            classifiers,
            amendments,
            store,
            config,
        }
    }

    #[must_use]
    pub fn classifiers(&self) -> &Classifiers {
        &self.classifiers
    }

    #[must_use]
    pub fn config(&self) -> &ModerationConfig {
        &self.config
    }

    /// Run one submission through validation, the toxicity gate, analysis and
    /// persistence.
    ///
    /// 1. Validate text and amendment id, then confirm the amendment exists.
    /// 2. Score toxicity and apply the threshold policy.
    /// 3. Classify sentiment and summarize concurrently.
    /// 4. Persist the record.
    ///
    /// Validation failures and toxic rejections are returned as
    /// [`FeedbackOutcome`] values. Nothing is persisted for either, and no
    /// classifier runs for an invalid submission.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError`] if a classifier, the lookup, or the store
    /// fails or times out. Nothing is persisted in that case.
    pub async fn process_feedback(
        &self,
        submission: &FeedbackSubmission,
    ) -> Result<FeedbackOutcome, ModerationError> {
        let amendment_id = submission.amendment_id;
        let text = submission.original_text.as_str();

        if let Some(reason) = self.validate(submission) {
            tracing::info!(amendment_id, reason = %reason, "feedback rejected as invalid");
            return Ok(FeedbackOutcome::Invalid(ValidationFailure::InvalidInput(
                reason,
            )));
        }

        let exists = self
            .bounded(Stage::AmendmentLookup, self.amendments.exists(amendment_id))
            .await?;
        if !exists {
            tracing::info!(amendment_id, "feedback for unknown amendment");
            return Ok(FeedbackOutcome::Invalid(ValidationFailure::NotFound(
                amendment_id,
            )));
        }
        tracing::debug!(amendment_id, chars = text.chars().count(), "feedback validated");

        let raw_score = self
            .bounded(Stage::Toxicity, self.classifiers.toxicity.score(text))
            .await?;
        let assessment = self.config.policy.assess(raw_score);
        tracing::debug!(
            amendment_id,
            toxic_score = assessment.score,
            is_toxic = assessment.is_toxic,
            "toxicity checked"
        );

        if assessment.is_toxic {
            tracing::info!(
                amendment_id,
                toxic_score = assessment.score,
                threshold = self.config.policy.threshold,
                "feedback rejected as toxic"
            );
            return Ok(FeedbackOutcome::Rejected(ToxicRejection::new(
                assessment.score,
            )));
        }

        let (sentiment, summary) = tokio::try_join!(
            self.bounded(Stage::Sentiment, self.classifiers.sentiment.classify(text)),
            self.bounded(Stage::Summary, self.classifiers.summarizer.summarize(text)),
        )?;
        tracing::debug!(
            amendment_id,
            sentiment = %sentiment.label,
            confidence = sentiment.confidence,
            "feedback analyzed"
        );

        let record = FeedbackRecord {
            amendment_id,
            original_text: submission.original_text.clone(),
            summary,
            sentiment: sentiment.label,
            sentiment_confidence: sentiment.confidence,
        };
        let stored = self.store.save(record).await.inspect_err(|e| {
            tracing::error!(amendment_id, stage = %Stage::Persist, error = %e, "feedback not stored");
        })?;

        tracing::info!(
            feedback_id = stored.id,
            amendment_id,
            sentiment = %stored.sentiment,
            toxic_score = assessment.score,
            "feedback accepted"
        );
        Ok(FeedbackOutcome::Accepted(AcceptedFeedback::new(
            stored,
            assessment.score,
        )))
    }

    fn validate(&self, submission: &FeedbackSubmission) -> Option<String> {
        let text = &submission.original_text;
        if text.trim().is_empty() {
            return Some("original_text must not be empty".to_string());
        }
        let chars = text.chars().count();
        if chars > self.config.max_text_chars {
            return Some(format!(
                "original_text must be at most {} characters (got {chars})",
                self.config.max_text_chars
            ));
        }
        if submission.amendment_id <= 0 {
            return Some("amendment_id must be a positive integer".to_string());
        }
        None
    }

    /// Await `future` under the per-call timeout, logging any failure.
    async fn bounded<T, F>(&self, stage: Stage, future: F) -> Result<T, ModerationError>
    where
        F: Future<Output = Result<T, ModerationError>>,
    {
        bounded(stage, self.config.call_timeout, future).await
    }
}

pub(crate) async fn bounded<T, F>(
    stage: Stage,
    limit: Duration,
    future: F,
) -> Result<T, ModerationError>
where
    F: Future<Output = Result<T, ModerationError>>,
{
    let result = match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(ModerationError::Timeout {
            stage,
            timeout_ms: limit.as_millis(),
        }),
    };
    result.inspect_err(|e| {
        tracing::error!(stage = %stage, error = %e, "moderation stage failed");
    })
}

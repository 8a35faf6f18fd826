//! Classifier adapter contracts and the process-wide classifier bundle.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ModerationError;
use crate::inference::{
    InferenceClient, InferenceSentiment, InferenceSummarizer, InferenceToxicity,
};
use crate::lexicon::{ExtractiveSummarizer, LexiconSentiment, LexiconToxicity};
use crate::types::SentimentResult;

/// Scores how toxic a text is. Higher is more toxic; the range is `[0.0, 1.0]`.
#[async_trait]
pub trait ToxicityScorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<f64, ModerationError>;
}

/// Assigns one of the three sentiment labels with a confidence.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentResult, ModerationError>;
}

/// Produces a short summary of a text.
///
/// Implementations must return the input unchanged when it has at most the
/// configured number of words, and an empty string for blank input.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, ModerationError>;
}

/// Settings for the hosted inference backend.
#[derive(Debug, Clone)]
pub struct InferenceSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub toxicity_model: String,
    pub sentiment_model: String,
    pub summary_model: String,
    pub request_timeout: Duration,
    pub summary_word_limit: usize,
    /// Characters of input sent to the summarization model; longer texts are cut.
    pub summary_input_chars: usize,
}

/// The three classifiers, built once at startup and shared read-only by every
/// pipeline invocation.
#[derive(Clone)]
pub struct Classifiers {
    pub toxicity: Arc<dyn ToxicityScorer>,
    pub sentiment: Arc<dyn SentimentClassifier>,
    pub summarizer: Arc<dyn Summarizer>,
    backend: &'static str,
}

impl Classifiers {
    /// Assemble a bundle from arbitrary implementations.
    #[must_use]
    pub fn new(
        toxicity: Arc<dyn ToxicityScorer>,
        sentiment: Arc<dyn SentimentClassifier>,
        summarizer: Arc<dyn Summarizer>,
        backend: &'static str,
    ) -> Self {
        Self {
            toxicity,
            sentiment,
            summarizer,
            backend,
        }
    }

    /// Built-in word-list classifiers. No network access.
    #[must_use]
    pub fn lexicon(summary_word_limit: usize) -> Self {
        Self::new(
            Arc::new(LexiconToxicity),
            Arc::new(LexiconSentiment),
            Arc::new(ExtractiveSummarizer::new(summary_word_limit)),
            "lexicon",
        )
    }

    /// Classifiers backed by a hosted inference service.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Http`] if the HTTP client cannot be built.
    pub fn inference(settings: &InferenceSettings) -> Result<Self, ModerationError> {
        let client = Arc::new(InferenceClient::new(
            &settings.base_url,
            settings.token.as_deref(),
            settings.request_timeout,
        )?);

        Ok(Self::new(
            Arc::new(InferenceToxicity::new(
                Arc::clone(&client),
                &settings.toxicity_model,
            )),
            Arc::new(InferenceSentiment::new(
                Arc::clone(&client),
                &settings.sentiment_model,
            )),
            Arc::new(InferenceSummarizer::new(
                client,
                &settings.summary_model,
                settings.summary_word_limit,
                settings.summary_input_chars,
            )),
            "inference",
        ))
    }

    /// Pick the backend from configuration: inference when a URL is set,
    /// otherwise the lexicon.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Http`] if the inference HTTP client cannot be built.
    pub fn from_app_config(config: &afs_core::AppConfig) -> Result<Self, ModerationError> {
        let Some(base_url) = config.inference_url.as_deref() else {
            tracing::warn!("AFS_INFERENCE_URL not set; using built-in lexicon classifiers");
            return Ok(Self::lexicon(config.summary_word_limit));
        };

        tracing::info!(
            base_url,
            toxicity_model = %config.toxicity_model,
            sentiment_model = %config.sentiment_model,
            summary_model = %config.summary_model,
            "using hosted inference classifiers"
        );
        Self::inference(&InferenceSettings {
            base_url: base_url.to_string(),
            token: config.inference_token.clone(),
            toxicity_model: config.toxicity_model.clone(),
            sentiment_model: config.sentiment_model.clone(),
            summary_model: config.summary_model.clone(),
            request_timeout: Duration::from_secs(config.classifier_timeout_secs),
            summary_word_limit: config.summary_word_limit,
            summary_input_chars: config.summary_input_chars,
        })
    }

    /// Short name of the backend, for health output and logs.
    #[must_use]
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

pub(crate) fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `limit` whitespace-separated words, joined by single spaces.
pub(crate) fn first_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The summary every summarizer must return without doing any work, if any:
/// empty for blank input, the input itself when it is already short enough.
pub(crate) fn short_input_summary(text: &str, word_limit: usize) -> Option<String> {
    if text.trim().is_empty() {
        return Some(String::new());
    }
    if word_count(text) <= word_limit {
        return Some(text.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_words_collapses_whitespace() {
        assert_eq!(first_words("  one \n two\tthree four ", 3), "one two three");
    }

    #[test]
    fn short_input_summary_is_identity_at_limit() {
        let text = "  one two three ";
        assert_eq!(short_input_summary(text, 3).as_deref(), Some(text));
    }

    #[test]
    fn short_input_summary_is_empty_for_blank() {
        assert_eq!(short_input_summary(" \n ", 15).as_deref(), Some(""));
    }

    #[test]
    fn short_input_summary_defers_long_input() {
        assert!(short_input_summary("one two three four", 3).is_none());
    }

    #[test]
    fn lexicon_bundle_reports_backend() {
        assert_eq!(Classifiers::lexicon(15).backend(), "lexicon");
    }
}

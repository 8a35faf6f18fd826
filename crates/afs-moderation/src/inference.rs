//! Client for a hosted text-inference service (Hugging Face Inference API shape).
//!
//! Every model is reached with `POST {base_url}/models/{model}` and a JSON body
//! of `{"inputs": text}`. Classification models answer with label/score pairs;
//! summarization models answer with `summary_text`.

use std::sync::Arc;
use std::time::Duration;

use afs_core::SentimentLabel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::classifier::{
    first_words, short_input_summary, SentimentClassifier, Summarizer, ToxicityScorer,
};
use crate::error::ModerationError;
use crate::types::SentimentResult;

/// Generation bounds passed to summarization models, in tokens.
const SUMMARY_MAX_LENGTH: u32 = 90;
const SUMMARY_MIN_LENGTH: u32 = 20;

/// HTTP client shared by the three inference adapters.
pub(crate) struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<SummaryParameters>,
}

#[derive(Serialize)]
struct SummaryParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Classification pipelines return either one list per input or a flat list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ClassificationResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct SummaryOutput {
    summary_text: String,
}

impl InferenceClient {
    /// Create a new `InferenceClient`.
    ///
    /// # Errors
    ///
    /// Returns [`ModerationError::Http`] if the underlying client cannot be built.
    pub(crate) fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ModerationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("afs-moderation/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        model: &str,
        request: &InferenceRequest<'_>,
    ) -> Result<T, ModerationError> {
        let url = format!("{}/models/{model}", self.base_url);
        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModerationError::Inference(format!(
                "{model} returned status {status}: {}",
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| ModerationError::Inference(format!("{model} response parse error: {e}")))
    }

    /// Label/score pairs for one input.
    pub(crate) async fn classify(
        &self,
        model: &str,
        text: &str,
    ) -> Result<Vec<LabelScore>, ModerationError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: None,
        };
        match self.post::<ClassificationResponse>(model, &request).await? {
            ClassificationResponse::Flat(scores) => Ok(scores),
            ClassificationResponse::Batched(mut batches) => {
                if batches.is_empty() {
                    return Err(ModerationError::Inference(format!(
                        "{model} returned no classification"
                    )));
                }
                Ok(batches.swap_remove(0))
            }
        }
    }

    /// Generated summary text for one input.
    pub(crate) async fn summarize(&self, model: &str, text: &str) -> Result<String, ModerationError> {
        let request = InferenceRequest {
            inputs: text,
            parameters: Some(SummaryParameters {
                max_length: SUMMARY_MAX_LENGTH,
                min_length: SUMMARY_MIN_LENGTH,
                do_sample: false,
            }),
        };
        let outputs: Vec<SummaryOutput> = self.post(model, &request).await?;
        outputs
            .into_iter()
            .next()
            .map(|output| output.summary_text)
            .ok_or_else(|| ModerationError::Inference(format!("{model} returned no summary")))
    }
}

pub struct InferenceToxicity {
    client: Arc<InferenceClient>,
    model: String,
}

impl InferenceToxicity {
    pub(crate) fn new(client: Arc<InferenceClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

/// Multi-label toxicity models score several categories (`toxic`, `insult`,
/// `threat`, ...). The text is as toxic as its worst category.
#[async_trait]
impl ToxicityScorer for InferenceToxicity {
    async fn score(&self, text: &str) -> Result<f64, ModerationError> {
        let scores = self.client.classify(&self.model, text).await?;
        let worst = scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| {
                ModerationError::Inference(format!("{} returned no labels", self.model))
            })?;
        tracing::debug!(
            model = %self.model,
            label = %worst.label,
            score = worst.score,
            "toxicity scored"
        );
        Ok(worst.score.clamp(0.0, 1.0))
    }
}

pub struct InferenceSentiment {
    client: Arc<InferenceClient>,
    model: String,
}

impl InferenceSentiment {
    pub(crate) fn new(client: Arc<InferenceClient>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

/// Map the label vocabularies of common sentiment models onto ours.
pub(crate) fn map_sentiment_label(label: &str) -> Option<SentimentLabel> {
    match label.to_lowercase().as_str() {
        "positive" | "pos" | "label_2" => Some(SentimentLabel::Positive),
        "negative" | "neg" | "label_0" => Some(SentimentLabel::Negative),
        "neutral" | "label_1" => Some(SentimentLabel::Neutral),
        _ => None,
    }
}

#[async_trait]
impl SentimentClassifier for InferenceSentiment {
    async fn classify(&self, text: &str) -> Result<SentimentResult, ModerationError> {
        let scores = self.client.classify(&self.model, text).await?;
        let best = scores
            .iter()
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .ok_or_else(|| {
                ModerationError::Inference(format!("{} returned no labels", self.model))
            })?;

        let label = map_sentiment_label(&best.label).ok_or_else(|| {
            ModerationError::Inference(format!(
                "{} returned unknown sentiment label '{}'",
                self.model, best.label
            ))
        })?;
        Ok(SentimentResult::new(label, best.score))
    }
}

pub struct InferenceSummarizer {
    client: Arc<InferenceClient>,
    model: String,
    word_limit: usize,
    input_chars: usize,
}

impl InferenceSummarizer {
    pub(crate) fn new(
        client: Arc<InferenceClient>,
        model: &str,
        word_limit: usize,
        input_chars: usize,
    ) -> Self {
        Self {
            client,
            model: model.to_string(),
            word_limit,
            input_chars,
        }
    }
}

#[async_trait]
impl Summarizer for InferenceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ModerationError> {
        if let Some(summary) = short_input_summary(text, self.word_limit) {
            return Ok(summary);
        }

        let input = truncate_chars(text, self.input_chars);
        let generated = self.client.summarize(&self.model, input).await?;
        if generated.trim().is_empty() {
            tracing::warn!(model = %self.model, "summarizer returned blank text; truncating");
            return Ok(first_words(text, self.word_limit));
        }

        let summary = first_words(&generated, self.word_limit);
        if summary.chars().count() >= text.chars().count() {
            tracing::debug!(
                model = %self.model,
                "generated summary not shorter than input; truncating"
            );
            return Ok(first_words(text, self.word_limit));
        }
        Ok(summary)
    }
}

/// Longest prefix of `text` with at most `max_chars` characters.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

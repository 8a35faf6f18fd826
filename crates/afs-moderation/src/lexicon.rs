//! Built-in word-list classifiers for public policy feedback.
//!
//! Used when no inference service is configured. Scores are deterministic and
//! need no network access, which also makes them the backend of choice for
//! tests and the CLI's offline analysis.

use std::collections::HashMap;
use std::sync::LazyLock;

use afs_core::SentimentLabel;
use async_trait::async_trait;

use crate::classifier::{
    first_words, short_input_summary, SentimentClassifier, Summarizer, ToxicityScorer,
};
use crate::error::ModerationError;
use crate::types::SentimentResult;

/// Abusive terms and their toxicity weights in `(0.0, 1.0)`.
///
/// A single strong insult (weight 0.7) is enough to cross the default 0.6
/// threshold; milder terms need company.
const TOXICITY_TERMS: &[(&str, f64)] = &[
    ("idiot", 0.7),
    ("idiots", 0.7),
    ("idiotic", 0.65),
    ("moron", 0.7),
    ("morons", 0.7),
    ("imbecile", 0.7),
    ("scum", 0.75),
    ("garbage", 0.4),
    ("trash", 0.4),
    ("stupid", 0.5),
    ("dumb", 0.45),
    ("loser", 0.5),
    ("losers", 0.5),
    ("pathetic", 0.45),
    ("disgusting", 0.4),
    ("clown", 0.35),
    ("clowns", 0.35),
    ("crook", 0.45),
    ("crooks", 0.45),
    ("liar", 0.4),
    ("liars", 0.4),
    ("hate", 0.35),
    ("shut", 0.1),
    ("damn", 0.3),
    ("crap", 0.4),
    ("bastard", 0.75),
    ("bastards", 0.75),
];

/// Signed sentiment weights. Positive values in `(0.0, 1.0]`, negative values
/// in `[-1.0, 0.0)`.
const SENTIMENT_TERMS: &[(&str, f64)] = &[
    // Positive signals
    ("good", 0.3),
    ("great", 0.4),
    ("excellent", 0.5),
    ("positive", 0.3),
    ("support", 0.4),
    ("supports", 0.4),
    ("agree", 0.4),
    ("approve", 0.4),
    ("beneficial", 0.5),
    ("benefit", 0.3),
    ("helpful", 0.4),
    ("clear", 0.3),
    ("fair", 0.3),
    ("welcome", 0.4),
    ("improve", 0.3),
    ("improves", 0.3),
    ("improvement", 0.4),
    ("amazing", 0.5),
    ("wonderful", 0.5),
    ("best", 0.4),
    ("love", 0.5),
    ("thank", 0.3),
    ("thanks", 0.3),
    // Negative signals
    ("bad", -0.4),
    ("poor", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("negative", -0.3),
    ("oppose", -0.5),
    ("against", -0.3),
    ("disagree", -0.4),
    ("confusing", -0.4),
    ("difficult", -0.3),
    ("burden", -0.4),
    ("impractical", -0.4),
    ("harmful", -0.5),
    ("unfair", -0.5),
    ("unfairly", -0.5),
    ("unclear", -0.3),
    ("excessive", -0.3),
    ("costly", -0.3),
    ("hate", -0.6),
    ("horrible", -0.6),
    ("stupid", -0.5),
    ("dumb", -0.4),
    ("concern", -0.2),
    ("concerns", -0.2),
];

/// Scores at or inside this band around zero are neutral.
const NEUTRAL_BAND: f64 = 0.05;

static TOXICITY_LEXICON: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| TOXICITY_TERMS.iter().copied().collect());

static SENTIMENT_LEXICON: LazyLock<HashMap<&'static str, f64>> =
    LazyLock::new(|| SENTIMENT_TERMS.iter().copied().collect());

fn normalized_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphabetic())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
}

/// Toxicity score in `[0.0, 1.0]`: matched term weights combined with
/// noisy-or, so repeated abuse pushes the score toward 1 without passing it.
#[must_use]
pub fn toxicity_score(text: &str) -> f64 {
    let clean = normalized_words(text)
        .filter_map(|word| TOXICITY_LEXICON.get(word.as_str()).copied())
        .fold(1.0_f64, |acc, weight| acc * (1.0 - weight));
    (1.0 - clean).clamp(0.0, 1.0)
}

/// Signed sentiment score: sum of matched weights clamped to `[-1.0, 1.0]`.
#[must_use]
pub fn sentiment_score(text: &str) -> f64 {
    normalized_words(text)
        .filter_map(|word| SENTIMENT_LEXICON.get(word.as_str()).copied())
        .sum::<f64>()
        .clamp(-1.0, 1.0)
}

/// Map a signed score to a label and confidence.
#[must_use]
pub fn classify_score(score: f64) -> SentimentResult {
    if score > NEUTRAL_BAND {
        SentimentResult::new(SentimentLabel::Positive, 0.5 + score / 2.0)
    } else if score < -NEUTRAL_BAND {
        SentimentResult::new(SentimentLabel::Negative, 0.5 + score.abs() / 2.0)
    } else {
        SentimentResult::new(SentimentLabel::Neutral, 0.6 - score.abs())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconToxicity;

#[async_trait]
impl ToxicityScorer for LexiconToxicity {
    async fn score(&self, text: &str) -> Result<f64, ModerationError> {
        Ok(toxicity_score(text))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconSentiment;

#[async_trait]
impl SentimentClassifier for LexiconSentiment {
    async fn classify(&self, text: &str) -> Result<SentimentResult, ModerationError> {
        Ok(classify_score(sentiment_score(text)))
    }
}

/// Summarizer that keeps the leading words of the text.
#[derive(Debug, Clone, Copy)]
pub struct ExtractiveSummarizer {
    word_limit: usize,
}

impl ExtractiveSummarizer {
    #[must_use]
    pub fn new(word_limit: usize) -> Self {
        Self { word_limit }
    }
}

#[async_trait]
impl Summarizer for ExtractiveSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ModerationError> {
        Ok(short_input_summary(text, self.word_limit)
            .unwrap_or_else(|| first_words(text, self.word_limit)))
    }
}

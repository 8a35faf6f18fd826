//! Offline analysis of a CSV export of comments.
//!
//! Each comment gets a sentiment label and a summary; the batch as a whole
//! gets a sentiment breakdown and word-cloud terms. No toxicity gate runs and
//! nothing is stored.

use std::io::Read;
use std::time::Duration;

use afs_core::SentimentLabel;
use serde::Serialize;
use thiserror::Error;

use crate::classifier::Classifiers;
use crate::error::{ModerationError, Stage};
use crate::insights::{word_cloud, SentimentBreakdown, TermCount, DEFAULT_MAX_TERMS};
use crate::pipeline::bounded;

/// Header names accepted for the comment column, in order of preference.
pub const TEXT_COLUMNS: [&str; 2] = ["comment", "feedback"];

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV must have a 'comment' or 'feedback' column")]
    MissingTextColumn,

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read the comment column of a CSV document. Blank cells are skipped.
///
/// Header matching ignores case and surrounding whitespace. `comment` wins
/// over `feedback` when both are present.
///
/// # Errors
///
/// Returns [`BatchError::MissingTextColumn`] when neither header is present
/// and [`BatchError::Csv`] on malformed input.
pub fn read_comments<R: Read>(reader: R) -> Result<Vec<String>, BatchError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let column = TEXT_COLUMNS
        .iter()
        .find_map(|name| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
        })
        .ok_or(BatchError::MissingTextColumn)?;

    let mut comments = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if let Some(text) = record.get(column).filter(|text| !text.trim().is_empty()) {
            comments.push(text.to_string());
        }
    }
    Ok(comments)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentAnalysis {
    pub original_text: String,
    pub sentiment: SentimentLabel,
    pub confidence: f64,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchAnalysis {
    pub total_comments: usize,
    pub results: Vec<CommentAnalysis>,
    pub sentiment: SentimentBreakdown,
    pub word_cloud: Vec<TermCount>,
}

/// Classify and summarize every comment, then aggregate.
///
/// Comments are processed in order; sentiment and summary for one comment
/// run concurrently, each under `call_timeout`.
///
/// # Errors
///
/// Returns [`ModerationError`] on the first classifier failure or timeout.
pub async fn analyze_comments(
    classifiers: &Classifiers,
    comments: Vec<String>,
    call_timeout: Duration,
) -> Result<BatchAnalysis, ModerationError> {
    tracing::info!(
        comments = comments.len(),
        backend = classifiers.backend(),
        "analyzing comment batch"
    );

    let mut results = Vec::with_capacity(comments.len());
    for text in comments {
        let (sentiment, summary) = tokio::try_join!(
            bounded(
                Stage::Sentiment,
                call_timeout,
                classifiers.sentiment.classify(&text)
            ),
            bounded(
                Stage::Summary,
                call_timeout,
                classifiers.summarizer.summarize(&text)
            ),
        )?;
        results.push(CommentAnalysis {
            original_text: text,
            sentiment: sentiment.label,
            confidence: sentiment.confidence,
            summary,
        });
    }

    let sentiment =
        SentimentBreakdown::from_counts(results.iter().map(|result| (result.sentiment, 1)));
    let word_cloud = word_cloud(
        results.iter().map(|result| result.original_text.as_str()),
        DEFAULT_MAX_TERMS,
    );
    tracing::info!(
        comments = results.len(),
        positive = sentiment.counts.get(&SentimentLabel::Positive).copied().unwrap_or(0),
        negative = sentiment.counts.get(&SentimentLabel::Negative).copied().unwrap_or(0),
        "comment batch analyzed"
    );

    Ok(BatchAnalysis {
        total_comments: results.len(),
        results,
        sentiment,
        word_cloud,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_comment_column_and_skips_blanks() {
        let csv = "id,comment\n1,Clear and fair\n2,\n3,  \n4,\"Too costly, please revise\"\n";
        let comments = read_comments(csv.as_bytes()).expect("comments");
        assert_eq!(comments, vec!["Clear and fair", "Too costly, please revise"]);
    }

    #[test]
    fn falls_back_to_feedback_column_case_insensitively() {
        let csv = "name, Feedback \nA,Good idea\n";
        let comments = read_comments(csv.as_bytes()).expect("comments");
        assert_eq!(comments, vec!["Good idea"]);
    }

    #[test]
    fn prefers_comment_over_feedback() {
        let csv = "feedback,comment\nfrom feedback,from comment\n";
        let comments = read_comments(csv.as_bytes()).expect("comments");
        assert_eq!(comments, vec!["from comment"]);
    }

    #[test]
    fn missing_text_column_is_an_error() {
        let err = read_comments("id,text\n1,hello\n".as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::MissingTextColumn), "got: {err:?}");
    }

    #[test]
    fn empty_document_has_no_text_column() {
        let err = read_comments("".as_bytes()).unwrap_err();
        assert!(matches!(err, BatchError::MissingTextColumn), "got: {err:?}");
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "id,comment\n1\n2,Works for me\n";
        let comments = read_comments(csv.as_bytes()).expect("comments");
        assert_eq!(comments, vec!["Works for me"]);
    }

    #[tokio::test]
    async fn analyzes_each_comment_and_aggregates() {
        let classifiers = Classifiers::lexicon(15);
        let comments = vec![
            "This is an excellent and fair reform".to_string(),
            "The reporting burden is unfair and costly for small firms".to_string(),
        ];

        let analysis = analyze_comments(&classifiers, comments, Duration::from_secs(5))
            .await
            .expect("analysis");

        assert_eq!(analysis.total_comments, 2);
        assert_eq!(analysis.results.len(), 2);
        assert_eq!(analysis.results[0].sentiment, SentimentLabel::Positive);
        assert_eq!(analysis.results[1].sentiment, SentimentLabel::Negative);
        assert_eq!(analysis.sentiment.total, 2);
        assert!(analysis.word_cloud.iter().any(|term| term.term == "reporting"));
    }

    #[tokio::test]
    async fn empty_batch_yields_zeroed_breakdown() {
        let classifiers = Classifiers::lexicon(15);
        let analysis = analyze_comments(&classifiers, Vec::new(), Duration::from_secs(1))
            .await
            .expect("analysis");
        assert_eq!(analysis.total_comments, 0);
        assert_eq!(analysis.sentiment.total, 0);
        assert!(analysis.word_cloud.is_empty());
    }
}

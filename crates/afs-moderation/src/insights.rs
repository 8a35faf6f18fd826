//! Read-side aggregates over accepted feedback: sentiment breakdown and
//! word-cloud terms. Recomputed from stored rows on every read.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

use afs_core::SentimentLabel;
use regex::Regex;
use serde::Serialize;

/// Terms returned by [`word_cloud`] by default.
pub const DEFAULT_MAX_TERMS: usize = 100;

const MIN_TERM_CHARS: usize = 3;

/// Common English function words plus vocabulary every consultation shares.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "against", "all", "also", "and", "any", "are", "because",
    "been", "before", "being", "below", "between", "both", "but", "can", "could", "did", "does",
    "doing", "down", "during", "each", "even", "few", "for", "from", "further", "had", "has",
    "have", "having", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however",
    "into", "its", "itself", "just", "let", "more", "most", "much", "must", "myself", "nor",
    "not", "now", "off", "once", "only", "other", "ought", "our", "ours", "ourselves", "out",
    "over", "own", "same", "shall", "she", "should", "some", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this", "those",
    "through", "too", "under", "until", "very", "was", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours", "yourself",
    "yourselves",
    // Consultation vocabulary
    "amendment", "amendments", "proposal", "proposed", "draft", "change", "changes", "section",
    "clause", "rule", "rules", "government", "ministry", "policy",
];

static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid token regex"));

static STOPWORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOPWORDS.iter().copied().collect());

/// One word-cloud term and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

/// Most frequent non-stopword terms across `texts`, highest count first,
/// ties broken alphabetically.
pub fn word_cloud<'a, I>(texts: I, max_terms: usize) -> Vec<TermCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<String, u64> = HashMap::new();
    for text in texts {
        for token in TOKEN.find_iter(text) {
            let term = token.as_str().to_lowercase();
            if term.chars().count() < MIN_TERM_CHARS || STOPWORD_SET.contains(term.as_str()) {
                continue;
            }
            *counts.entry(term).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<TermCount> = counts
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
    terms.truncate(max_terms);
    terms
}

/// Per-label feedback counts and their share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub total: u64,
    /// Every label is present, zero-filled.
    pub counts: BTreeMap<SentimentLabel, u64>,
    /// Percent of `total`, rounded to two decimals. All zero when `total` is 0.
    pub percentages: BTreeMap<SentimentLabel, f64>,
}

impl SentimentBreakdown {
    /// Build from `(label, count)` pairs; repeated labels are summed.
    pub fn from_counts(pairs: impl IntoIterator<Item = (SentimentLabel, u64)>) -> Self {
        let mut counts: BTreeMap<SentimentLabel, u64> =
            SentimentLabel::ALL.iter().map(|label| (*label, 0)).collect();
        for (label, count) in pairs {
            *counts.entry(label).or_insert(0) += count;
        }
        let total: u64 = counts.values().sum();

        let percentages = counts
            .iter()
            .map(|(label, count)| (*label, percentage(*count, total)))
            .collect();

        Self {
            total,
            counts,
            percentages,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_cloud_drops_stopwords_and_short_tokens() {
        let terms = word_cloud(
            ["The amendment is fair to farmers", "Farmers need fair water access"],
            DEFAULT_MAX_TERMS,
        );
        let words: Vec<&str> = terms.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(words, vec!["fair", "farmers", "access", "need", "water"]);
        assert_eq!(terms[0].count, 2);
    }

    #[test]
    fn word_cloud_respects_max_terms() {
        let terms = word_cloud(["alpha beta gamma delta"], 2);
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].term, "alpha");
        assert_eq!(terms[1].term, "beta");
    }

    #[test]
    fn word_cloud_of_nothing_is_empty() {
        assert!(word_cloud(std::iter::empty(), DEFAULT_MAX_TERMS).is_empty());
    }

    #[test]
    fn breakdown_zero_fills_and_rounds() {
        let breakdown = SentimentBreakdown::from_counts([
            (SentimentLabel::Positive, 1),
            (SentimentLabel::Negative, 2),
        ]);
        assert_eq!(breakdown.total, 3);
        assert_eq!(breakdown.counts[&SentimentLabel::Neutral], 0);
        assert!((breakdown.percentages[&SentimentLabel::Positive] - 33.33).abs() < 1e-9);
        assert!((breakdown.percentages[&SentimentLabel::Negative] - 66.67).abs() < 1e-9);
    }

    #[test]
    fn empty_breakdown_has_zero_percentages() {
        let breakdown = SentimentBreakdown::from_counts([]);
        assert_eq!(breakdown.total, 0);
        assert!(breakdown.percentages.values().all(|p| *p == 0.0));
    }

    #[test]
    fn breakdown_serializes_lowercase_labels() {
        let breakdown = SentimentBreakdown::from_counts([(SentimentLabel::Neutral, 4)]);
        let json = serde_json::to_value(&breakdown).expect("serialize");
        assert_eq!(json["counts"]["neutral"], 4);
        assert_eq!(json["percentages"]["neutral"], 100.0);
    }
}

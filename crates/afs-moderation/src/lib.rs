//! Feedback moderation for the amendment feedback system.
//!
//! Screens public comments for toxicity, rejects abusive ones, and enriches
//! the rest with a sentiment label and a short summary before handing them to
//! a [`FeedbackStore`]. Classifiers are pluggable: a built-in lexicon backend
//! or a hosted inference service. Also provides the read-side aggregates
//! (sentiment breakdown, word-cloud terms) shown on amendment pages, and
//! the same analysis for an uploaded CSV of comments.

pub mod batch;
pub mod classifier;
pub mod error;
pub mod insights;
pub mod lexicon;
pub mod pipeline;
pub mod store;
pub mod types;

mod inference;

pub use batch::{analyze_comments, read_comments, BatchAnalysis, BatchError, CommentAnalysis};
pub use classifier::{
    Classifiers, InferenceSettings, SentimentClassifier, Summarizer, ToxicityScorer,
};
pub use error::{ModerationError, Stage};
pub use insights::{word_cloud, SentimentBreakdown, TermCount, DEFAULT_MAX_TERMS};
pub use pipeline::ModerationPipeline;
pub use store::{AmendmentLookup, FeedbackStore, MemoryStore};
pub use types::{
    AcceptedFeedback, FeedbackOutcome, ModerationConfig, SentimentResult, ToxicRejection,
    ToxicityAssessment, ToxicityPolicy, ValidationFailure,
};

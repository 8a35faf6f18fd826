use thiserror::Error;

/// Pipeline stage that performs an external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AmendmentLookup,
    Toxicity,
    Sentiment,
    Summary,
    Persist,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::AmendmentLookup => write!(f, "amendment lookup"),
            Stage::Toxicity => write!(f, "toxicity"),
            Stage::Sentiment => write!(f, "sentiment"),
            Stage::Summary => write!(f, "summary"),
            Stage::Persist => write!(f, "persist"),
        }
    }
}

/// A fault that stopped a submission from being processed.
///
/// Distinct from a toxicity rejection or a validation failure, which are
/// ordinary outcomes (see [`crate::FeedbackOutcome`]).
#[derive(Debug, Error)]
pub enum ModerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inference error: {0}")]
    Inference(String),

    #[error("{stage} call timed out after {timeout_ms} ms")]
    Timeout { stage: Stage, timeout_ms: u128 },

    #[error("store error: {0}")]
    Store(String),
}

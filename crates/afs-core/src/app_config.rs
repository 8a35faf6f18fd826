use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Scores strictly above this value are rejected as toxic.
    pub toxicity_threshold: f64,
    /// Texts with at most this many words are kept verbatim as their own summary.
    pub summary_word_limit: usize,
    /// Input sent to the summarization model is cut to this many characters.
    pub summary_input_chars: usize,
    pub max_feedback_chars: usize,
    pub classifier_timeout_secs: u64,
    /// Base URL of the hosted inference service. `None` selects the built-in lexicon classifiers.
    pub inference_url: Option<String>,
    pub inference_token: Option<String>,
    pub toxicity_model: String,
    pub sentiment_model: String,
    pub summary_model: String,
    pub rate_limit_per_minute: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("toxicity_threshold", &self.toxicity_threshold)
            .field("summary_word_limit", &self.summary_word_limit)
            .field("summary_input_chars", &self.summary_input_chars)
            .field("max_feedback_chars", &self.max_feedback_chars)
            .field("classifier_timeout_secs", &self.classifier_timeout_secs)
            .field("inference_url", &self.inference_url)
            .field(
                "inference_token",
                &self.inference_token.as_ref().map(|_| "[redacted]"),
            )
            .field("toxicity_model", &self.toxicity_model)
            .field("sentiment_model", &self.sentiment_model)
            .field("summary_model", &self.summary_model)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}

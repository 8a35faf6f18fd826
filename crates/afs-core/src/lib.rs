//! Shared domain types and configuration for the amendment feedback system.

pub mod amendments;
pub mod app_config;
pub mod config;
pub mod error;
pub mod feedback;

pub use amendments::{NewAmendment, MAX_TITLE_CHARS};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, CoreError};
pub use feedback::{FeedbackRecord, FeedbackSubmission, SentimentLabel, StoredFeedback};

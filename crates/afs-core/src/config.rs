use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_TOXICITY_MODEL: &str = "unitary/toxic-bert";
pub const DEFAULT_SENTIMENT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
pub const DEFAULT_SUMMARY_MODEL: &str = "facebook/bart-large-cnn";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("AFS_ENV", "development"))?;

    let bind_addr = or_default("AFS_BIND_ADDR", "0.0.0.0:8000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("AFS_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("AFS_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("AFS_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("AFS_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "AFS_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds AFS_DB_MAX_CONNECTIONS ({db_max_connections})"),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("AFS_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let toxicity_threshold = or_default("AFS_TOXICITY_THRESHOLD", "0.6")
        .parse::<f64>()
        .map_err(|e| invalid("AFS_TOXICITY_THRESHOLD", e.to_string()))?;
    if !(0.0..=1.0).contains(&toxicity_threshold) {
        return Err(invalid(
            "AFS_TOXICITY_THRESHOLD",
            format!("{toxicity_threshold} is outside [0, 1]"),
        ));
    }

    let summary_word_limit = parse_usize("AFS_SUMMARY_WORD_LIMIT", "15")?;
    if summary_word_limit == 0 {
        return Err(invalid(
            "AFS_SUMMARY_WORD_LIMIT",
            "must be greater than zero".to_string(),
        ));
    }

    let summary_input_chars = parse_usize("AFS_SUMMARY_INPUT_CHARS", "1000")?;
    if summary_input_chars == 0 {
        return Err(invalid(
            "AFS_SUMMARY_INPUT_CHARS",
            "must be greater than zero".to_string(),
        ));
    }

    let max_feedback_chars = parse_usize("AFS_MAX_FEEDBACK_CHARS", "5000")?;
    let classifier_timeout_secs = parse_u64("AFS_CLASSIFIER_TIMEOUT_SECS", "30")?;

    let inference_url = optional("AFS_INFERENCE_URL");
    let inference_token = optional("AFS_INFERENCE_TOKEN");
    let toxicity_model = or_default("AFS_TOXICITY_MODEL", DEFAULT_TOXICITY_MODEL);
    let sentiment_model = or_default("AFS_SENTIMENT_MODEL", DEFAULT_SENTIMENT_MODEL);
    let summary_model = or_default("AFS_SUMMARY_MODEL", DEFAULT_SUMMARY_MODEL);

    let rate_limit_per_minute = parse_usize("AFS_RATE_LIMIT_PER_MINUTE", "120")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        toxicity_threshold,
        summary_word_limit,
        summary_input_chars,
        max_feedback_chars,
        classifier_timeout_secs,
        inference_url,
        inference_token,
        toxicity_model,
        sentiment_model,
        summary_model,
        rate_limit_per_minute,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "AFS_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Feedback command handlers for the CLI.
//!
//! `submit` runs the same moderation pipeline as the API server. `analyze`
//! runs the classifiers alone, on one text or a CSV file, and touches no
//! database.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use afs_core::{AppConfig, FeedbackSubmission, SentimentLabel};
use afs_moderation::{
    analyze_comments, read_comments, word_cloud, Classifiers, FeedbackOutcome, FeedbackStore, MemoryStore, ModerationConfig,
    ModerationPipeline, SentimentBreakdown, TermCount, ToxicRejection, DEFAULT_MAX_TERMS,
};
use clap::Subcommand;

/// Summary length used by `analyze` when no configuration is available.
const FALLBACK_SUMMARY_WORDS: usize = 15;

/// Sub-commands available under `feedback`.
#[derive(Debug, Subcommand)]
pub enum FeedbackCommands {
    /// Moderate and store a piece of feedback
    Submit {
        /// Amendment the feedback is about
        #[arg(long)]
        amendment_id: i64,
        /// Feedback text
        #[arg(long)]
        text: String,
        /// Run moderation but do not store the result
        #[arg(long)]
        dry_run: bool,
    },
    /// List stored feedback for an amendment, newest first
    List {
        #[arg(long)]
        amendment_id: i64,
        /// Maximum number of rows to show
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Show the sentiment breakdown and top terms for an amendment
    Insights {
        #[arg(long)]
        amendment_id: i64,
        /// Number of word-cloud terms to show
        #[arg(long, default_value = "20")]
        terms: usize,
    },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    command: FeedbackCommands,
) -> anyhow::Result<()> {
    match command {
        FeedbackCommands::Submit {
            amendment_id,
            text,
            dry_run,
        } => run_submit(pool, config, amendment_id, text, dry_run).await,
        FeedbackCommands::List {
            amendment_id,
            limit,
        } => run_list(pool, amendment_id, limit).await,
        FeedbackCommands::Insights {
            amendment_id,
            terms,
        } => run_insights(pool, amendment_id, terms).await,
    }
}

async fn run_submit(
    pool: &sqlx::PgPool,
    config: &AppConfig,
    amendment_id: i64,
    text: String,
    dry_run: bool,
) -> anyhow::Result<()> {
    let pg_store = Arc::new(afs_db::PgStore::new(pool.clone()));
    let store: Arc<dyn FeedbackStore> = if dry_run {
        Arc::new(MemoryStore::with_amendments([amendment_id]))
    } else {
        pg_store.clone()
    };

    let pipeline = ModerationPipeline::new(
        Classifiers::from_app_config(config)?,
        pg_store,
        store,
        ModerationConfig::from_app_config(config),
    );

    let outcome = pipeline
        .process_feedback(&FeedbackSubmission {
            amendment_id,
            original_text: text,
        })
        .await?;

    match outcome {
        FeedbackOutcome::Accepted(accepted) => {
            let verb = if dry_run { "would accept" } else { "accepted" };
            println!(
                "{verb} feedback{}: sentiment={} ({:.2}) toxic_score={:.3}",
                if dry_run {
                    String::new()
                } else {
                    format!(" {}", accepted.id)
                },
                accepted.sentiment,
                accepted.sentiment_confidence,
                accepted.toxic_score
            );
            println!("summary: {}", accepted.summary);
        }
        FeedbackOutcome::Rejected(rejection) => {
            println!(
                "rejected: {} (toxic_score={:.3})",
                ToxicRejection::MESSAGE,
                rejection.toxic_score
            );
        }
        FeedbackOutcome::Invalid(failure) => anyhow::bail!("invalid feedback: {failure}"),
    }
    Ok(())
}

async fn run_list(pool: &sqlx::PgPool, amendment_id: i64, limit: i64) -> anyhow::Result<()> {
    let rows = afs_db::list_feedback_for_amendment(pool, amendment_id, limit.clamp(1, 200)).await?;
    if rows.is_empty() {
        println!("no feedback found for amendment {amendment_id}");
        return Ok(());
    }

    println!("{:<8}{:<18}{:<10}{:<7}SUMMARY", "ID", "CREATED", "SENTIMENT", "CONF");
    for row in rows {
        let stored = row.into_stored()?;
        let created = stored.created_at.format("%Y-%m-%d %H:%M").to_string();
        println!(
            "{:<8}{:<18}{:<10}{:<7.2}{}",
            stored.id, created, stored.sentiment, stored.sentiment_confidence, stored.summary
        );
    }
    Ok(())
}

async fn run_insights(pool: &sqlx::PgPool, amendment_id: i64, terms: usize) -> anyhow::Result<()> {
    afs_db::get_amendment(pool, amendment_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("amendment {amendment_id} not found"))?;

    let counts = afs_db::sentiment_counts(pool, amendment_id).await?;
    let mut pairs = Vec::with_capacity(counts.len());
    for row in counts {
        pairs.push((
            SentimentLabel::from_str(&row.sentiment)?,
            u64::try_from(row.count)?,
        ));
    }
    let breakdown = SentimentBreakdown::from_counts(pairs);

    println!("amendment {amendment_id}: {} feedback", breakdown.total);
    print_breakdown(&breakdown);

    let texts = afs_db::list_feedback_texts(pool, amendment_id).await?;
    let cloud = word_cloud(texts.iter().map(String::as_str), terms.min(DEFAULT_MAX_TERMS));
    print_terms(&cloud);
    Ok(())
}

fn print_breakdown(breakdown: &SentimentBreakdown) {
    for label in SentimentLabel::ALL {
        println!(
            "  {:<10}{:>6}{:>9.2}%",
            label.as_str(),
            breakdown.counts.get(&label).copied().unwrap_or(0),
            breakdown.percentages.get(&label).copied().unwrap_or(0.0)
        );
    }
}

fn print_terms(terms: &[TermCount]) {
    if terms.is_empty() {
        return;
    }
    println!("top terms:");
    for term in terms {
        println!("  {:<20}{}", term.term, term.count);
    }
}

/// Classifiers and moderation settings from configuration, or the lexicon
/// and defaults when no configuration is available.
fn configured_classifiers() -> anyhow::Result<(Classifiers, ModerationConfig)> {
    match afs_core::load_app_config() {
        Ok(config) => Ok((
            Classifiers::from_app_config(&config)?,
            ModerationConfig::from_app_config(&config),
        )),
        Err(e) => {
            tracing::warn!(error = %e, "configuration unavailable; using lexicon classifiers");
            Ok((
                Classifiers::lexicon(FALLBACK_SUMMARY_WORDS),
                ModerationConfig::default(),
            ))
        }
    }
}

/// Classify one text.
pub(crate) async fn run_analyze(text: &str) -> anyhow::Result<()> {
    let (classifiers, moderation) = configured_classifiers()?;

    let score = classifiers.toxicity.score(text).await?;
    let assessment = moderation.policy.assess(score);
    println!("backend:   {}", classifiers.backend());
    println!(
        "toxicity:  {:.3} ({})",
        assessment.score,
        if assessment.is_toxic { "toxic" } else { "ok" }
    );
    if assessment.is_toxic {
        return Ok(());
    }

    let sentiment = classifiers.sentiment.classify(text).await?;
    let summary = classifiers.summarizer.summarize(text).await?;
    println!(
        "sentiment: {} ({:.2})",
        sentiment.label, sentiment.confidence
    );
    println!("summary:   {summary}");
    Ok(())
}

/// Classify and summarize every row of a CSV file with a `comment` or
/// `feedback` column, then print the aggregates.
pub(crate) async fn run_analyze_csv(path: &Path, terms: usize) -> anyhow::Result<()> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("cannot open {}: {e}", path.display()))?;
    let comments = read_comments(file)?;
    let (classifiers, moderation) = configured_classifiers()?;

    let analysis = analyze_comments(&classifiers, comments, moderation.call_timeout).await?;

    println!("backend: {}", classifiers.backend());
    println!("{:<10}{:<7}SUMMARY", "SENTIMENT", "CONF");
    for row in &analysis.results {
        println!(
            "{:<10}{:<7.2}{}",
            row.sentiment, row.confidence, row.summary
        );
    }
    println!("{} comments", analysis.total_comments);
    print_breakdown(&analysis.sentiment);

    let shown = terms.min(analysis.word_cloud.len());
    print_terms(&analysis.word_cloud[..shown]);
    Ok(())
}

mod amendments;
mod feedback;

use std::path::PathBuf;

use afs_core::AppConfig;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::amendments::AmendmentCommands;
use crate::feedback::FeedbackCommands;

#[derive(Debug, Parser)]
#[command(name = "afs-cli")]
#[command(about = "Amendment feedback system command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Create and list amendments
    Amendments {
        #[command(subcommand)]
        command: AmendmentCommands,
    },
    /// Submit, list and summarize feedback
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },
    /// Run the classifiers on a text or a CSV file without storing anything
    Analyze {
        /// Text to analyze
        #[arg(long, conflicts_with = "csv", required_unless_present = "csv")]
        text: Option<String>,
        /// CSV file with a `comment` or `feedback` column
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Word-cloud terms to print for a CSV file
        #[arg(long, default_value_t = 20)]
        terms: usize,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("afs-cli: no command given; run with --help for usage");
        return Ok(());
    };

    match command {
        Commands::Analyze { text, csv, terms } => match (text, csv) {
            (_, Some(path)) => feedback::run_analyze_csv(&path, terms).await?,
            (Some(text), None) => feedback::run_analyze(&text).await?,
            (None, None) => anyhow::bail!("analyze needs --text or --csv"),
        },
        Commands::Db { command } => {
            let (_, pool) = connect().await?;
            match command {
                DbCommands::Ping => {
                    afs_db::ping(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = afs_db::run_migrations(&pool).await?;
                    println!("migrations up to date ({applied} newly applied)");
                }
            }
        }
        Commands::Amendments { command } => {
            let (_, pool) = connect().await?;
            amendments::run(&pool, command).await?;
        }
        Commands::Feedback { command } => {
            let (config, pool) = connect().await?;
            feedback::run(&pool, &config, command).await?;
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<(AppConfig, sqlx::PgPool)> {
    let config = afs_core::load_app_config()?;
    let pool_config = afs_db::PoolConfig::from_app_config(&config);
    let pool = afs_db::connect_pool(&config.database_url, pool_config).await?;
    Ok((config, pool))
}

#[cfg(test)]
mod tests;

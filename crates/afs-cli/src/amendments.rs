//! Amendment command handlers for the CLI.

use afs_core::NewAmendment;
use clap::Subcommand;

/// Sub-commands available under `amendments`.
#[derive(Debug, Subcommand)]
pub enum AmendmentCommands {
    /// Create an amendment open for feedback
    Create {
        /// Amendment title (at most 500 characters)
        #[arg(long)]
        title: String,
        /// Amendment description
        #[arg(long)]
        description: String,
    },
    /// List amendments, newest first
    List,
}

pub(crate) async fn run(pool: &sqlx::PgPool, command: AmendmentCommands) -> anyhow::Result<()> {
    match command {
        AmendmentCommands::Create { title, description } => {
            let amendment = NewAmendment { title, description }.validated()?;
            let row = afs_db::insert_amendment(pool, &amendment).await?;
            println!("created amendment {}: {}", row.id, row.title);
        }
        AmendmentCommands::List => {
            let rows = afs_db::list_amendments(pool).await?;
            if rows.is_empty() {
                println!("no amendments found; run `amendments create` first");
                return Ok(());
            }

            println!("{:<8}{:<18}TITLE", "ID", "CREATED");
            for row in &rows {
                let created = row.created_at.format("%Y-%m-%d %H:%M").to_string();
                println!("{:<8}{:<18}{}", row.id, created, row.title);
            }
        }
    }
    Ok(())
}

//! NameHub backfill
//!
//! One-off tool that classifies untagged group names by keyword and assigns
//! the matching category or collection. Runs as a dry run unless `--apply`
//! is given.

mod errors;
mod processor;

use clap::Parser;
use namehub_common::{config::AppConfig, db::DbPool, Repository, VERSION};
use processor::BackfillProcessor;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Write the assignments instead of only reporting them
    #[arg(long)]
    apply: bool,

    /// Maximum number of group names to process
    #[arg(long, default_value_t = 1000)]
    batch_size: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level)),
        )
        .with_target(true)
        .json()
        .init();

    info!("Starting NameHub backfill v{}", VERSION);

    let db = DbPool::new(&config.database).await?;
    let mut processor = BackfillProcessor::new(Repository::new(db), args.batch_size, args.apply);

    let (report, _) = processor.run().await?;

    info!(
        scanned = report.scanned,
        assigned = report.assigned,
        skipped = report.skipped,
        applied = args.apply,
        "Backfill finished"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}

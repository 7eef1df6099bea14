//! litclock-seed - load scraper JSONL output into a dataset
//!
//! **Usage:**
//! ```bash
//! litclock-seed --dataset date --input mek_calendar_search_results.jsonl
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use litclock_common::config::{database_path, resolve_root_folder, ROOT_FOLDER_ENV};
use litclock_common::db::init_database;
use litclock_common::Dataset;
use litclock_seed::{seed_file, DEFAULT_BATCH_SIZE};
use tracing::info;

/// Bulk loader for scraped snippets
#[derive(Parser, Debug)]
#[command(name = "litclock-seed")]
#[command(about = "Load scraped literature snippets into the litclock database")]
#[command(version)]
struct Args {
    /// Target dataset: time or date
    #[arg(short, long, default_value = "time")]
    dataset: Dataset,

    /// Line-delimited JSON file produced by the scrapers
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// Root folder holding litclock.db
    #[arg(short, long, env = "LITCLOCK_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Entries per insert transaction
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), ROOT_FOLDER_ENV);
    let db_path = database_path(&root_folder);
    let pool = init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    info!(
        "Seeding {} dataset from {}",
        args.dataset,
        args.input.display()
    );

    let report = seed_file(&pool, args.dataset, &args.input, args.batch_size)
        .await
        .with_context(|| format!("Seeding from {} failed", args.input.display()))?;

    info!(
        "Seeding completed: {} lines, {} inserted, {} skipped, {} malformed",
        report.lines, report.inserted, report.skipped, report.malformed
    );

    pool.close().await;
    Ok(())
}

//! Database initialization
//!
//! Creates the database file on first run, applies connection pragmas,
//! creates the entry/vote tables of both datasets and runs pending
//! migrations. Safe to call on every startup.

use crate::dataset::{Dataset, DatasetTables};
use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // Foreign keys keep every vote attached to an existing entry
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    // WAL allows concurrent readers while a vote is being written
    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout = 5000")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Single connection without idle expiry: every in-memory connection
/// is its own database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    create_schema(&pool).await?;
    Ok(pool)
}

/// Create tables, run migrations and create indexes (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;

    for dataset in Dataset::ALL {
        let tables = dataset.tables();
        create_entries_table(pool, tables).await?;
        create_votes_table(pool, tables).await?;
    }

    // Legacy tables may lack indexed columns until migrated
    crate::db::migrations::run_migrations(pool).await?;

    for dataset in Dataset::ALL {
        let tables = dataset.tables();
        create_indexes(pool, tables).await?;
        warn_on_legacy_rating_bounds(pool, tables).await?;
    }

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_entries_table(pool: &SqlitePool, tables: &DatasetTables) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {entries} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT,
            link TEXT,
            snippet TEXT,
            is_literature INTEGER NOT NULL DEFAULT 1,
            {valid} TEXT NOT NULL DEFAULT '[]',
            categories TEXT NOT NULL DEFAULT '[]',
            ai_rating INTEGER,
            ai_reason TEXT,
            ai_checked INTEGER NOT NULL DEFAULT 0
        )
        "#,
        entries = tables.entries,
        valid = tables.valid_column,
    );
    sqlx::query(&sql).execute(pool).await?;

    Ok(())
}

async fn create_votes_table(pool: &SqlitePool, tables: &DatasetTables) -> Result<()> {
    let sql = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {votes} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_id INTEGER NOT NULL REFERENCES {entries}(id),
            rating INTEGER NOT NULL CHECK (rating >= 0 AND rating <= 5),
            {class} TEXT,
            {corr} TEXT,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
        votes = tables.votes,
        entries = tables.entries,
        class = tables.class_column,
        corr = tables.corrected_column,
    );
    sqlx::query(&sql).execute(pool).await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool, tables: &DatasetTables) -> Result<()> {
    let statements = [
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{e}_ai_checked ON {e}(ai_checked)",
            e = tables.entries
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{e}_title ON {e}(title)",
            e = tables.entries
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{v}_entry_id ON {v}(entry_id)",
            v = tables.votes
        ),
    ];

    for sql in statements {
        sqlx::query(&sql).execute(pool).await?;
    }

    Ok(())
}

/// Report vote tables created with the historical `rating >= 1` bound
///
/// Such tables reject auto-deny votes. SQLite cannot alter a CHECK
/// constraint in place, so the table is left alone and flagged.
async fn warn_on_legacy_rating_bounds(pool: &SqlitePool, tables: &DatasetTables) -> Result<()> {
    let table_sql: Option<String> =
        sqlx::query_scalar("SELECT sql FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(tables.votes)
            .fetch_optional(pool)
            .await?;

    if let Some(sql) = table_sql {
        let normalized: String = sql.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.contains("rating >= 1") {
            warn!(
                "Table {} still enforces rating >= 1; auto-deny votes (rating 0) will be rejected",
                tables.votes
            );
        }
    }

    Ok(())
}

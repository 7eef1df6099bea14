//! Database schema migrations
//!
//! Brings databases created by older schema variants up to the current
//! layout without dropping data. Migration progress is tracked in the
//! `schema_version` table and every migration is idempotent.
//!
//! # Migration Guidelines
//!
//! 1. **Never modify existing migrations** - databases in the field may be at any version
//! 2. **Always add new migrations** - one function per schema change
//! 3. **Use ALTER TABLE** - prefer ADD COLUMN over rebuilding tables

use crate::dataset::{Dataset, DatasetTables};
use crate::Result;
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding new migrations
pub const CURRENT_SCHEMA_VERSION: i32 = 3;

/// Get current schema version from database
///
/// Returns 0 if schema_version table doesn't exist or has no rows
pub async fn get_schema_version(pool: &SqlitePool) -> Result<i32> {
    if !table_exists(pool, "schema_version").await? {
        return Ok(0);
    }

    let version: Option<i32> =
        sqlx::query_scalar("SELECT version FROM schema_version ORDER BY version DESC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    Ok(version.unwrap_or(0))
}

async fn set_schema_version(pool: &SqlitePool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_version (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;

    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let current_version = get_schema_version(pool).await?;

    if current_version == CURRENT_SCHEMA_VERSION {
        info!("Database schema is up to date (v{})", current_version);
        return Ok(());
    }

    if current_version > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current_version, CURRENT_SCHEMA_VERSION
        );
        return Ok(());
    }

    info!(
        "Running database migrations: v{} -> v{}",
        current_version, CURRENT_SCHEMA_VERSION
    );

    if current_version < 1 {
        migrate_v1(pool).await?;
        set_schema_version(pool, 1).await?;
        info!("✓ Migration v1 completed");
    }

    if current_version < 2 {
        migrate_v2(pool).await?;
        set_schema_version(pool, 2).await?;
        info!("✓ Migration v2 completed");
    }

    if current_version < 3 {
        migrate_v3(pool).await?;
        set_schema_version(pool, 3).await?;
        info!("✓ Migration v3 completed");
    }

    Ok(())
}

/// Migration v1: AI grading columns on entry tables
///
/// The first time-dataset schema had no AI grading support.
async fn migrate_v1(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v1: Add AI grading columns to entry tables");

    for dataset in Dataset::ALL {
        let entries = dataset.tables().entries;
        add_column_if_missing(pool, entries, "ai_checked", "INTEGER NOT NULL DEFAULT 0").await?;
        add_column_if_missing(pool, entries, "ai_rating", "INTEGER").await?;
        add_column_if_missing(pool, entries, "ai_reason", "TEXT").await?;
    }

    Ok(())
}

/// Migration v2: correction column on vote tables
async fn migrate_v2(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v2: Add correction columns to vote tables");

    for dataset in Dataset::ALL {
        let DatasetTables {
            votes,
            corrected_column,
            ..
        } = dataset.tables();
        add_column_if_missing(pool, votes, corrected_column, "TEXT").await?;
    }

    Ok(())
}

/// Migration v3: author column on entry tables
async fn migrate_v3(pool: &SqlitePool) -> Result<()> {
    info!("Running migration v3: Add author column to entry tables");

    for dataset in Dataset::ALL {
        add_column_if_missing(pool, dataset.tables().entries, "author", "TEXT").await?;
    }

    Ok(())
}

async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM sqlite_master
            WHERE type='table' AND name=?
        )
        "#,
    )
    .bind(table)
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Add a column unless the table is missing or already has it
async fn add_column_if_missing(
    pool: &SqlitePool,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<()> {
    if !table_exists(pool, table).await? {
        info!("  {} table doesn't exist yet - skipping", table);
        return Ok(());
    }

    let has_column: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM pragma_table_info(?) WHERE name = ?")
            .bind(table)
            .bind(column)
            .fetch_one(pool)
            .await?;

    if has_column > 0 {
        return Ok(());
    }

    let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, definition);
    match sqlx::query(&sql).execute(pool).await {
        Ok(_) => {
            info!("  ✓ Added {} column to {} table", column, table);
            Ok(())
        }
        Err(sqlx::Error::Database(db_err)) if db_err.message().contains("duplicate column") => {
            info!("  {} column added concurrently - skipping", column);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

//! Title-level review of scraped books
//!
//! A title with hundreds of entries usually means a mis-scraped source
//! (dictionary, timetable, index). Operators list such titles, look at a
//! random sample and delete the whole title when it is junk.

use litclock_common::db::Entry;
use litclock_common::{Dataset, Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::info;

/// Default minimum entry count for a suspect title
pub const DEFAULT_SUSPECT_THRESHOLD: i64 = 50;

/// Default and maximum sample size
pub const DEFAULT_SAMPLE_LIMIT: i64 = 50;
pub const MAX_SAMPLE_LIMIT: i64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TitleCount {
    pub title: String,
    pub entry_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub deleted_entries: u64,
    pub deleted_votes: u64,
}

/// Titles of literature entries with more than `threshold` entries
///
/// Ordered by count descending, then title ascending. Negative
/// thresholds are treated as zero.
pub async fn list_suspect_titles(
    pool: &SqlitePool,
    dataset: Dataset,
    threshold: i64,
) -> Result<Vec<TitleCount>> {
    let sql = format!(
        r#"
        SELECT title, COUNT(*) AS entry_count
        FROM {entries}
        WHERE COALESCE(is_literature, 0) = 1
          AND title IS NOT NULL
          AND title <> ''
        GROUP BY title
        HAVING COUNT(*) > ?
        ORDER BY COUNT(*) DESC, title ASC
        "#,
        entries = dataset.tables().entries
    );

    let rows = sqlx::query_as(&sql)
        .bind(threshold.max(0))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Clamp a requested sample size into `1..=MAX_SAMPLE_LIMIT`
pub fn clamp_sample_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_SAMPLE_LIMIT)
        .clamp(1, MAX_SAMPLE_LIMIT)
}

/// Up to `limit` random entries with exactly this title
pub async fn sample_by_title(
    pool: &SqlitePool,
    dataset: Dataset,
    title: &str,
    limit: i64,
) -> Result<Vec<Entry>> {
    let t = dataset.tables();
    let sql = format!(
        "SELECT {} FROM {} e WHERE e.title = ? ORDER BY RANDOM() LIMIT ?",
        Entry::select_columns(t),
        t.entries
    );

    let rows = sqlx::query_as(&sql)
        .bind(title)
        .bind(limit.clamp(1, MAX_SAMPLE_LIMIT))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Delete every entry with exactly this title, votes first
///
/// Runs in one transaction. Matching no title is not an error.
pub async fn delete_by_title(pool: &SqlitePool, dataset: Dataset, title: &str) -> Result<DeleteSummary> {
    if title.is_empty() {
        return Err(Error::InvalidInput("Missing title".to_string()));
    }

    let t = dataset.tables();
    let mut tx = pool.begin().await?;

    let votes = sqlx::query(&format!(
        "DELETE FROM {votes} WHERE entry_id IN (SELECT id FROM {entries} WHERE title = ?)",
        votes = t.votes,
        entries = t.entries
    ))
    .bind(title)
    .execute(&mut *tx)
    .await?;

    let entries = sqlx::query(&format!("DELETE FROM {} WHERE title = ?", t.entries))
        .bind(title)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let summary = DeleteSummary {
        deleted_entries: entries.rows_affected(),
        deleted_votes: votes.rows_affected(),
    };

    if summary.deleted_entries > 0 {
        info!(
            "Deleted title {:?} from {}: {} entries, {} votes",
            title, dataset, summary.deleted_entries, summary.deleted_votes
        );
    }

    Ok(summary)
}

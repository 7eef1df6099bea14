//! Random entry sampling
//!
//! Candidates are drawn by counting the filtered set and fetching one row
//! at an offset chosen in the application, instead of shuffling the whole
//! table with `ORDER BY RANDOM()`. The anti-join against the votes table
//! is served by the `entry_id` index.

use litclock_common::db::Entry;
use litclock_common::{DatasetConfig, Result};
use rand::Rng;
use sqlx::SqlitePool;

/// Filter for literature entries nobody has voted on yet
fn unvoted_filter(cfg: &DatasetConfig) -> String {
    let t = cfg.tables();
    let ai = if cfg.ai_checking {
        " AND COALESCE(e.ai_checked, 0) = 1"
    } else {
        ""
    };
    format!(
        "COALESCE(e.is_literature, 0) = 1{ai} \
         AND NOT EXISTS (SELECT 1 FROM {votes} v WHERE v.entry_id = e.id)",
        ai = ai,
        votes = t.votes,
    )
}

/// Filter for AI-denied entries still awaiting human review
fn regrade_filter(cfg: &DatasetConfig) -> String {
    format!(
        "COALESCE(e.is_literature, 0) = 1 AND COALESCE(e.ai_checked, 0) = 1 AND {}",
        cfg.resolved_denied_sql()
    )
}

/// Draw one entry uniformly at random from the filtered set
async fn sample_one<R: Rng + Send>(
    pool: &SqlitePool,
    cfg: &DatasetConfig,
    filter: &str,
    rng: &mut R,
) -> Result<Option<Entry>> {
    let t = cfg.tables();

    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} e WHERE {}",
        t.entries, filter
    ))
    .fetch_one(pool)
    .await?;

    if count == 0 {
        return Ok(None);
    }

    let sql = format!(
        "SELECT {} FROM {} e WHERE {} ORDER BY e.id LIMIT 1 OFFSET ?",
        Entry::select_columns(t),
        t.entries,
        filter
    );

    let offset = rng.gen_range(0..count);
    let picked: Option<Entry> = sqlx::query_as(&sql)
        .bind(offset)
        .fetch_optional(pool)
        .await?;

    if picked.is_some() {
        return Ok(picked);
    }

    // Set shrank between count and fetch (concurrent votes)
    let first = sqlx::query_as(&sql).bind(0_i64).fetch_optional(pool).await?;
    Ok(first)
}

/// Random literature entry without any vote
pub async fn sample_unvoted<R: Rng + Send>(
    pool: &SqlitePool,
    cfg: &DatasetConfig,
    rng: &mut R,
) -> Result<Option<Entry>> {
    sample_one(pool, cfg, &unvoted_filter(cfg), rng).await
}

/// Random AI-denied entry with no contradicting human correction
pub async fn sample_regrade_candidate<R: Rng + Send>(
    pool: &SqlitePool,
    cfg: &DatasetConfig,
    rng: &mut R,
) -> Result<Option<Entry>> {
    sample_one(pool, cfg, &regrade_filter(cfg), rng).await
}


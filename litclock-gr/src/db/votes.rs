//! Vote recording
//!
//! Votes are append-only. Rating bounds and the entry reference are
//! enforced by the table constraints, not here.

use litclock_common::db::Vote;
use litclock_common::{Dataset, Result};
use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

/// A vote to append
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVote {
    pub entry_id: i64,
    pub rating: i64,
    pub classification: String,
    pub corrected_value: Option<String>,
}

impl NewVote {
    /// Synthetic rejection of an unratable entry
    pub fn auto_deny(entry_id: i64) -> Self {
        Self {
            entry_id,
            rating: 0,
            classification: litclock_common::dataset::AMBIGUOUS.to_string(),
            corrected_value: None,
        }
    }

    /// Rejection issued by the AI grader
    pub fn ai_deny(entry_id: i64) -> Self {
        Self {
            corrected_value: Some(litclock_common::dataset::AI_DENY.to_string()),
            ..Self::auto_deny(entry_id)
        }
    }
}

/// Append a vote and return its id
///
/// Generic over the executor so callers can record inside a transaction.
pub async fn record_vote<'e, E>(executor: E, dataset: Dataset, vote: &NewVote) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let t = dataset.tables();
    let sql = format!(
        "INSERT INTO {votes} (entry_id, rating, {class}, {corr}) VALUES (?, ?, ?, ?)",
        votes = t.votes,
        class = t.class_column,
        corr = t.corrected_column,
    );

    let result = sqlx::query(&sql)
        .bind(vote.entry_id)
        .bind(vote.rating)
        .bind(&vote.classification)
        .bind(&vote.corrected_value)
        .execute(executor)
        .await?;

    let id = result.last_insert_rowid();
    debug!(
        "Recorded {} vote {} for entry {} (rating {})",
        dataset, id, vote.entry_id, vote.rating
    );
    Ok(id)
}

/// All votes of one entry, oldest first
pub async fn votes_for_entry(pool: &SqlitePool, dataset: Dataset, entry_id: i64) -> Result<Vec<Vote>> {
    let t = dataset.tables();
    let sql = format!(
        "SELECT {} FROM {} v WHERE v.entry_id = ? ORDER BY v.id",
        Vote::select_columns(t),
        t.votes
    );

    let votes = sqlx::query_as(&sql).bind(entry_id).fetch_all(pool).await?;
    Ok(votes)
}

//! AI grader intake
//!
//! The language-model grader runs outside this service. It pulls batches of
//! unchecked entries and posts back KEEP/DENY verdicts; this module stores
//! them.

use litclock_common::dataset::AI_DENY;
use litclock_common::db::Entry;
use litclock_common::{Dataset, Result};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::votes::{record_vote, NewVote};

pub const DEFAULT_UNCHECKED_LIMIT: i64 = 50;
pub const MAX_UNCHECKED_LIMIT: i64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictStatus {
    Keep,
    Deny,
}

/// One grader decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    #[serde(alias = "id")]
    pub entry_id: i64,
    pub status: VerdictStatus,
    /// Quality 0-5 as judged by the grader
    #[serde(default, alias = "rate")]
    pub rating: Option<i64>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictSummary {
    pub checked: u64,
    pub denied: u64,
    pub skipped: u64,
}

/// Literature entries the AI grader has not looked at, lowest id first
pub async fn unchecked_entries(pool: &SqlitePool, dataset: Dataset, limit: i64) -> Result<Vec<Entry>> {
    let t = dataset.tables();
    let sql = format!(
        "SELECT {} FROM {} e \
         WHERE COALESCE(e.ai_checked, 0) = 0 AND COALESCE(e.is_literature, 0) = 1 \
         ORDER BY e.id LIMIT ?",
        Entry::select_columns(t),
        t.entries
    );

    let rows = sqlx::query_as(&sql)
        .bind(limit.clamp(1, MAX_UNCHECKED_LIMIT))
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Store a batch of verdicts in one transaction
///
/// Earlier AI_DENY votes of each entry are replaced, so re-grading an
/// entry never stacks denials. Verdicts for unknown entries are skipped.
pub async fn apply_verdicts(
    pool: &SqlitePool,
    dataset: Dataset,
    verdicts: &[Verdict],
) -> Result<VerdictSummary> {
    let t = dataset.tables();
    let exists_sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", t.entries);
    let clear_sql = format!(
        "DELETE FROM {} WHERE entry_id = ? AND {} = '{}'",
        t.votes, t.corrected_column, AI_DENY
    );
    let mark_sql = format!(
        "UPDATE {} SET ai_checked = 1, ai_rating = ?, ai_reason = ? WHERE id = ?",
        t.entries
    );

    let mut summary = VerdictSummary::default();
    let mut tx = pool.begin().await?;

    for verdict in verdicts {
        let exists: bool = sqlx::query_scalar(&exists_sql)
            .bind(verdict.entry_id)
            .fetch_one(&mut *tx)
            .await?;
        if !exists {
            warn!("Verdict for unknown {} entry {} skipped", dataset, verdict.entry_id);
            summary.skipped += 1;
            continue;
        }

        sqlx::query(&clear_sql)
            .bind(verdict.entry_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(&mark_sql)
            .bind(verdict.rating)
            .bind(&verdict.reason)
            .bind(verdict.entry_id)
            .execute(&mut *tx)
            .await?;

        if verdict.status == VerdictStatus::Deny {
            record_vote(&mut *tx, dataset, &NewVote::ai_deny(verdict.entry_id)).await?;
            summary.denied += 1;
        }
        summary.checked += 1;
    }

    tx.commit().await?;

    info!(
        "Applied {} verdicts to {}: {} denied, {} skipped",
        summary.checked, dataset, summary.denied, summary.skipped
    );
    Ok(summary)
}

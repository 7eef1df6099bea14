//! Rating statistics

use litclock_common::dataset::AI_DENY;
use litclock_common::{DatasetConfig, Result};
use serde::Serialize;
use sqlx::SqlitePool;

/// Aggregate counts for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_entries: i64,
    pub voted_entries: i64,
    pub average_rating: f64,
}

/// Compute stats over literature entries
///
/// With AI checking active, resolved-denied entries are left out of all
/// three numbers. Only genuine votes (rating above zero, not an AI_DENY
/// correction) count as voted or enter the average.
pub async fn get_stats(pool: &SqlitePool, cfg: &DatasetConfig) -> Result<Stats> {
    let t = cfg.tables();

    let keep = if cfg.ai_checking {
        format!(" AND NOT {}", cfg.resolved_denied_sql())
    } else {
        String::new()
    };

    let genuine = format!(
        "v.rating > 0 AND (v.{corr} IS NULL OR v.{corr} <> '{deny}')",
        corr = t.corrected_column,
        deny = AI_DENY,
    );

    let sql = format!(
        r#"
        SELECT
            (SELECT COUNT(*) FROM {entries} e
             WHERE COALESCE(e.is_literature, 0) = 1{keep}) AS total_entries,
            (SELECT COUNT(DISTINCT e.id) FROM {entries} e
             JOIN {votes} v ON v.entry_id = e.id
             WHERE COALESCE(e.is_literature, 0) = 1 AND {genuine}{keep}) AS voted_entries,
            (SELECT AVG(v.rating) FROM {entries} e
             JOIN {votes} v ON v.entry_id = e.id
             WHERE COALESCE(e.is_literature, 0) = 1 AND {genuine}{keep}) AS average_rating
        "#,
        entries = t.entries,
        votes = t.votes,
        genuine = genuine,
        keep = keep,
    );

    let (total, voted, average): (Option<i64>, Option<i64>, Option<f64>) =
        sqlx::query_as(&sql).fetch_one(pool).await?;

    Ok(Stats {
        total_entries: total.unwrap_or(0),
        voted_entries: voted.unwrap_or(0),
        average_rating: average.filter(|a| a.is_finite()).unwrap_or(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::votes::{record_vote, NewVote};
    use litclock_common::db::{init_memory_database, insert_entries, NewEntry};
    use litclock_common::Dataset;

    fn entry(title: &str, is_literature: bool) -> NewEntry {
        NewEntry {
            title: title.to_string(),
            snippet: "délután négykor".to_string(),
            is_literature,
            ..Default::default()
        }
    }

    fn vote(entry_id: i64, rating: i64, corrected: Option<&str>) -> NewVote {
        NewVote {
            entry_id,
            rating,
            classification: "pm".to_string(),
            corrected_value: corrected.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_empty_dataset_is_all_zero() {
        let pool = init_memory_database().await.unwrap();
        let stats = get_stats(&pool, &DatasetConfig::new(Dataset::Time, true))
            .await
            .unwrap();
        assert_eq!(
            stats,
            Stats {
                total_entries: 0,
                voted_entries: 0,
                average_rating: 0.0
            }
        );
    }

    #[tokio::test]
    async fn test_genuine_votes_only() {
        let pool = init_memory_database().await.unwrap();
        let ids = insert_entries(
            &pool,
            Dataset::Time,
            &[entry("A", true), entry("B", true), entry("C", true), entry("D", false)],
        )
        .await
        .unwrap();

        record_vote(&pool, Dataset::Time, &vote(ids[0], 4, None)).await.unwrap();
        record_vote(&pool, Dataset::Time, &vote(ids[0], 2, None)).await.unwrap();
        // auto-deny does not count as voted
        record_vote(&pool, Dataset::Time, &NewVote::auto_deny(ids[1])).await.unwrap();
        // non-literature entries are ignored entirely
        record_vote(&pool, Dataset::Time, &vote(ids[3], 5, None)).await.unwrap();

        let stats = get_stats(&pool, &DatasetConfig::new(Dataset::Time, true))
            .await
            .unwrap();
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.voted_entries, 1);
        assert!((stats.average_rating - 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_resolved_denied_entries_excluded() {
        let pool = init_memory_database().await.unwrap();
        let ids = insert_entries(
            &pool,
            Dataset::Time,
            &[entry("Denied", true), entry("Overruled", true), entry("Kept", true)],
        )
        .await
        .unwrap();

        record_vote(&pool, Dataset::Time, &NewVote::ai_deny(ids[0])).await.unwrap();

        // a human correction overrules the AI denial
        record_vote(&pool, Dataset::Time, &NewVote::ai_deny(ids[1])).await.unwrap();
        record_vote(&pool, Dataset::Time, &vote(ids[1], 5, Some("17:00"))).await.unwrap();

        record_vote(&pool, Dataset::Time, &vote(ids[2], 3, None)).await.unwrap();

        let active = get_stats(&pool, &DatasetConfig::new(Dataset::Time, true))
            .await
            .unwrap();
        assert_eq!(active.total_entries, 2);
        assert_eq!(active.voted_entries, 2);
        assert!((active.average_rating - 4.0).abs() < 1e-9);

        let plain = get_stats(&pool, &DatasetConfig::new(Dataset::Time, false))
            .await
            .unwrap();
        assert_eq!(plain.total_entries, 3);
        assert_eq!(plain.voted_entries, 2);
    }

    #[tokio::test]
    async fn test_datasets_are_isolated() {
        let pool = init_memory_database().await.unwrap();
        let ids = insert_entries(&pool, Dataset::Date, &[entry("Naptár", true)])
            .await
            .unwrap();
        record_vote(&pool, Dataset::Date, &vote(ids[0], 5, None)).await.unwrap();

        let time = get_stats(&pool, &DatasetConfig::new(Dataset::Time, true))
            .await
            .unwrap();
        assert_eq!(time.total_entries, 0);

        let date = get_stats(&pool, &DatasetConfig::new(Dataset::Date, true))
            .await
            .unwrap();
        assert_eq!(date.total_entries, 1);
        assert_eq!(date.voted_entries, 1);
    }
}

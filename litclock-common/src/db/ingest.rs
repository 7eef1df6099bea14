//! Entry ingestion
//!
//! Bulk insert of scraped entries. Used by the seeding tool and by tests
//! that need a populated dataset.

use crate::dataset::Dataset;
use crate::db::models::NewEntry;
use crate::Result;
use sqlx::types::Json;
use sqlx::SqlitePool;
use tracing::debug;

/// Insert a batch of entries in one transaction, returning the new ids
pub async fn insert_entries(
    pool: &SqlitePool,
    dataset: Dataset,
    batch: &[NewEntry],
) -> Result<Vec<i64>> {
    let tables = dataset.tables();
    let sql = format!(
        "INSERT INTO {entries} (title, author, link, snippet, is_literature, {valid}, categories) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        entries = tables.entries,
        valid = tables.valid_column,
    );

    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(batch.len());

    for entry in batch {
        let result = sqlx::query(&sql)
            .bind(&entry.title)
            .bind(&entry.author)
            .bind(&entry.link)
            .bind(&entry.snippet)
            .bind(entry.is_literature)
            .bind(Json(&entry.valid_classifications))
            .bind(Json(&entry.categories))
            .execute(&mut *tx)
            .await?;
        ids.push(result.last_insert_rowid());
    }

    tx.commit().await?;
    debug!("Inserted {} entries into {}", ids.len(), tables.entries);

    Ok(ids)
}

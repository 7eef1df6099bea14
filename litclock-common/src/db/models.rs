//! Database models

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dataset::DatasetTables;

/// A candidate text snippet to be rated
///
/// `valid_classifications` maps to `valid_times` or `valid_dates`
/// depending on the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub link: Option<String>,
    pub snippet: Option<String>,
    pub is_literature: bool,
    #[sqlx(json)]
    pub valid_classifications: Vec<String>,
    #[sqlx(json)]
    pub categories: Vec<String>,
    pub ai_checked: bool,
    pub ai_rating: Option<i64>,
    pub ai_reason: Option<String>,
}

impl Entry {
    /// Column list selecting an [`Entry`] from entry alias `e`
    pub fn select_columns(tables: &DatasetTables) -> String {
        format!(
            "e.id, e.title, e.author, e.link, e.snippet, \
             COALESCE(e.is_literature, 0) AS is_literature, \
             COALESCE(e.{valid}, '[]') AS valid_classifications, \
             COALESCE(e.categories, '[]') AS categories, \
             COALESCE(e.ai_checked, 0) AS ai_checked, \
             e.ai_rating, e.ai_reason",
            valid = tables.valid_column
        )
    }
}

/// A recorded judgment against an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vote {
    pub id: i64,
    pub entry_id: i64,
    pub rating: i64,
    pub classification: Option<String>,
    pub corrected_value: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Vote {
    /// Column list selecting a [`Vote`] from vote alias `v`
    pub fn select_columns(tables: &DatasetTables) -> String {
        format!(
            "v.id, v.entry_id, v.rating, v.{class} AS classification, \
             v.{corr} AS corrected_value, v.created_at",
            class = tables.class_column,
            corr = tables.corrected_column
        )
    }
}

/// Entry fields supplied at ingestion time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub author: Option<String>,
    pub link: Option<String>,
    pub snippet: String,
    pub is_literature: bool,
    pub valid_classifications: Vec<String>,
    pub categories: Vec<String>,
}

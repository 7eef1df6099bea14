//! Dataset descriptors
//!
//! The "time" and "date" datasets share one schema shape but live in
//! separate tables with dataset-specific column names. Every query in the
//! workspace is built from a [`DatasetConfig`] so the two datasets never
//! need separately coded logic and are never joined.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Correction sentinel marking a confirmed AI rejection
pub const AI_DENY: &str = "AI_DENY";

/// Classification recorded on automatic rejections
pub const AMBIGUOUS: &str = "ambiguous";

/// Dataset discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    /// Snippets mentioning a time of day
    #[default]
    Time,
    /// Snippets mentioning a calendar date
    Date,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Time, Dataset::Date];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Time => "time",
            Dataset::Date => "date",
        }
    }

    /// Static table and column names for this dataset
    pub fn tables(&self) -> &'static DatasetTables {
        match self {
            Dataset::Time => &TIME_TABLES,
            Dataset::Date => &DATE_TABLES,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "time" => Ok(Dataset::Time),
            "date" => Ok(Dataset::Date),
            other => Err(Error::InvalidInput(format!("Unknown dataset: {}", other))),
        }
    }
}

/// Table and column identifiers of one dataset
///
/// Only ever built from the constants below; the names are interpolated
/// into SQL text and must never come from user input.
#[derive(Debug, PartialEq, Eq)]
pub struct DatasetTables {
    pub entries: &'static str,
    pub votes: &'static str,
    /// JSON array of the times/dates the scraper matched in the snippet
    pub valid_column: &'static str,
    /// Vote classification (`am_pm` / `date_class`)
    pub class_column: &'static str,
    /// Vote correction (`corrected_time` / `corrected_date`)
    pub corrected_column: &'static str,
}

static TIME_TABLES: DatasetTables = DatasetTables {
    entries: "entries",
    votes: "votes",
    valid_column: "valid_times",
    class_column: "am_pm",
    corrected_column: "corrected_time",
};

static DATE_TABLES: DatasetTables = DatasetTables {
    entries: "calendar_entries",
    votes: "calendar_votes",
    valid_column: "valid_dates",
    class_column: "date_class",
    corrected_column: "corrected_date",
};

/// Per-dataset runtime configuration passed into every store operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetConfig {
    pub dataset: Dataset,
    /// When false, selection and stats ignore `ai_checked` and AI denials
    pub ai_checking: bool,
}

impl DatasetConfig {
    pub fn new(dataset: Dataset, ai_checking: bool) -> Self {
        Self {
            dataset,
            ai_checking,
        }
    }

    pub fn tables(&self) -> &'static DatasetTables {
        self.dataset.tables()
    }

    /// SQL predicate true when entry alias `e` is resolved-denied
    ///
    /// Resolved-denied: an AI_DENY vote exists and no vote carries a
    /// different correction.
    pub fn resolved_denied_sql(&self) -> String {
        let t = self.tables();
        format!(
            "(EXISTS (SELECT 1 FROM {votes} d WHERE d.entry_id = e.id AND d.{corr} = '{deny}') \
             AND NOT EXISTS (SELECT 1 FROM {votes} c WHERE c.entry_id = e.id \
             AND c.{corr} IS NOT NULL AND c.{corr} <> '{deny}'))",
            votes = t.votes,
            corr = t.corrected_column,
            deny = AI_DENY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        assert_eq!("time".parse::<Dataset>().unwrap(), Dataset::Time);
        assert_eq!(" Date ".parse::<Dataset>().unwrap(), Dataset::Date);
        assert!(matches!(
            "calendar".parse::<Dataset>(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_datasets_never_share_tables() {
        let time = Dataset::Time.tables();
        let date = Dataset::Date.tables();
        assert_ne!(time.entries, date.entries);
        assert_ne!(time.votes, date.votes);
        assert_eq!(time.class_column, "am_pm");
        assert_eq!(date.corrected_column, "corrected_date");
    }

    #[test]
    fn test_resolved_denied_sql_uses_dataset_columns() {
        let sql = DatasetConfig::new(Dataset::Date, true).resolved_denied_sql();
        assert!(sql.contains("calendar_votes"));
        assert!(sql.contains("corrected_date"));
        assert!(!sql.contains("corrected_time"));
    }
}

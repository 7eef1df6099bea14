//! litclock-seed library - bulk loading of scraper output
//!
//! Input is line-delimited JSON, one scraped hit per line. Blank lines,
//! summary lines (`{"count": ...}`), non-literature hits and hits without a
//! title or snippet are skipped; unparsable lines are logged and skipped
//! without aborting the run.

use litclock_common::db::{insert_entries, NewEntry};
use litclock_common::{Dataset, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// Default number of entries per insert transaction
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// One scraped hit as written by the scrapers
#[derive(Debug, Deserialize)]
struct ScrapedRecord {
    title: Option<String>,
    author: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
    #[serde(default)]
    is_literature: bool,
    valid_times: Option<Vec<String>>,
    valid_dates: Option<Vec<String>>,
    #[serde(alias = "categories")]
    topics: Option<Vec<String>>,
    count: Option<serde_json::Value>,
}

/// Why a well-formed line was not loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Blank,
    Summary,
    NotLiterature,
    MissingField,
}

#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    Entry(NewEntry),
    Skipped(SkipReason),
}

/// Totals of one seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub lines: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub malformed: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Interpret one input line for a dataset
pub fn parse_line(line: &str, dataset: Dataset) -> std::result::Result<LineOutcome, serde_json::Error> {
    if line.trim().is_empty() {
        return Ok(LineOutcome::Skipped(SkipReason::Blank));
    }

    let record: ScrapedRecord = serde_json::from_str(line)?;

    if record.count.is_some() {
        return Ok(LineOutcome::Skipped(SkipReason::Summary));
    }
    if !record.is_literature {
        return Ok(LineOutcome::Skipped(SkipReason::NotLiterature));
    }

    let (Some(title), Some(snippet)) = (non_empty(record.title), non_empty(record.snippet)) else {
        return Ok(LineOutcome::Skipped(SkipReason::MissingField));
    };

    let valid = match dataset {
        Dataset::Time => record.valid_times.or(record.valid_dates),
        Dataset::Date => record.valid_dates.or(record.valid_times),
    };

    Ok(LineOutcome::Entry(NewEntry {
        title,
        author: non_empty(record.author),
        link: non_empty(record.link),
        snippet,
        is_literature: true,
        valid_classifications: valid.unwrap_or_default(),
        categories: record.topics.unwrap_or_default(),
    }))
}

/// Load every line of `reader` into the dataset
pub async fn seed_reader<R>(
    pool: &SqlitePool,
    dataset: Dataset,
    reader: R,
    batch_size: usize,
) -> Result<SeedReport>
where
    R: AsyncBufRead + Unpin,
{
    let batch_size = batch_size.max(1);
    let mut report = SeedReport::default();
    let mut batch = Vec::with_capacity(batch_size);
    let mut reader = reader;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }
        report.lines += 1;

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim_end_matches(['\n', '\r']),
            Err(e) => {
                warn!("Line {}: invalid UTF-8, record skipped: {}", report.lines, e);
                report.malformed += 1;
                continue;
            }
        };

        match parse_line(line, dataset) {
            Ok(LineOutcome::Entry(entry)) => batch.push(entry),
            Ok(LineOutcome::Skipped(SkipReason::Blank)) => {}
            Ok(LineOutcome::Skipped(_)) => report.skipped += 1,
            Err(e) => {
                warn!("Line {}: unparsable record skipped: {}", report.lines, e);
                report.malformed += 1;
            }
        }

        if batch.len() >= batch_size {
            report.inserted += insert_entries(pool, dataset, &batch).await?.len();
            batch.clear();
            info!("Inserted {} {} entries...", report.inserted, dataset);
        }
    }

    if !batch.is_empty() {
        report.inserted += insert_entries(pool, dataset, &batch).await?.len();
    }

    Ok(report)
}

/// Load a JSONL file into the dataset
pub async fn seed_file(
    pool: &SqlitePool,
    dataset: Dataset,
    path: &Path,
    batch_size: usize,
) -> Result<SeedReport> {
    let file = tokio::fs::File::open(path).await?;
    seed_reader(pool, dataset, BufReader::new(file), batch_size).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_time_record() {
        let line = r#"{"title": "Tüskevár", "link": "https://mek.oszk.hu/1", "snippet": "Fél hétkor", "is_literature": true, "valid_times": ["06:30", "18:30"], "topics": ["ifjúsági"]}"#;
        let LineOutcome::Entry(entry) = parse_line(line, Dataset::Time).unwrap() else {
            panic!("expected entry");
        };
        assert_eq!(entry.title, "Tüskevár");
        assert_eq!(entry.valid_classifications, vec!["06:30", "18:30"]);
        assert_eq!(entry.categories, vec!["ifjúsági"]);
        assert_eq!(entry.author, None);
    }

    #[test]
    fn test_parse_date_record_prefers_valid_dates() {
        let line = r#"{"title": "Napló", "snippet": "március 15-én", "is_literature": true, "valid_dates": ["03-15"]}"#;
        let LineOutcome::Entry(entry) = parse_line(line, Dataset::Date).unwrap() else {
            panic!("expected entry");
        };
        assert_eq!(entry.valid_classifications, vec!["03-15"]);
    }

    #[test]
    fn test_skip_reasons() {
        let cases = [
            ("   ", SkipReason::Blank),
            (r#"{"query": "hét óra", "count": 0}"#, SkipReason::Summary),
            (r#"{"title": "Atlasz", "snippet": "7:00", "is_literature": false}"#, SkipReason::NotLiterature),
            (r#"{"title": "Atlasz", "snippet": "7:00"}"#, SkipReason::NotLiterature),
            (r#"{"title": "", "snippet": "hétkor", "is_literature": true}"#, SkipReason::MissingField),
            (r#"{"title": "Regény", "is_literature": true}"#, SkipReason::MissingField),
        ];

        for (line, reason) in cases {
            assert_eq!(
                parse_line(line, Dataset::Time).unwrap(),
                LineOutcome::Skipped(reason),
                "line: {}",
                line
            );
        }
    }

    #[test]
    fn test_malformed_line_is_error() {
        assert!(parse_line("{not json", Dataset::Time).is_err());
    }
}

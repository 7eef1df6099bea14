//! Entry selection with auto-moderation
//!
//! Picks the next entry a rater should see. Occasionally re-presents an
//! AI-denied entry for human review (regrade); otherwise draws random
//! unvoted entries, permanently auto-denying unratable snippets along the
//! way so they are never drawn again.
//!
//! Two concurrent selections may return the same unvoted entry; nothing is
//! reserved.

use litclock_common::config::SelectionConfig;
use litclock_common::db::Entry;
use litclock_common::{Dataset, DatasetConfig, Result};
use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::db::{record_vote, sample_regrade_candidate, sample_unvoted, NewVote};

/// Placeholder text some sources return instead of a snippet
const MISSING_SNIPPET_MARKER: &str = "no snippet is available";

/// Selection knobs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPolicy {
    /// Chance per call of trying the regrade path first
    pub regrade_probability: f64,
    /// Upper bound on unvoted draws per call
    pub max_attempts: u32,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionConfig::default().into()
    }
}

impl From<SelectionConfig> for SelectionPolicy {
    fn from(config: SelectionConfig) -> Self {
        Self {
            regrade_probability: config.regrade_probability,
            max_attempts: config.max_attempts,
        }
    }
}

/// Entry handed to the rater
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    pub is_re_grade: bool,
    pub dataset: Dataset,
}

/// True when a snippet cannot be rated at all
pub fn is_unratable(snippet: Option<&str>) -> bool {
    match snippet {
        None => true,
        Some(s) => s.trim().is_empty() || s.to_lowercase().contains(MISSING_SNIPPET_MARKER),
    }
}

/// Selects ratable entries from one dataset
pub struct Selector<'a> {
    db: &'a SqlitePool,
    dataset: DatasetConfig,
    policy: SelectionPolicy,
}

impl<'a> Selector<'a> {
    pub fn new(db: &'a SqlitePool, dataset: DatasetConfig, policy: SelectionPolicy) -> Self {
        Self {
            db,
            dataset,
            policy,
        }
    }

    /// Return the next entry to rate, or `None` when nothing ratable is left
    ///
    /// Performs at most one regrade draw and `max_attempts` unvoted draws.
    /// Each unratable entry met on the way gets an auto-deny vote.
    pub async fn select_entry<R: Rng + Send>(&self, rng: &mut R) -> Result<Option<SelectedEntry>> {
        if rng.gen::<f64>() < self.policy.regrade_probability {
            if let Some(entry) = sample_regrade_candidate(self.db, &self.dataset, rng).await? {
                debug!("Regrade pick: {} entry {}", self.dataset.dataset, entry.id);
                return Ok(Some(self.wrap(entry, true)));
            }
        }

        for attempt in 1..=self.policy.max_attempts {
            let Some(entry) = sample_unvoted(self.db, &self.dataset, rng).await? else {
                debug!("No unvoted {} entries left", self.dataset.dataset);
                return Ok(None);
            };

            if is_unratable(entry.snippet.as_deref()) {
                record_vote(self.db, self.dataset.dataset, &NewVote::auto_deny(entry.id)).await?;
                info!(
                    "Auto-denied {} entry {} (unratable snippet), attempt {}/{}",
                    self.dataset.dataset, entry.id, attempt, self.policy.max_attempts
                );
                continue;
            }

            return Ok(Some(self.wrap(entry, false)));
        }

        debug!(
            "Gave up after {} attempts on {}",
            self.policy.max_attempts, self.dataset.dataset
        );
        Ok(None)
    }

    fn wrap(&self, entry: Entry, is_re_grade: bool) -> SelectedEntry {
        SelectedEntry {
            entry,
            is_re_grade,
            dataset: self.dataset.dataset,
        }
    }
}

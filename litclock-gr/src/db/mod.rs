//! Store operations for litclock-gr
//!
//! Every function takes the pool (or an executor) and the dataset
//! explicitly; there is no module-level connection.

pub mod entries;
pub mod review;
pub mod stats;
pub mod verdicts;
pub mod votes;

pub use entries::{sample_regrade_candidate, sample_unvoted};
pub use review::{delete_by_title, list_suspect_titles, sample_by_title, DeleteSummary, TitleCount};
pub use stats::{get_stats, Stats};
pub use verdicts::{apply_verdicts, unchecked_entries, Verdict, VerdictStatus, VerdictSummary};
pub use votes::{record_vote, votes_for_entry, NewVote};

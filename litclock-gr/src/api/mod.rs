//! HTTP API handlers for litclock-gr

pub mod ai;
pub mod book_review;
pub mod entries;
pub mod health;
pub mod stats;
pub mod vote;

pub use ai::{list_unchecked, submit_verdicts};
pub use book_review::{delete_book, list_suspect_books, sample_book};
pub use entries::get_entry;
pub use health::health_routes;
pub use stats::get_stats;
pub use vote::submit_vote;

use serde::Deserialize;

/// `?dataset=` query parameter shared by read endpoints
#[derive(Debug, Default, Deserialize)]
pub struct DatasetQuery {
    pub dataset: Option<String>,
}

//! litclock-gr library - Grading service
//!
//! Serves literature snippets to raters, records their votes, reports
//! statistics and supports title-level cleanup of mis-scraped books.

use std::sync::Arc;

use axum::Router;
use litclock_common::config::GraderConfig;
use litclock_common::{Dataset, DatasetConfig};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod selector;

use error::ApiError;
use selector::SelectionPolicy;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service configuration
    pub config: Arc<GraderConfig>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: GraderConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Resolve the `dataset` request parameter (defaults to "time")
    pub fn dataset(&self, raw: Option<&str>) -> Result<DatasetConfig, ApiError> {
        let dataset = match raw {
            None => Dataset::default(),
            Some(s) if s.trim().is_empty() => Dataset::default(),
            Some(s) => s
                .parse::<Dataset>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        };
        Ok(self.config.dataset(dataset))
    }

    pub fn selection_policy(&self) -> SelectionPolicy {
        SelectionPolicy::from(self.config.selection)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let api = Router::new()
        .route("/api/entries", get(api::get_entry))
        .route("/api/vote", post(api::submit_vote))
        .route("/api/stats", get(api::get_stats))
        .route("/api/book-review/books", get(api::list_suspect_books))
        .route("/api/book-review/sample", get(api::sample_book))
        .route("/api/book-review/delete", post(api::delete_book))
        .route("/api/ai/unchecked", get(api::list_unchecked))
        .route("/api/ai/verdicts", post(api::submit_verdicts));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

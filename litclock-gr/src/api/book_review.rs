//! Title review endpoints: suspect titles, samples and bulk delete

use axum::{
    extract::{Query, State},
    Json,
};
use litclock_common::db::Entry;
use litclock_common::Dataset;
use serde::{Deserialize, Serialize};

use crate::db::review::{clamp_sample_limit, DEFAULT_SUSPECT_THRESHOLD};
use crate::db::{self, TitleCount};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BooksQuery {
    pub dataset: Option<String>,
    pub threshold: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct BooksResponse {
    pub dataset: Dataset,
    pub threshold: i64,
    pub books: Vec<TitleCount>,
}

/// GET /api/book-review/books?dataset=&threshold=
///
/// Titles with more than `threshold` literature entries (default 50).
pub async fn list_suspect_books(
    State(state): State<AppState>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<BooksResponse>, ApiError> {
    let dataset = state.dataset(query.dataset.as_deref())?.dataset;
    let threshold = query.threshold.unwrap_or(DEFAULT_SUSPECT_THRESHOLD).max(0);

    let books = db::list_suspect_titles(&state.db, dataset, threshold)
        .await
        .map_err(|e| ApiError::store("Failed to load suspect books", e))?;

    Ok(Json(BooksResponse {
        dataset,
        threshold,
        books,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SampleQuery {
    pub dataset: Option<String>,
    pub title: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SampleResponse {
    pub dataset: Dataset,
    pub title: String,
    pub sample: Vec<Entry>,
}

/// GET /api/book-review/sample?dataset=&title=&limit=
pub async fn sample_book(
    State(state): State<AppState>,
    Query(query): Query<SampleQuery>,
) -> Result<Json<SampleResponse>, ApiError> {
    let dataset = state.dataset(query.dataset.as_deref())?.dataset;
    let title = match query.title {
        Some(t) if !t.is_empty() => t,
        _ => return Err(ApiError::BadRequest("Missing title".to_string())),
    };
    let limit = clamp_sample_limit(query.limit);

    let sample = db::sample_by_title(&state.db, dataset, &title, limit)
        .await
        .map_err(|e| ApiError::store("Failed to load sample", e))?;

    Ok(Json(SampleResponse {
        dataset,
        title,
        sample,
    }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub dataset: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub dataset: Dataset,
    pub title: String,
    pub deleted_entries: u64,
    pub deleted_votes: u64,
}

/// POST /api/book-review/delete
///
/// Removes every entry (and its votes) whose title equals the trimmed
/// `title` exactly.
pub async fn delete_book(
    State(state): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let dataset = state.dataset(request.dataset.as_deref())?.dataset;
    let title = request.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::BadRequest("Missing title".to_string()));
    }

    let summary = db::delete_by_title(&state.db, dataset, title)
        .await
        .map_err(|e| ApiError::store("Failed to delete book entries", e))?;

    Ok(Json(DeleteResponse {
        success: true,
        dataset,
        title: title.to_string(),
        deleted_entries: summary.deleted_entries,
        deleted_votes: summary.deleted_votes,
    }))
}

//! AI grader endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use litclock_common::db::Entry;
use litclock_common::Dataset;
use serde::{Deserialize, Serialize};

use crate::db::verdicts::DEFAULT_UNCHECKED_LIMIT;
use crate::db::{self, Verdict};
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UncheckedQuery {
    pub dataset: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UncheckedResponse {
    pub dataset: Dataset,
    pub entries: Vec<Entry>,
}

/// GET /api/ai/unchecked?dataset=&limit=
pub async fn list_unchecked(
    State(state): State<AppState>,
    Query(query): Query<UncheckedQuery>,
) -> Result<Json<UncheckedResponse>, ApiError> {
    let dataset = state.dataset(query.dataset.as_deref())?.dataset;
    let limit = query.limit.unwrap_or(DEFAULT_UNCHECKED_LIMIT);

    let entries = db::unchecked_entries(&state.db, dataset, limit)
        .await
        .map_err(|e| ApiError::store("Failed to load unchecked entries", e))?;

    Ok(Json(UncheckedResponse { dataset, entries }))
}

#[derive(Debug, Deserialize)]
pub struct VerdictsRequest {
    #[serde(default)]
    pub dataset: Option<String>,
    pub verdicts: Vec<Verdict>,
}

#[derive(Debug, Serialize)]
pub struct VerdictsResponse {
    pub success: bool,
    pub dataset: Dataset,
    pub checked: u64,
    pub denied: u64,
    pub skipped: u64,
}

/// POST /api/ai/verdicts
pub async fn submit_verdicts(
    State(state): State<AppState>,
    Json(request): Json<VerdictsRequest>,
) -> Result<Json<VerdictsResponse>, ApiError> {
    let dataset = state.dataset(request.dataset.as_deref())?.dataset;

    let summary = db::apply_verdicts(&state.db, dataset, &request.verdicts)
        .await
        .map_err(|e| ApiError::store("Failed to store verdicts", e))?;

    Ok(Json(VerdictsResponse {
        success: true,
        dataset,
        checked: summary.checked,
        denied: summary.denied,
        skipped: summary.skipped,
    }))
}

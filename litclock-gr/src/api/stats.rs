//! Statistics endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use super::DatasetQuery;
use crate::db::{self, Stats};
use crate::error::ApiError;
use crate::AppState;

/// GET /api/stats?dataset=time|date
pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<Stats>, ApiError> {
    let dataset = state.dataset(query.dataset.as_deref())?;

    let stats = db::get_stats(&state.db, &dataset)
        .await
        .map_err(|e| ApiError::store("Failed to load stats", e))?;

    Ok(Json(stats))
}

//! Vote submission endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::db::{record_vote, NewVote};
use crate::error::ApiError;
use crate::AppState;

/// Vote body
///
/// Accepts the generic names as well as the dataset-specific column names
/// the rating UI sends (`am_pm`, `corrected_time`, `date_class`,
/// `corrected_date`).
#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub entry_id: i64,
    pub rating: i64,
    #[serde(alias = "am_pm", alias = "date_class")]
    pub classification: String,
    #[serde(default, alias = "corrected_time", alias = "corrected_date")]
    pub corrected_value: Option<String>,
    #[serde(default)]
    pub dataset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub success: bool,
    pub id: i64,
}

/// POST /api/vote
pub async fn submit_vote(
    State(state): State<AppState>,
    Json(request): Json<VoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let dataset = state.dataset(request.dataset.as_deref())?;

    let vote = NewVote {
        entry_id: request.entry_id,
        rating: request.rating,
        classification: request.classification,
        corrected_value: request.corrected_value,
    };

    let id = record_vote(&state.db, dataset.dataset, &vote)
        .await
        .map_err(|e| ApiError::store("Failed to save vote", e))?;

    Ok(Json(VoteResponse { success: true, id }))
}

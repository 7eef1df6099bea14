//! Next-entry endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::DatasetQuery;
use crate::error::ApiError;
use crate::selector::{SelectedEntry, Selector};
use crate::AppState;

/// GET /api/entries?dataset=time|date
///
/// Returns the next entry to rate, or 404 when the dataset has nothing
/// ratable left.
pub async fn get_entry(
    State(state): State<AppState>,
    Query(query): Query<DatasetQuery>,
) -> Result<Json<SelectedEntry>, ApiError> {
    let dataset = state.dataset(query.dataset.as_deref())?;
    let selector = Selector::new(&state.db, dataset, state.selection_policy());
    let mut rng = StdRng::from_entropy();

    selector
        .select_entry(&mut rng)
        .await
        .map_err(|e| ApiError::store("Database connection failed", e))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No entries available".to_string()))
}

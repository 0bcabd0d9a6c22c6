//! Job list API: the form's job picker.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

use super::AppState;
use crate::jobs;

/// GET /api/jobs: always 200; a store failure shows up as `error` with an
/// empty `jobs` array.
pub(super) async fn handler_api_jobs(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let listing = jobs::list_open_jobs(&state.store).await;
    if listing.is_degraded() {
        state.prom_metrics.job_list_failures.inc();
    }
    Json(listing)
}

//! System statistics endpoint

use axum::{Json, extract::State};

use crate::{
    api::{error::ApiResult, state::ApiState, types::StatsResponse},
    probe,
};

/// GET /api/v1/stats
///
/// Returns target counts and the number of live monitoring jobs
pub async fn get_stats(State(state): State<ApiState>) -> ApiResult<Json<StatsResponse>> {
    let targets = state.store.list_all().await?;
    let active_jobs = state.scheduler.active_jobs().await?.len();
    let unreachable = targets
        .iter()
        .filter(|t| t.latest_status == Some(probe::UNREACHABLE))
        .count();

    Ok(Json(StatsResponse {
        timestamp: chrono::Utc::now().to_rfc3339(),
        targets: targets.len(),
        active_jobs,
        unreachable,
    }))
}

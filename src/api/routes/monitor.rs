//! Monitoring lifecycle endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    MonitoredTarget, StatusSample,
    api::{error::ApiResult, state::ApiState},
};

/// POST /api/v1/targets/:id/monitoring
///
/// Begin recurring checks for a target. Returns the last known sample;
/// starting does not run a fresh probe.
pub async fn start_monitoring(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusSample>> {
    let sample = state.scheduler.start_monitoring(&id).await?;

    Ok(Json(sample))
}

/// DELETE /api/v1/targets/:id/monitoring
///
/// Cancel recurring checks and return the updated target record
pub async fn stop_monitoring(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MonitoredTarget>> {
    let target = state.scheduler.stop_monitoring(&id).await?;

    Ok(Json(target))
}

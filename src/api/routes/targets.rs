//! Target management endpoints

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    MonitoredTarget, StatusSample,
    api::{
        error::{ApiError, ApiResult},
        state::ApiState,
        types::{CreateTargetRequest, DeleteResponse, TargetsResponse},
    },
    util,
};

/// GET /api/v1/targets
///
/// List all registered targets, monitored or not
pub async fn list_targets(State(state): State<ApiState>) -> ApiResult<Json<TargetsResponse>> {
    let targets = state.store.list_all().await?;
    let count = targets.len();

    Ok(Json(TargetsResponse { targets, count }))
}

/// POST /api/v1/targets
///
/// Register a new target. The URL is normalized before the duplicate
/// check, and one immediate probe seeds the first status sample.
pub async fn create_target(
    State(state): State<ApiState>,
    Json(request): Json<CreateTargetRequest>,
) -> ApiResult<Json<MonitoredTarget>> {
    let Some(raw_url) = request.url else {
        return Err(ApiError::bad_request("url is required"));
    };
    if raw_url.trim().is_empty() {
        return Err(ApiError::bad_request("url is required"));
    }

    let url = util::normalize_url(&raw_url);
    if state.store.find_by_url(&url).await?.is_some() {
        return Err(ApiError::bad_request(format!("target already exists: {url}")));
    }

    let initial_status = state.prober.check(&url).await;
    let target = MonitoredTarget::new(url, request.title, request.contact_email, initial_status);

    // The unique constraint on the URL backstops the pre-check above.
    state.store.create(&target).await?;

    Ok(Json(target))
}

/// GET /api/v1/targets/:id
///
/// Full target record including its check history
pub async fn get_target(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MonitoredTarget>> {
    let target = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no target with id {id}")))?;

    Ok(Json(target))
}

/// GET /api/v1/targets/:id/status
///
/// Newest recorded status sample for a target
pub async fn get_latest_status(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusSample>> {
    let target = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no target with id {id}")))?;

    let sample = target.latest_sample().cloned().ok_or_else(|| {
        ApiError::not_found(format!("no status recorded yet for {}", target.url))
    })?;

    Ok(Json(sample))
}

/// DELETE /api/v1/targets/:id
///
/// Stop monitoring (if active) and remove the target
pub async fn delete_target(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let message = state.scheduler.delete_target(&id).await?;

    Ok(Json(DeleteResponse { message }))
}

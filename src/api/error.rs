//! Error responses
//!
//! Handlers return domain errors; this module maps them onto HTTP status
//! codes and the `{"error": ...}` JSON envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{error::MonitorError, storage::StoreError};

pub type ApiResult<T> = Result<T, ApiError>;

/// Domain error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(MonitorError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(MonitorError::Validation(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(MonitorError::NotFound(msg.into()))
    }

    fn status(&self) -> StatusCode {
        match &self.0 {
            MonitorError::Validation(_) => StatusCode::BAD_REQUEST,
            MonitorError::NotFound(_) => StatusCode::NOT_FOUND,
            MonitorError::Store(_) | MonitorError::Unavailable(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.0.to_string() }));
        (status, body).into_response()
    }
}

impl From<MonitorError> for ApiError {
    fn from(err: MonitorError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Through the domain mapping, so duplicates surface as 400s.
        Self(MonitorError::from(err))
    }
}

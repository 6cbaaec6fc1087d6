//! Shared API request and response types
//!
//! Target records and status samples serialize with their domain shape
//! from the crate root; the types here only exist for the envelopes
//! around them.

use serde::{Deserialize, Serialize};

use crate::MonitoredTarget;

/// Request body for POST /api/v1/targets
#[derive(Debug, Deserialize)]
pub struct CreateTargetRequest {
    /// URL to monitor; normalized before the duplicate check
    pub url: Option<String>,

    /// Contact for downtime alerts
    pub contact_email: Option<String>,

    /// Human-readable display name
    pub title: Option<String>,
}

/// Response for GET /api/v1/targets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetsResponse {
    pub targets: Vec<MonitoredTarget>,
    pub count: usize,
}

/// Response for DELETE /api/v1/targets/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Response for GET /api/v1/health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub timestamp: String,
}

/// Response for GET /api/v1/stats
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub timestamp: String,
    /// Total number of registered targets
    pub targets: usize,
    /// Targets with a live recurring check
    pub active_jobs: usize,
    /// Targets whose latest probe could not reach them at all
    pub unreachable: usize,
}

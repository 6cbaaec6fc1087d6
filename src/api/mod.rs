//! REST surface of the uptime monitor
//!
//! Everything lives under `/api/v1` and speaks JSON. Lifecycle changes
//! (create, start, stop, delete) go through the scheduler handle so they
//! are serialized with the timers; plain reads hit the store directly.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `GET /api/v1/stats` - System statistics
//! - `GET /api/v1/targets` - List all targets
//! - `POST /api/v1/targets` - Register a new target
//! - `GET /api/v1/targets/{id}` - Full target report with history
//! - `DELETE /api/v1/targets/{id}` - Delete a target
//! - `GET /api/v1/targets/{id}/status` - Latest status sample
//! - `POST /api/v1/targets/{id}/monitoring` - Start recurring checks
//! - `DELETE /api/v1/targets/{id}/monitoring` - Stop recurring checks

pub mod error;
pub mod routes;
pub mod state;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use state::ApiState;
pub use types::{
    CreateTargetRequest, DeleteResponse, HealthResponse, StatsResponse, TargetsResponse,
};

use std::net::SocketAddr;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Address to listen on, `host:port`
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Permissive CORS for browser clients
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

fn default_bind_addr() -> SocketAddr {
    "127.0.0.1:3000".parse().unwrap()
}

fn default_enable_cors() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            enable_cors: default_enable_cors(),
        }
    }
}

fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/health", get(routes::health::health_check))
        .route("/api/v1/stats", get(routes::stats::get_stats))
        .route(
            "/api/v1/targets",
            get(routes::targets::list_targets).post(routes::targets::create_target),
        )
        .route(
            "/api/v1/targets/:id",
            get(routes::targets::get_target).delete(routes::targets::delete_target),
        )
        .route(
            "/api/v1/targets/:id/status",
            get(routes::targets::get_latest_status),
        )
        .route(
            "/api/v1/targets/:id/monitoring",
            post(routes::monitor::start_monitoring).delete(routes::monitor::stop_monitoring),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API in a background task.
///
/// Returns the address actually bound, so callers may pass port 0 and
/// discover the real port.
pub async fn spawn_api_server(config: ApiConfig, state: ApiState) -> anyhow::Result<SocketAddr> {
    use tower_http::cors::{Any, CorsLayer};

    let mut app = router(state);
    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    let addr = listener.local_addr()?;
    info!("api server listening on {}", addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("api server error: {}", e);
        }
    });

    Ok(addr)
}

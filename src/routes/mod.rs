// HTTP + WebSocket routes

mod error;
mod http;
mod ws;

pub use error::ApiError;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::dispatch_repo::DispatchRepo;
use crate::presentation::DashboardView;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) dashboard_tx: broadcast::Sender<DashboardView>,
    pub(crate) repo: Arc<DispatchRepo>,
    pub(crate) ws_dashboard_connections: Arc<AtomicUsize>,
    pub(crate) config: AppConfig,
}

pub fn app(
    dashboard_tx: broadcast::Sender<DashboardView>,
    repo: Arc<DispatchRepo>,
    ws_dashboard_connections: Arc<AtomicUsize>,
    config: AppConfig,
) -> Router {
    let state = AppState {
        dashboard_tx,
        repo,
        ws_dashboard_connections,
        config,
    };
    Router::new()
        .route("/", get(|| async { "Firefly Swarm Command: dispatch console" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route(
            "/api/incidents",
            get(http::list_incidents).post(http::ingest_incident),
        ) // GET, POST /api/incidents
        .route("/api/incidents/{id}/status", post(http::update_incident_status)) // POST /api/incidents/{id}/status
        .route("/api/units", get(http::list_units).post(http::upsert_unit)) // GET, POST /api/units
        .route("/api/units/{id}", get(http::get_unit).delete(http::delete_unit)) // GET, DELETE /api/units/{id}
        .route("/api/units/{id}/status", post(http::update_unit_status)) // POST /api/units/{id}/status
        .route("/api/alerts", get(http::list_alerts).post(http::insert_alert)) // GET, POST /api/alerts
        .route("/api/intake", post(http::intake_report)) // POST /api/intake
        .route("/api/pipeline-metrics", post(http::record_pipeline_metrics)) // POST /api/pipeline-metrics
        .route("/api/metrics", get(http::metric_snapshot)) // GET /api/metrics
        .route("/api/dashboard", get(http::dashboard)) // GET /api/dashboard
        .route("/ws/dashboard", get(ws::ws_dashboard)) // WS /ws/dashboard
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

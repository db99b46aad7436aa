// Query and ingestion handlers. Queries always aggregate fresh rows; ingestion goes through
// the store's validation and reports failures as ApiError.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use super::error::ApiError;
use crate::dashboard;
use crate::dispatch_repo::now_ms;
use crate::models::{
    Alert, Availability, Incident, IncidentReport, IncidentStatus, PipelineMetrics, Unit,
};

/// Package name and version (from Cargo.toml at build time).
const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /version: returns service name and version.
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(json!({
        "name": NAME,
        "version": VERSION,
    }))
}

#[derive(Debug, Deserialize)]
pub(super) struct IncidentQuery {
    #[serde(default)]
    active: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertQuery {
    limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusUpdate {
    status: IncidentStatus,
}

/// Unit agent report, e.g. `{"status": "En_Route"}`.
#[derive(Debug, Deserialize)]
pub(super) struct UnitStatusReport {
    status: String,
}

pub(super) async fn list_incidents(
    State(state): State<AppState>,
    Query(q): Query<IncidentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let mut incidents = state.repo.list_incidents().await?;
    if q.active {
        incidents.retain(Incident::is_active);
    }
    Ok(Json(json!({ "incidents": incidents })))
}

pub(super) async fn list_units(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let units = state.repo.list_units().await?;
    Ok(Json(json!({ "units": units })))
}

pub(super) async fn list_alerts(
    State(state): State<AppState>,
    Query(q): Query<AlertQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = state.repo.list_alerts(q.limit).await?;
    Ok(Json(json!({ "alerts": alerts })))
}

/// GET /api/metrics: aggregated snapshot as of now.
pub(super) async fn metric_snapshot(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.repo.get_metric_snapshot(now_ms()).await?;
    Ok(Json(snapshot))
}

pub(super) async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let view = dashboard::current_view(
        &state.repo,
        &state.config.thresholds,
        state.config.publishing.recent_alerts_limit,
        now_ms(),
    )
    .await?;
    Ok(Json(view))
}

pub(super) async fn ingest_incident(
    State(state): State<AppState>,
    Json(mut incident): Json<Incident>,
) -> Result<impl IntoResponse, ApiError> {
    if incident.created_at == 0 {
        incident.created_at = now_ms();
    }
    state.repo.ingest_incident(&incident).await?;
    tracing::debug!(incident_id = %incident.id, status = ?incident.status, "incident ingested");
    Ok((StatusCode::CREATED, Json(incident)))
}

pub(super) async fn update_incident_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .repo
        .update_incident_status(&id, update.status)
        .await?;
    let incident = state
        .repo
        .get_incident(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("incident not found: {}", id)))?;
    Ok(Json(incident))
}

pub(super) async fn upsert_unit(
    State(state): State<AppState>,
    Json(unit): Json<Unit>,
) -> Result<impl IntoResponse, ApiError> {
    let stored = state.repo.upsert_unit(&unit).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

pub(super) async fn get_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let unit = state
        .repo
        .get_unit(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("unit {} does not exist", id)))?;
    Ok(Json(unit))
}

/// POST /api/units/{id}/status: availability in the unit agents' vocabulary.
pub(super) async fn update_unit_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(report): Json<UnitStatusReport>,
) -> Result<impl IntoResponse, ApiError> {
    let availability = Availability::from_unit_status(&report.status);
    state.repo.set_unit_status(&id, availability).await?;
    tracing::debug!(unit_id = %id, reported = %report.status, ?availability, "unit status updated");
    let unit = state
        .repo
        .get_unit(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("unit {} does not exist", id)))?;
    Ok(Json(unit))
}

/// DELETE /api/units/{id}: offboard a unit that is not working an active incident.
pub(super) async fn delete_unit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.repo.delete_unit(&id).await?;
    tracing::info!(unit_id = %id, "unit offboarded");
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn insert_alert(
    State(state): State<AppState>,
    Json(mut alert): Json<Alert>,
) -> Result<impl IntoResponse, ApiError> {
    if alert.timestamp == 0 {
        alert.timestamp = now_ms();
    }
    state.repo.insert_alert(&alert).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// POST /api/intake: classify a raw intake report and store it as a pending incident.
pub(super) async fn intake_report(
    State(state): State<AppState>,
    Json(report): Json<IncidentReport>,
) -> Result<impl IntoResponse, ApiError> {
    let incident = report.into_incident(now_ms());
    state.repo.ingest_incident(&incident).await?;
    tracing::info!(
        incident_id = %incident.id,
        category = %incident.category,
        severity = ?incident.severity,
        "intake report accepted"
    );
    Ok((StatusCode::CREATED, Json(incident)))
}

pub(super) async fn record_pipeline_metrics(
    State(state): State<AppState>,
    Json(mut metrics): Json<PipelineMetrics>,
) -> Result<impl IntoResponse, ApiError> {
    if metrics.recorded_at == 0 {
        metrics.recorded_at = now_ms();
    }
    state.repo.record_pipeline_metrics(&metrics).await?;
    Ok((StatusCode::CREATED, Json(metrics.sanitized())))
}

// Maps ingestion and plumbing failures onto HTTP status codes with a `{"error": msg}` body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::dispatch_repo::IngestError;

#[derive(Debug)]
pub enum ApiError {
    /// Record failed validation at the ingestion boundary.
    UnprocessableEntity(String),
    NotFound(String),
    /// Unit is committed to an active incident.
    Conflict(String),
    InternalServerError(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::EmptyId { .. }
            | IngestError::InvalidProcessingDuration { .. }
            | IngestError::TimestampOutOfRange { .. }
            | IngestError::UnknownUnit(_)
            | IngestError::IncidentNotActive(_) => ApiError::UnprocessableEntity(err.to_string()),
            IngestError::IncidentNotFound(_) | IngestError::UnitNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            IngestError::UnitAlreadyAssigned { .. } | IngestError::UnitBusy { .. } => {
                ApiError::Conflict(err.to_string())
            }
            IngestError::Blob(_) | IngestError::Storage(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ApiError::UnprocessableEntity(message) => {
                (StatusCode::UNPROCESSABLE_ENTITY, json!({ "error": message }))
            }
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, json!({ "error": message })),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, json!({ "error": message })),
            ApiError::InternalServerError(err) => {
                tracing::error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal server error occurred" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

// Ingestion-boundary errors. Malformed records are rejected here, before they reach the read model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("{entity} id must be non-empty")]
    EmptyId { entity: &'static str },

    #[error("incident {id}: processing duration must be a non-negative number, got {value}")]
    InvalidProcessingDuration { id: String, value: f64 },

    #[error("{field} out of range: {value}")]
    TimestampOutOfRange { field: &'static str, value: u64 },

    /// An incident references a unit that is not in the store.
    #[error("unit not found: {0}")]
    UnknownUnit(String),

    /// The addressed unit itself does not exist.
    #[error("unit {0} does not exist")]
    UnitNotFound(String),

    #[error("incident not found: {0}")]
    IncidentNotFound(String),

    #[error("incident {0} is resolved and cannot take units")]
    IncidentNotActive(String),

    #[error("unit {unit} is already assigned to active incident {incident}")]
    UnitAlreadyAssigned { unit: String, incident: String },

    /// The unit works an active incident; it must be released through the incident first.
    #[error("unit {unit} is working active incident {incident}")]
    UnitBusy { unit: String, incident: String },

    #[error("blob encoding failed: {0}")]
    Blob(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

// Incident models

use serde::{Deserialize, Serialize};

/// Incident severity; serializes lowercase. Ordered by urgency (`Critical` is greatest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Most urgent first.
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];
}

/// Incident lifecycle state. `Resolved` is the only terminal state; the order of the
/// others is illustrative, no transition table is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncidentStatus {
    Pending,
    Processing,
    Dispatched,
    EnRoute,
    OnScene,
    Resolved,
}

impl IncidentStatus {
    pub const ALL: [IncidentStatus; 6] = [
        IncidentStatus::Pending,
        IncidentStatus::Processing,
        IncidentStatus::Dispatched,
        IncidentStatus::EnRoute,
        IncidentStatus::OnScene,
        IncidentStatus::Resolved,
    ];

    pub fn is_terminal(self) -> bool {
        self == IncidentStatus::Resolved
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    pub category: String,
    pub location: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    /// Creation time (Unix ms). Filled with "now" on ingest when omitted.
    #[serde(default)]
    pub created_at: u64,
    /// Seconds the agent pipeline spent on intake; never negative.
    #[serde(default)]
    pub processing_secs: f64,
    #[serde(default)]
    pub assigned_units: Vec<String>,
    #[serde(default)]
    pub eta_secs: Option<u64>,
}

impl Incident {
    pub fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

// Intake fact sheet -> Incident. Severity and category are inferred from free text.

use serde::{Deserialize, Serialize};

use super::{Incident, IncidentStatus, Severity};

/// Loosely-typed report produced by the call-intake agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncidentReport {
    pub case_id: String,
    #[serde(alias = "incidentType")]
    pub emergency_type: String,
    pub location: String,
    pub is_active_threat: bool,
    /// Free-text hint from the caller conversation (e.g. "critical").
    pub severity: Option<String>,
    pub processing_secs: Option<f64>,
}

impl IncidentReport {
    /// Builds a pending, unassigned incident. An empty case id becomes `INC-<created_at>`.
    pub fn into_incident(self, created_at: u64) -> Incident {
        let severity = infer_severity(
            &self.emergency_type,
            self.is_active_threat,
            self.severity.as_deref(),
        );
        let category = normalize_category(&self.emergency_type);
        let id = if self.case_id.trim().is_empty() {
            format!("INC-{}", created_at)
        } else {
            self.case_id
        };
        Incident {
            id,
            category,
            location: self.location,
            severity,
            status: IncidentStatus::Pending,
            created_at,
            processing_secs: self.processing_secs.unwrap_or(0.0),
            assigned_units: vec![],
            eta_secs: None,
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// First matching rule wins; unmatched reports are `Low`.
pub fn infer_severity(emergency_type: &str, is_active_threat: bool, hint: Option<&str>) -> Severity {
    let t = emergency_type.to_lowercase();
    let hint = hint.map(str::to_lowercase).unwrap_or_default();

    if is_active_threat
        || contains_any(&t, &["cardiac", "heart", "breathing", "unconscious"])
        || hint.contains("critical")
    {
        return Severity::Critical;
    }
    if contains_any(&t, &["fire", "accident", "injury", "bleeding"]) || hint.contains("high") {
        return Severity::High;
    }
    if contains_any(&t, &["medical", "fall", "pain"]) || hint.contains("medium") {
        return Severity::Medium;
    }
    Severity::Low
}

/// Maps a raw emergency type onto the console's category names.
pub fn normalize_category(emergency_type: &str) -> String {
    let t = emergency_type.to_lowercase();
    let category = if contains_any(&t, &["cardiac", "heart", "chest"]) {
        "Cardiac Emergency"
    } else if contains_any(&t, &["fire", "smoke", "burn"]) {
        "Structure Fire"
    } else if contains_any(&t, &["accident", "collision", "crash"]) {
        "Traffic Accident"
    } else if contains_any(&t, &["medical", "injury", "pain"]) {
        "Medical Emergency"
    } else if contains_any(&t, &["wellness", "check", "welfare"]) {
        "Wellness Check"
    } else if contains_any(&t, &["police", "crime", "theft"]) {
        "Police Matter"
    } else if emergency_type.trim().is_empty() {
        "General Emergency"
    } else {
        return emergency_type.trim().to_string();
    };
    category.to_string()
}

// System alert models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Info,
    #[serde(alias = "error")]
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub severity: AlertSeverity,
    pub message: String,
    #[serde(default)]
    pub timestamp: u64,
}

/// Sorts alerts newest first; equal timestamps fall back to id, descending.
pub fn sort_newest_first(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| b.id.cmp(&a.id))
    });
}

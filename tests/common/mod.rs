// Shared test helpers
#![allow(dead_code)]

use firefly::dispatch_repo::DispatchRepo;
use firefly::models::*;
use tempfile::TempDir;

/// 2024-01-01T14:32:18Z
pub const NOON_ISH_MS: u64 = 1_704_119_538_000;
pub const DAY_MS: u64 = 24 * 60 * 60 * 1000;

pub fn incident(id: &str, severity: Severity, status: IncidentStatus, created_at: u64) -> Incident {
    Incident {
        id: id.into(),
        category: "Cardiac Emergency".into(),
        location: "Market St & 5th".into(),
        severity,
        status,
        created_at,
        processing_secs: 8.2,
        assigned_units: vec![],
        eta_secs: None,
    }
}

pub fn unit(id: &str, unit_type: UnitType, availability: Availability) -> Unit {
    Unit {
        id: id.into(),
        unit_type,
        availability,
        assigned_incident: None,
    }
}

pub fn alert(id: &str, severity: AlertSeverity, timestamp: u64) -> Alert {
    Alert {
        id: id.into(),
        severity,
        message: format!("alert {}", id),
        timestamp,
    }
}

/// Fresh store in a temp dir. Keep the TempDir alive for the test's duration.
pub async fn temp_repo(alert_retention_days: u32) -> (TempDir, DispatchRepo) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("dispatch.db");
    let repo = DispatchRepo::connect(path.to_str().unwrap(), 2, alert_retention_days)
        .await
        .unwrap();
    repo.init().await.unwrap();
    (dir, repo)
}

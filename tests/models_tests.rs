// Model serialization tests (JSON camelCase, enum spellings, aliases)

use firefly::models::*;

#[test]
fn test_incident_serialization_camel_case() {
    let incident = Incident {
        id: "INC-2024-001".into(),
        category: "Cardiac Emergency".into(),
        location: "Market St & 5th".into(),
        severity: Severity::Critical,
        status: IncidentStatus::EnRoute,
        created_at: 1000,
        processing_secs: 8.2,
        assigned_units: vec!["AMB-01".into()],
        eta_secs: Some(180),
    };
    let json = serde_json::to_value(&incident).unwrap();
    assert_eq!(json["severity"], "critical");
    assert_eq!(json["status"], "enroute");
    assert_eq!(json["createdAt"], 1000);
    assert_eq!(json["processingSecs"], 8.2);
    assert_eq!(json["assignedUnits"][0], "AMB-01");
    assert_eq!(json["etaSecs"], 180);
}

#[test]
fn test_incident_optional_fields_default() {
    let json = r#"{"id":"INC-1","category":"Fire","location":"Pier 39","severity":"high","status":"onscene"}"#;
    let incident: Incident = serde_json::from_str(json).unwrap();
    assert_eq!(incident.status, IncidentStatus::OnScene);
    assert_eq!(incident.created_at, 0);
    assert!(incident.assigned_units.is_empty());
    assert_eq!(incident.eta_secs, None);
    assert!(incident.is_active());
}

#[test]
fn test_only_resolved_is_terminal() {
    for status in IncidentStatus::ALL {
        assert_eq!(status.is_terminal(), status == IncidentStatus::Resolved);
    }
}

#[test]
fn test_severity_orders_by_urgency() {
    assert!(Severity::Critical > Severity::High);
    assert!(Severity::High > Severity::Medium);
    assert!(Severity::Medium > Severity::Low);
    assert_eq!(Severity::ALL[0], Severity::Critical);
}

#[test]
fn test_unit_type_accepts_agent_aliases() {
    for (raw, expected) in [
        ("\"ambulance\"", UnitType::Ambulance),
        ("\"ems\"", UnitType::Ambulance),
        ("\"EMS\"", UnitType::Ambulance),
        ("\"amb\"", UnitType::Ambulance),
        ("\"fire\"", UnitType::Fire),
        ("\"pd\"", UnitType::Police),
        ("\"police\"", UnitType::Police),
    ] {
        let t: UnitType = serde_json::from_str(raw).unwrap();
        assert_eq!(t, expected, "{}", raw);
    }
    assert_eq!(serde_json::to_string(&UnitType::Ambulance).unwrap(), "\"ambulance\"");
}

#[test]
fn test_availability_snake_case_and_agent_status() {
    assert_eq!(
        serde_json::to_string(&Availability::OutOfService).unwrap(),
        "\"out_of_service\""
    );
    assert_eq!(Availability::from_unit_status("Available"), Availability::Available);
    assert_eq!(Availability::from_unit_status("Dispatched"), Availability::Active);
    assert_eq!(Availability::from_unit_status("En_Route"), Availability::Active);
    assert_eq!(Availability::from_unit_status("On Scene"), Availability::Active);
    assert_eq!(
        Availability::from_unit_status("Out_of_Service"),
        Availability::OutOfService
    );
    assert_eq!(Availability::from_unit_status("???"), Availability::OutOfService);
}

#[test]
fn test_alert_error_severity_is_critical() {
    let json = r#"{"id":"a1","severity":"error","message":"Agent crashed","timestamp":5}"#;
    let alert: Alert = serde_json::from_str(json).unwrap();
    assert_eq!(alert.severity, AlertSeverity::Critical);
    assert_eq!(serde_json::to_value(&alert).unwrap()["severity"], "critical");
}

#[test]
fn test_sort_newest_first_breaks_ties_by_id() {
    let mk = |id: &str, ts: u64| Alert {
        id: id.into(),
        severity: AlertSeverity::Info,
        message: String::new(),
        timestamp: ts,
    };
    let mut alerts = vec![mk("a", 10), mk("c", 20), mk("b", 20)];
    sort_newest_first(&mut alerts);
    let ids: Vec<&str> = alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["c", "b", "a"]);
}

#[test]
fn test_pipeline_metrics_sanitized_clamps() {
    let m = PipelineMetrics {
        system_load_percent: 140.0,
        call_processing_secs: -3.0,
        agent_processing_secs: f64::NAN,
        psap_transfer_secs: 31.5,
        uptime_percent: -1.0,
        recorded_at: 9,
    }
    .sanitized();
    assert_eq!(m.system_load_percent, 100.0);
    assert_eq!(m.call_processing_secs, 0.0);
    assert_eq!(m.agent_processing_secs, 0.0);
    assert_eq!(m.psap_transfer_secs, 31.5);
    assert_eq!(m.uptime_percent, 0.0);
    assert_eq!(m.recorded_at, 9);
}

#[test]
fn test_intake_report_becomes_pending_incident() {
    let json = r#"{"caseId":"","incidentType":"Chest pain, not breathing","location":"12 Elm St","isActiveThreat":false,"processingSecs":4.5}"#;
    let report: IncidentReport = serde_json::from_str(json).unwrap();
    let incident = report.into_incident(77);
    assert_eq!(incident.id, "INC-77");
    assert_eq!(incident.category, "Cardiac Emergency");
    assert_eq!(incident.severity, Severity::Critical);
    assert_eq!(incident.status, IncidentStatus::Pending);
    assert_eq!(incident.processing_secs, 4.5);
    assert!(incident.assigned_units.is_empty());
}

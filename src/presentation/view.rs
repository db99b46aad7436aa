// Dashboard view model: one parameterized builder per repeated element
// (metric card, incident card, unit-type row, alert row) driven by the domain records.

use serde::{Deserialize, Serialize};

use super::badge::{Badge, MetricThreshold, Thresholds, badge};
use super::format::{format_clock, format_elapsed, format_eta, format_percent, format_seconds};
use super::style::{
    ColorToken, alert_style, severity_style, status_style, unit_type_style, urgency_tier,
};
use crate::models::{
    Alert, Incident, SystemMetricSnapshot, UnitCounts, UnitType, sort_newest_first,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Headline {
    pub active_incidents: u32,
    pub available_units: u32,
    pub deployed_units: u32,
    pub incidents_handled_today: u32,
    pub system_load: String,
    pub system_load_badge: Badge,
    pub uptime: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub key: String,
    pub label: String,
    pub value: String,
    pub unit: String,
    pub target: String,
    pub badge: Badge,
    pub color: ColorToken,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCard {
    pub id: String,
    pub category: String,
    pub location: String,
    pub severity_label: String,
    pub severity_letter: String,
    pub urgency_tier: u8,
    pub severity_color: ColorToken,
    pub status_label: String,
    pub status_color: ColorToken,
    pub created: String,
    pub processing: String,
    pub units: Vec<String>,
    /// "Pending" while no unit is assigned.
    pub units_label: String,
    pub eta: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypeRow {
    pub unit_type: UnitType,
    pub label: String,
    pub marker: String,
    pub available: u32,
    pub active: u32,
    pub out_of_service: u32,
    pub total: u32,
    /// e.g. "3 Avail / 2 Active"
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertRow {
    pub id: String,
    pub label: String,
    pub color: ColorToken,
    pub message: String,
    pub time: String,
}

/// Everything the console renders, display-ready.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub generated_at: u64,
    pub headline: Headline,
    pub metrics: Vec<MetricCard>,
    pub incidents: Vec<IncidentCard>,
    pub units: Vec<UnitTypeRow>,
    pub alerts: Vec<AlertRow>,
}

pub fn build_dashboard(
    snapshot: &SystemMetricSnapshot,
    incidents: &[Incident],
    alerts: &[Alert],
    thresholds: &Thresholds,
    alert_limit: usize,
) -> DashboardView {
    let metrics = vec![
        seconds_card(
            "callProcessing",
            "Call Processing Time",
            snapshot.call_processing_secs,
            &thresholds.call_processing,
        ),
        seconds_card(
            "agentProcessing",
            "Internal Agent Processing",
            snapshot.agent_processing_secs,
            &thresholds.agent_processing,
        ),
        seconds_card(
            "psapTransfer",
            "PSAP Transfer Time",
            snapshot.psap_transfer_secs,
            &thresholds.psap_transfer,
        ),
        percent_card(
            "systemLoad",
            "System Load",
            snapshot.system_load_percent,
            &thresholds.system_load,
        ),
    ];

    let mut active: Vec<&Incident> = incidents.iter().filter(|i| i.is_active()).collect();
    active.sort_by(|a, b| {
        urgency_tier(a.severity)
            .cmp(&urgency_tier(b.severity))
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    });

    let mut sorted_alerts = alerts.to_vec();
    sort_newest_first(&mut sorted_alerts);

    DashboardView {
        generated_at: snapshot.timestamp,
        headline: Headline {
            active_incidents: snapshot.active_incidents,
            available_units: snapshot.available_units,
            deployed_units: snapshot.deployed_units,
            incidents_handled_today: snapshot.incidents_handled_today,
            system_load: format_percent(snapshot.system_load_percent),
            system_load_badge: badge(snapshot.system_load_percent, &thresholds.system_load),
            uptime: format!("{:.1}%", snapshot.uptime_percent),
        },
        metrics,
        incidents: active.into_iter().map(incident_card).collect(),
        units: UnitType::ALL
            .iter()
            .map(|t| unit_row(*t, snapshot.units_by_type.get(*t)))
            .collect(),
        alerts: sorted_alerts.iter().take(alert_limit).map(alert_row).collect(),
    }
}

fn seconds_card(key: &str, label: &str, value: f64, threshold: &MetricThreshold) -> MetricCard {
    let display = format_seconds(value);
    let b = badge(value, threshold);
    MetricCard {
        key: key.to_string(),
        label: label.to_string(),
        value: display.value,
        unit: display.unit.to_string(),
        target: format!("Target: {}", threshold.target),
        badge: b,
        color: b.color(),
    }
}

fn percent_card(key: &str, label: &str, value: f64, threshold: &MetricThreshold) -> MetricCard {
    let b = badge(value, threshold);
    MetricCard {
        key: key.to_string(),
        label: label.to_string(),
        value: format_percent(value),
        unit: "percent".to_string(),
        target: format!("Optimal: <{}%", threshold.target),
        badge: b,
        color: b.color(),
    }
}

pub fn incident_card(incident: &Incident) -> IncidentCard {
    let sev = severity_style(incident.severity);
    let (status_label, status_color) = status_style(incident.status);
    let units_label = if incident.assigned_units.is_empty() {
        "Pending".to_string()
    } else {
        incident.assigned_units.join(", ")
    };
    IncidentCard {
        id: incident.id.clone(),
        category: incident.category.clone(),
        location: incident.location.clone(),
        severity_label: sev.label.to_string(),
        severity_letter: sev.letter.to_string(),
        urgency_tier: sev.tier,
        severity_color: sev.color,
        status_label: status_label.to_string(),
        status_color,
        created: format_clock(incident.created_at),
        processing: format_elapsed(incident.processing_secs),
        units: incident.assigned_units.clone(),
        units_label,
        eta: incident.eta_secs.map(format_eta),
    }
}

pub fn unit_row(unit_type: UnitType, counts: &UnitCounts) -> UnitTypeRow {
    let (label, marker) = unit_type_style(unit_type);
    UnitTypeRow {
        unit_type,
        label: label.to_string(),
        marker: marker.to_string(),
        available: counts.available,
        active: counts.active,
        out_of_service: counts.out_of_service,
        total: counts.total(),
        summary: format!("{} Avail / {} Active", counts.available, counts.active),
    }
}

pub fn alert_row(alert: &Alert) -> AlertRow {
    let (label, color) = alert_style(alert.severity);
    AlertRow {
        id: alert.id.clone(),
        label: label.to_string(),
        color,
        message: alert.message.clone(),
        time: format_clock(alert.timestamp),
    }
}

// Display lookup tables keyed by domain enums: labels, urgency tiers, color tokens.

use serde::{Deserialize, Serialize};

use crate::models::{AlertSeverity, IncidentStatus, Severity, UnitType};

/// Semantic color; the front end maps tokens to its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorToken {
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Gray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityStyle {
    pub label: &'static str,
    /// Single-letter badge shown on compact cards.
    pub letter: &'static str,
    /// 1 = most urgent, 4 = least.
    pub tier: u8,
    pub color: ColorToken,
}

// Indexed by urgency, most urgent first (same order as `Severity::ALL`).
const SEVERITY_STYLES: [SeverityStyle; 4] = [
    SeverityStyle {
        label: "CRITICAL",
        letter: "C",
        tier: 1,
        color: ColorToken::Red,
    },
    SeverityStyle {
        label: "HIGH",
        letter: "H",
        tier: 2,
        color: ColorToken::Orange,
    },
    SeverityStyle {
        label: "MEDIUM",
        letter: "M",
        tier: 3,
        color: ColorToken::Yellow,
    },
    SeverityStyle {
        label: "LOW",
        letter: "L",
        tier: 4,
        color: ColorToken::Green,
    },
];

pub fn severity_style(severity: Severity) -> &'static SeverityStyle {
    let idx = match severity {
        Severity::Critical => 0,
        Severity::High => 1,
        Severity::Medium => 2,
        Severity::Low => 3,
    };
    &SEVERITY_STYLES[idx]
}

pub fn urgency_tier(severity: Severity) -> u8 {
    severity_style(severity).tier
}

pub fn status_style(status: IncidentStatus) -> (&'static str, ColorToken) {
    match status {
        IncidentStatus::Pending => ("Pending", ColorToken::Gray),
        IncidentStatus::Processing => ("Processing", ColorToken::Yellow),
        IncidentStatus::Dispatched => ("Dispatched", ColorToken::Blue),
        IncidentStatus::EnRoute => ("Enroute", ColorToken::Orange),
        IncidentStatus::OnScene => ("Onscene", ColorToken::Green),
        IncidentStatus::Resolved => ("Resolved", ColorToken::Gray),
    }
}

/// (row label, map marker letter)
pub fn unit_type_style(unit_type: UnitType) -> (&'static str, &'static str) {
    match unit_type {
        UnitType::Ambulance => ("EMS", "A"),
        UnitType::Fire => ("Fire", "F"),
        UnitType::Police => ("Police", "P"),
    }
}

pub fn alert_style(severity: AlertSeverity) -> (&'static str, ColorToken) {
    match severity {
        AlertSeverity::Critical => ("Critical", ColorToken::Red),
        AlertSeverity::Warning => ("Warning", ColorToken::Yellow),
        AlertSeverity::Info => ("Info", ColorToken::Blue),
    }
}

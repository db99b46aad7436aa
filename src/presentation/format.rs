// Human-readable value formatting for dashboard cards.

use chrono::{DateTime, Utc};
use std::fmt;

const PLACEHOLDER: &str = "--";

/// Primary value plus unit suffix, rendered as "47.9 seconds".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayValue {
    pub value: String,
    pub unit: &'static str,
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

fn one_decimal(v: f64) -> String {
    if v.is_finite() {
        format!("{:.1}", v)
    } else {
        PLACEHOLDER.to_string()
    }
}

/// 47.9 -> "47.9 seconds".
pub fn format_seconds(secs: f64) -> DisplayValue {
    DisplayValue {
        value: one_decimal(secs),
        unit: "seconds",
    }
}

/// Compact elapsed time for incident cards: 8.2 -> "8.2s".
pub fn format_elapsed(secs: f64) -> String {
    if secs.is_finite() {
        format!("{:.1}s", secs)
    } else {
        PLACEHOLDER.to_string()
    }
}

/// ETA rounded up to whole minutes, at least one: 170 -> "3 minutes".
pub fn format_eta(secs: u64) -> String {
    let minutes = secs.div_ceil(60).max(1);
    if minutes == 1 {
        "1 minute".to_string()
    } else {
        format!("{} minutes", minutes)
    }
}

/// 67.0 -> "67%".
pub fn format_percent(v: f64) -> String {
    if v.is_finite() {
        format!("{:.0}%", v)
    } else {
        PLACEHOLDER.to_string()
    }
}

/// Wall-clock time of a Unix-ms timestamp, UTC: "14:32:18".
pub fn format_clock(ms: u64) -> String {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_render_with_unit_suffix() {
        assert_eq!(format_seconds(47.9).to_string(), "47.9 seconds");
        assert_eq!(format_seconds(12.0).value, "12.0");
        assert_eq!(format_seconds(f64::NAN).value, "--");
    }

    #[test]
    fn eta_rounds_up_to_minutes() {
        assert_eq!(format_eta(0), "1 minute");
        assert_eq!(format_eta(60), "1 minute");
        assert_eq!(format_eta(61), "2 minutes");
        assert_eq!(format_eta(180), "3 minutes");
    }

    #[test]
    fn clock_is_utc_hms() {
        // 2024-01-01T14:32:18Z
        assert_eq!(format_clock(1_704_119_538_000), "14:32:18");
    }

    #[test]
    fn percent_has_no_decimals() {
        assert_eq!(format_percent(67.0), "67%");
        assert_eq!(format_percent(66.6), "67%");
    }
}

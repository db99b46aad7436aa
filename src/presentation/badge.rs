// Qualitative threshold badges (good / warning / critical) for timing and load metrics.

use serde::{Deserialize, Serialize};

use super::style::ColorToken;

/// Ordered by severity, `Good` < `Warning` < `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Good,
    Warning,
    Critical,
}

impl Badge {
    pub fn color(self) -> ColorToken {
        match self {
            Badge::Good => ColorToken::Green,
            Badge::Warning => ColorToken::Yellow,
            Badge::Critical => ColorToken::Red,
        }
    }
}

/// Target value and the multiplier above it that is still a warning (not critical).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricThreshold {
    pub target: f64,
    pub warning_factor: f64,
}

impl MetricThreshold {
    pub const fn new(target: f64, warning_factor: f64) -> Self {
        Self {
            target,
            warning_factor,
        }
    }
}

/// value <= target -> good; value <= target * warning_factor -> warning; otherwise critical.
/// NaN never compares below a cut point, so it maps to critical.
pub fn badge(value: f64, threshold: &MetricThreshold) -> Badge {
    if value <= threshold.target {
        Badge::Good
    } else if value <= threshold.target * threshold.warning_factor {
        Badge::Warning
    } else {
        Badge::Critical
    }
}

/// Per-metric thresholds used by the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub call_processing: MetricThreshold,
    pub agent_processing: MetricThreshold,
    pub psap_transfer: MetricThreshold,
    /// Load percentage; the console marks < 80% as optimal.
    pub system_load: MetricThreshold,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            call_processing: MetricThreshold::new(60.0, 1.2),
            agent_processing: MetricThreshold::new(15.0, 1.2),
            psap_transfer: MetricThreshold::new(30.0, 1.2),
            system_load: MetricThreshold::new(80.0, 1.15),
        }
    }
}

// Pipeline metrics (reported upstream) and the derived system snapshot

use serde::{Deserialize, Serialize};
use wincode::{SchemaRead, SchemaWrite};

use super::{Availability, UnitType};

/// Timing and load values computed by the agent pipeline. Stored as a single
/// wincode blob; the aggregator passes them through untouched.
#[derive(
    Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, SchemaRead, SchemaWrite,
)]
#[serde(rename_all = "camelCase", default)]
pub struct PipelineMetrics {
    /// Dispatcher / agent-pipeline saturation, 0-100.
    pub system_load_percent: f64,
    pub call_processing_secs: f64,
    pub agent_processing_secs: f64,
    pub psap_transfer_secs: f64,
    /// 0-100.
    pub uptime_percent: f64,
    pub recorded_at: u64,
}

impl PipelineMetrics {
    /// Clamp percentages to 0-100 and negative durations to zero. NaN becomes zero.
    pub fn sanitized(self) -> Self {
        fn pct(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
        }
        fn secs(v: f64) -> f64 {
            if v.is_nan() { 0.0 } else { v.max(0.0) }
        }
        Self {
            system_load_percent: pct(self.system_load_percent),
            call_processing_secs: secs(self.call_processing_secs),
            agent_processing_secs: secs(self.agent_processing_secs),
            psap_transfer_secs: secs(self.psap_transfer_secs),
            uptime_percent: pct(self.uptime_percent),
            recorded_at: self.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitCounts {
    pub available: u32,
    pub active: u32,
    pub out_of_service: u32,
}

impl UnitCounts {
    pub fn total(&self) -> u32 {
        self.available + self.active + self.out_of_service
    }

    pub fn record(&mut self, availability: Availability) {
        match availability {
            Availability::Available => self.available += 1,
            Availability::Active => self.active += 1,
            Availability::OutOfService => self.out_of_service += 1,
        }
    }
}

/// Unit counts partitioned by type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitTypeBreakdown {
    pub ambulance: UnitCounts,
    pub fire: UnitCounts,
    pub police: UnitCounts,
}

impl UnitTypeBreakdown {
    pub fn get(&self, unit_type: UnitType) -> &UnitCounts {
        match unit_type {
            UnitType::Ambulance => &self.ambulance,
            UnitType::Fire => &self.fire,
            UnitType::Police => &self.police,
        }
    }

    pub fn get_mut(&mut self, unit_type: UnitType) -> &mut UnitCounts {
        match unit_type {
            UnitType::Ambulance => &mut self.ambulance,
            UnitType::Fire => &mut self.fire,
            UnitType::Police => &mut self.police,
        }
    }

    pub fn totals(&self) -> UnitCounts {
        UnitType::ALL
            .iter()
            .fold(UnitCounts::default(), |acc, t| {
                let c = self.get(*t);
                UnitCounts {
                    available: acc.available + c.available,
                    active: acc.active + c.active,
                    out_of_service: acc.out_of_service + c.out_of_service,
                }
            })
    }
}

/// Point-in-time aggregate. Derived on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetricSnapshot {
    pub timestamp: u64,
    pub active_incidents: u32,
    pub available_units: u32,
    pub deployed_units: u32,
    pub out_of_service_units: u32,
    pub total_units: u32,
    pub incidents_handled_today: u32,
    pub units_by_type: UnitTypeBreakdown,
    pub system_load_percent: f64,
    pub call_processing_secs: f64,
    pub agent_processing_secs: f64,
    pub psap_transfer_secs: f64,
    pub uptime_percent: f64,
}

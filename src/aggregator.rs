// Pure aggregation: current incident/unit collections -> SystemMetricSnapshot.
// Owns no state; callers pass a fresh read of the store on every query.

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Incident, PipelineMetrics, SystemMetricSnapshot, Unit, UnitTypeBreakdown};

/// Builds the snapshot as of `as_of_ms`. Total over any input; empty collections give zero counts.
pub fn aggregate(
    incidents: &[Incident],
    units: &[Unit],
    pipeline: &PipelineMetrics,
    as_of_ms: u64,
) -> SystemMetricSnapshot {
    let units_by_type = unit_breakdown(units);
    let totals = units_by_type.totals();

    SystemMetricSnapshot {
        timestamp: as_of_ms,
        active_incidents: count_active_incidents(incidents),
        available_units: totals.available,
        deployed_units: totals.active,
        out_of_service_units: totals.out_of_service,
        total_units: totals.total(),
        incidents_handled_today: incidents_handled_today(incidents, as_of_ms),
        units_by_type,
        system_load_percent: pipeline.system_load_percent,
        call_processing_secs: pipeline.call_processing_secs,
        agent_processing_secs: pipeline.agent_processing_secs,
        psap_transfer_secs: pipeline.psap_transfer_secs,
        uptime_percent: pipeline.uptime_percent,
    }
}

/// Incidents whose status is not terminal.
pub fn count_active_incidents(incidents: &[Incident]) -> u32 {
    incidents.iter().filter(|i| i.is_active()).count() as u32
}

/// Available / active / out-of-service counts per unit type.
pub fn unit_breakdown(units: &[Unit]) -> UnitTypeBreakdown {
    let mut out = UnitTypeBreakdown::default();
    for u in units {
        out.get_mut(u.unit_type).record(u.availability);
    }
    out
}

/// Incidents created on the same UTC calendar day as `as_of_ms`, regardless of status.
pub fn incidents_handled_today(incidents: &[Incident], as_of_ms: u64) -> u32 {
    let Some(today) = utc_day(as_of_ms) else {
        return 0;
    };
    incidents
        .iter()
        .filter(|i| utc_day(i.created_at) == Some(today))
        .count() as u32
}

fn utc_day(ms: u64) -> Option<NaiveDate> {
    let ms = i64::try_from(ms).ok()?;
    DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.date_naive())
}

// Aggregator tests: counts, partitions, handled-today, purity

mod common;

use common::*;
use firefly::aggregator::{aggregate, count_active_incidents, unit_breakdown};
use firefly::models::*;

fn fleet() -> Vec<Unit> {
    vec![
        unit("AMB-01", UnitType::Ambulance, Availability::Available),
        unit("AMB-02", UnitType::Ambulance, Availability::Available),
        unit("AMB-03", UnitType::Ambulance, Availability::Available),
        unit("AMB-04", UnitType::Ambulance, Availability::Active),
        unit("AMB-05", UnitType::Ambulance, Availability::Active),
        unit("FIRE-01", UnitType::Fire, Availability::Available),
        unit("FIRE-02", UnitType::Fire, Availability::OutOfService),
        unit("PD-01", UnitType::Police, Availability::Active),
    ]
}

#[test]
fn empty_input_gives_zero_counts() {
    let s = aggregate(&[], &[], &PipelineMetrics::default(), NOON_ISH_MS);
    assert_eq!(s.timestamp, NOON_ISH_MS);
    assert_eq!(s.active_incidents, 0);
    assert_eq!(s.total_units, 0);
    assert_eq!(s.available_units, 0);
    assert_eq!(s.deployed_units, 0);
    assert_eq!(s.out_of_service_units, 0);
    assert_eq!(s.incidents_handled_today, 0);
    assert_eq!(s.units_by_type, UnitTypeBreakdown::default());
}

#[test]
fn ems_row_counts_three_available_two_active() {
    let breakdown = unit_breakdown(&fleet());
    let counts = breakdown.get(UnitType::Ambulance);
    assert_eq!(counts.available, 3);
    assert_eq!(counts.active, 2);
    assert_eq!(counts.out_of_service, 0);
    assert_eq!(counts.total(), 5);
}

#[test]
fn availability_partitions_every_unit() {
    let units = fleet();
    let s = aggregate(&[], &units, &PipelineMetrics::default(), NOON_ISH_MS);
    assert_eq!(
        s.available_units + s.deployed_units + s.out_of_service_units,
        s.total_units
    );
    assert_eq!(s.total_units as usize, units.len());
    let per_type: u32 = UnitType::ALL
        .iter()
        .map(|t| s.units_by_type.get(*t).total())
        .sum();
    assert_eq!(per_type, s.total_units);
    assert_eq!(s.units_by_type.get(UnitType::Fire).out_of_service, 1);
    assert_eq!(s.units_by_type.get(UnitType::Police).active, 1);
}

#[test]
fn active_incidents_exclude_resolved() {
    let incidents = vec![
        incident("INC-1", Severity::Critical, IncidentStatus::Pending, NOON_ISH_MS),
        incident("INC-2", Severity::High, IncidentStatus::Dispatched, NOON_ISH_MS),
        incident("INC-3", Severity::Low, IncidentStatus::OnScene, NOON_ISH_MS),
        incident("INC-4", Severity::Medium, IncidentStatus::Resolved, NOON_ISH_MS),
    ];
    assert_eq!(count_active_incidents(&incidents), 3);
    let s = aggregate(&incidents, &[], &PipelineMetrics::default(), NOON_ISH_MS);
    assert_eq!(s.active_incidents, 3);
}

#[test]
fn handled_today_uses_utc_calendar_day() {
    let midnight = NOON_ISH_MS - NOON_ISH_MS % DAY_MS;
    let incidents = vec![
        incident("INC-1", Severity::Low, IncidentStatus::Resolved, midnight),
        incident("INC-2", Severity::Low, IncidentStatus::Pending, NOON_ISH_MS - 1000),
        incident("INC-3", Severity::Low, IncidentStatus::Resolved, midnight - 1),
        incident("INC-4", Severity::Low, IncidentStatus::Pending, midnight + DAY_MS),
    ];
    let s = aggregate(&incidents, &[], &PipelineMetrics::default(), NOON_ISH_MS);
    assert_eq!(s.incidents_handled_today, 2);
}

#[test]
fn pipeline_metrics_pass_through() {
    let pipeline = PipelineMetrics {
        system_load_percent: 67.0,
        call_processing_secs: 47.9,
        agent_processing_secs: 12.4,
        psap_transfer_secs: 28.1,
        uptime_percent: 99.9,
        recorded_at: 1,
    };
    let s = aggregate(&[], &[], &pipeline, NOON_ISH_MS);
    assert_eq!(s.system_load_percent, 67.0);
    assert_eq!(s.call_processing_secs, 47.9);
    assert_eq!(s.agent_processing_secs, 12.4);
    assert_eq!(s.psap_transfer_secs, 28.1);
    assert_eq!(s.uptime_percent, 99.9);
}

#[test]
fn aggregate_is_idempotent() {
    let incidents = vec![incident(
        "INC-1",
        Severity::Critical,
        IncidentStatus::EnRoute,
        NOON_ISH_MS,
    )];
    let units = fleet();
    let pipeline = PipelineMetrics::default();
    let a = aggregate(&incidents, &units, &pipeline, NOON_ISH_MS);
    let b = aggregate(&incidents, &units, &pipeline, NOON_ISH_MS);
    assert_eq!(a, b);
}

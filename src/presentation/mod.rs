// Presentation adapter: aggregated values -> display-ready labels, badges, strings.
// Pure mapping functions; nothing here touches the store.

mod badge;
mod format;
mod style;
mod view;

pub use badge::{Badge, MetricThreshold, Thresholds, badge};
pub use format::{
    DisplayValue, format_clock, format_elapsed, format_eta, format_percent, format_seconds,
};
pub use style::{
    ColorToken, SeverityStyle, alert_style, severity_style, status_style, unit_type_style,
    urgency_tier,
};
pub use view::{
    AlertRow, DashboardView, Headline, IncidentCard, MetricCard, UnitTypeRow, alert_row,
    build_dashboard, incident_card, unit_row,
};

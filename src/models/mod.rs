// Domain models: incidents, units, alerts, pipeline metrics, derived snapshot

mod alert;
mod incident;
mod intake;
mod metrics;
mod unit;

pub use alert::{Alert, AlertSeverity, sort_newest_first};
pub use incident::{Incident, IncidentStatus, Severity};
pub use intake::{IncidentReport, infer_severity, normalize_category};
pub use metrics::{PipelineMetrics, SystemMetricSnapshot, UnitCounts, UnitTypeBreakdown};
pub use unit::{Availability, Unit, UnitType};

// Fresh store read -> aggregate -> display-ready view. Shared by the worker, HTTP and WS welcome.

use crate::aggregator;
use crate::dispatch_repo::DispatchRepo;
use crate::presentation::{DashboardView, Thresholds, build_dashboard};

pub async fn current_view(
    repo: &DispatchRepo,
    thresholds: &Thresholds,
    alert_limit: usize,
    as_of_ms: u64,
) -> anyhow::Result<DashboardView> {
    let incidents = repo.list_incidents().await?;
    let units = repo.list_units().await?;
    let alerts = repo
        .list_alerts(Some(u32::try_from(alert_limit).unwrap_or(u32::MAX)))
        .await?;
    let pipeline = repo.latest_pipeline_metrics().await?;

    let snapshot = aggregator::aggregate(&incidents, &units, &pipeline, as_of_ms);
    Ok(build_dashboard(
        &snapshot,
        &incidents,
        &alerts,
        thresholds,
        alert_limit,
    ))
}

// Background publisher: every tick re-reads the store, aggregates, builds the dashboard
// view and broadcasts it to /ws/dashboard clients. Also prunes old alerts and logs app stats.

use crate::dashboard;
use crate::dispatch_repo::{DispatchRepo, now_ms};
use crate::presentation::{DashboardView, Thresholds};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tokio::sync::broadcast;
use tokio::time::{Duration, Instant, interval};
use tracing::Instrument;

/// Rate limit for "no receivers" log (avoid logging every tick when no one is on /ws/dashboard)
const NO_RECEIVERS_WARN_INTERVAL: Duration = Duration::from_secs(60);

/// Store, channel, counters and shutdown for the worker.
pub struct WorkerDeps {
    pub repo: Arc<DispatchRepo>,
    pub tx: broadcast::Sender<DashboardView>,
    pub ws_dashboard_connections: Arc<AtomicUsize>,
    pub views_published_total: Arc<AtomicU64>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Worker timing and view config.
pub struct WorkerConfig {
    pub sample_interval_ms: u64,
    /// How often to log app stats (real seconds).
    pub stats_log_interval_secs: u64,
    /// How often to prune expired alerts (real seconds).
    pub prune_interval_secs: u64,
    pub thresholds: Thresholds,
    pub recent_alerts_limit: usize,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        repo,
        tx,
        ws_dashboard_connections,
        views_published_total,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        sample_interval_ms,
        stats_log_interval_secs,
        prune_interval_secs,
        thresholds,
        recent_alerts_limit,
    } = config;

    let worker_span = tracing::span!(tracing::Level::DEBUG, "worker", sample_interval_ms);
    tokio::spawn(
        async move {
            let mut tick = interval(Duration::from_millis(sample_interval_ms));
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut stats_log_tick = interval(Duration::from_secs(stats_log_interval_secs));
            stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            let mut prune_tick = interval(Duration::from_secs(prune_interval_secs));
            prune_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            let mut alerts_pruned_total: u64 = 0;
            let mut last_no_receivers_warn: Option<Instant> = None;

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        let view = match dashboard::current_view(
                            &repo,
                            &thresholds,
                            recent_alerts_limit,
                            now_ms(),
                        )
                        .await
                        {
                            Ok(v) => v,
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "current_view",
                                    "dashboard view failed"
                                );
                                continue;
                            }
                        };

                        if tx.send(view).is_err() {
                            let should_warn = last_no_receivers_warn
                                .is_none_or(|t| t.elapsed() >= NO_RECEIVERS_WARN_INTERVAL);
                            if should_warn {
                                tracing::debug!(
                                    operation = "broadcast_view",
                                    "No active WebSocket clients; broadcast channel has no receivers"
                                );
                                last_no_receivers_warn = Some(Instant::now());
                            }
                        } else {
                            views_published_total.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("Worker shutting down");
                        break;
                    }
                    _ = stats_log_tick.tick() => {
                        tracing::info!(
                            ws_dashboard_clients =
                                ws_dashboard_connections.load(std::sync::atomic::Ordering::Relaxed),
                            views_published_total =
                                views_published_total.load(std::sync::atomic::Ordering::Relaxed),
                            alerts_pruned_total = alerts_pruned_total,
                            "app stats"
                        );
                    }
                    _ = prune_tick.tick() => {
                        match repo.prune_alerts().await {
                            Ok(n) => {
                                tracing::debug!(operation = "prune_alerts", pruned = n, "Expired alerts pruned");
                                alerts_pruned_total += n;
                            }
                            Err(e) => {
                                tracing::warn!(
                                    error = %e,
                                    operation = "prune_alerts",
                                    "Failed to prune alerts"
                                );
                            }
                        }
                    }
                }
            }
        }
        .instrument(worker_span),
    )
}

use anyhow::Result;
use firefly::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let (tx, _) = broadcast::channel::<presentation::DashboardView>(
        app_config.publishing.broadcast_capacity,
    );

    let repo = Arc::new(
        dispatch_repo::DispatchRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
            app_config.database.alert_retention_days,
        )
        .await?,
    );
    repo.init().await?;
    tracing::info!(path = %app_config.database.path, "Dispatch store ready");

    let ws_dashboard_connections = Arc::new(AtomicUsize::new(0));
    let views_published_total = Arc::new(AtomicU64::new(0));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            repo: repo.clone(),
            tx: tx.clone(),
            ws_dashboard_connections: ws_dashboard_connections.clone(),
            views_published_total,
            shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
            prune_interval_secs: app_config.monitoring.prune_interval_secs,
            thresholds: app_config.thresholds,
            recent_alerts_limit: app_config.publishing.recent_alerts_limit,
        },
    );

    let app = routes::app(tx, repo, ws_dashboard_connections, app_config.clone());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = shutdown_signal() => {
                tracing::info!("Received shutdown signal");
                let _ = shutdown_tx.send(());
                let _ = worker_handle.await;
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

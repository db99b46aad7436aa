// WebSocket /ws/dashboard: welcome view from fresh data, then every broadcast view.

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::dashboard;
use crate::dispatch_repo::now_ms;
use crate::presentation::DashboardView;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_dashboard connection count on drop (connect = +1, drop = -1).
struct WsDashboardGuard(Arc<AtomicUsize>);

impl Drop for WsDashboardGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, std::sync::atomic::Ordering::Relaxed);
    }
}

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| async move {
        // Subscribe before the welcome read.
        let mut rx = state.dashboard_tx.subscribe();
        if let Err(e) = stream_dashboard(socket, &mut rx, &state).await {
            tracing::info!(error = %e, "Dashboard stream error");
        }
    })
}

async fn send_text(socket: &mut WebSocket, json: String) -> bool {
    let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
    matches!(r, Ok(Ok(())))
}

async fn stream_dashboard(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<DashboardView>,
    state: &AppState,
) -> anyhow::Result<()> {
    state
        .ws_dashboard_connections
        .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let _guard = WsDashboardGuard(state.ws_dashboard_connections.clone());
    tracing::info!("Client connected to dashboard stream");

    let view = dashboard::current_view(
        &state.repo,
        &state.config.thresholds,
        state.config.publishing.recent_alerts_limit,
        now_ms(),
    )
    .await?;
    let welcome = serde_json::json!({ "type": "dashboard", "view": view });
    if !send_text(&mut socket, serde_json::to_string(&welcome)?).await {
        return Ok(());
    }

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    // First tick fires immediately.
    ping_interval.tick().await;
    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(view) => {
                        let json = serde_json::to_string(&view)?;
                        if !send_text(&mut socket, json).await {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "WebSocket /ws/dashboard client lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                    Some(Ok(_)) => {}
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if !matches!(r, Ok(Ok(()))) {
                    break;
                }
            }
        }
    }
    Ok(())
}

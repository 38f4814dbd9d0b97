//! Haven Console - headless composition root.
//!
//! Stands in for the dashboard, simulation console, and pattern views: it
//! keeps every store slice live through one sync service and logs what a
//! UI would render - connectivity transitions, device/energy summaries,
//! threat changes, and scenario progress.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haven_sync::{ApiClient, Stores, SyncConfig, SyncService};

/// How often the one-line state summary is logged.
const SUMMARY_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "haven_console=info,haven_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = SyncConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "Starting Haven Console");
    if config.google_client_id.is_none() {
        tracing::info!("no sign-in identifier configured; running unauthenticated");
    }

    let api = Arc::new(ApiClient::new(&config)?);
    let service = SyncService::new(&config, api)?;
    service.start();

    // Connectivity indicator: the stream's boolean flag is the only signal.
    let mut connectivity = service.connectivity();
    tokio::spawn(async move {
        while connectivity.changed().await.is_ok() {
            let connected = *connectivity.borrow();
            if connected {
                tracing::info!("event stream: Live");
            } else {
                tracing::warn!("event stream: Disconnected (retrying)");
            }
        }
    });

    let stores = service.stores().clone();
    let summary = tokio::spawn(async move {
        let mut tick = tokio::time::interval(SUMMARY_INTERVAL);
        loop {
            tick.tick().await;
            log_summary(&stores);
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    summary.abort();
    service.shutdown().await;
    Ok(())
}

fn log_summary(stores: &Stores) {
    let energy = stores.energy.current();
    let timeline = stores.timeline.view();

    tracing::info!(
        rooms = stores.devices.room_count(),
        devices = stores.devices.device_count(),
        watts = energy.as_ref().map(|e| e.total_consumption_watts),
        battery_pct = energy.as_ref().map(|e| e.battery_pct),
        threat = ?stores.threat.level(),
        alerting = stores.threat.is_alerting(),
        agents = stores.agents.len(),
        suggestions = stores.patterns.suggestions().len(),
        pending_alerts = stores.alerts.pending_permissions().len(),
        scenario = timeline.scenario.as_ref().map(|s| s.scenario_id.as_str()),
        step = timeline.step.as_ref().map(|s| s.current_step),
        "state summary"
    );
}

mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{MemoryStore, RpcNetworkSource};
use application::TrendService;
use config::Config;
use interface::http::create_router;

/// Append one snapshot per tick; failed fetches only skip that tick
async fn run_snapshot_loop(trend_service: Arc<TrendService>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        // Already logged by the service
        let _ = trend_service.record_snapshot().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("chainpulse={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting chainpulse v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    let store = Arc::new(MemoryStore::new(config.history_size));
    let source = Arc::new(RpcNetworkSource::new(config.rpc_config())?);
    let trend_service = Arc::new(TrendService::new(store, source));

    if trend_service.is_connected(config.chain_id).await {
        info!("✓ Connected to RPC endpoint {}", config.rpc_url);
    } else {
        warn!("⚠ RPC endpoint {} is not reachable yet; snapshots will be skipped until it is", config.rpc_url);
    }

    match config.snapshot_period() {
        Some(period) => {
            info!("✓ Recording a snapshot every {}s (history size {})", period.as_secs(), trend_service.capacity());
            tokio::spawn(run_snapshot_loop(trend_service.clone(), period));
        }
        None => info!("Snapshot loop disabled; use POST /api/snapshots to record"),
    }

    // Create HTTP server
    let app = create_router(trend_service, config.chain_id, config.static_dir.clone());
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ chainpulse listening on {}", addr);
    info!("  → API: http://localhost:{}/api/trends", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

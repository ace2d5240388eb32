use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use nexttrain_server::cache::CacheConfig;
use nexttrain_server::irail::{IrailClient, IrailConfig};
use nexttrain_server::poll::PollConfig;
use nexttrain_server::resolver::ResolverConfig;
use nexttrain_server::snapshot::SnapshotStore;
use nexttrain_server::stations::load_directory;
use nexttrain_server::web::{AppState, create_router};

/// How often to refresh the station directory (24 hours).
const STATION_REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // The language hint follows the runtime locale unless overridden.
    let locale = std::env::var("NEXTTRAIN_LANG")
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| "en".to_string());

    let mut irail_config = IrailConfig::new().with_locale(locale);
    if let Ok(base_url) = std::env::var("NEXTTRAIN_BASE_URL") {
        irail_config = irail_config.with_base_url(base_url);
    }
    let client = IrailClient::new(irail_config).expect("failed to create iRail client");

    let snapshots = match std::env::var("NEXTTRAIN_SNAPSHOT_DIR") {
        Ok(dir) => Some(SnapshotStore::with_dir(dir)),
        Err(_) => SnapshotStore::open_default(),
    };
    match &snapshots {
        Some(store) => info!(dir = %store.dir().display(), "using durable snapshot store"),
        None => warn!("no cache directory available, running without durable snapshots"),
    }

    let stations = load_directory(&client, snapshots.as_ref()).await;

    // Refresh the directory daily; a failed refresh keeps the current set.
    {
        let stations = stations.clone();
        let client = client.clone();
        let snapshots = snapshots.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(STATION_REFRESH_INTERVAL);
            interval.tick().await; // first tick fires immediately, skip it
            loop {
                interval.tick().await;
                match stations.refresh(&client, snapshots.as_ref()).await {
                    Ok(count) => info!(count, "refreshed station directory"),
                    Err(err) => warn!(%err, "station directory refresh failed"),
                }
            }
        });
    }

    let state = AppState::new(
        client,
        &CacheConfig::default(),
        ResolverConfig::default(),
        stations,
        snapshots,
        PollConfig::default(),
    );
    let app = create_router(state);

    let addr = std::env::var("NEXTTRAIN_BIND")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 3000)));

    info!(%addr, "nexttrain server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}

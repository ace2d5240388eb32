//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::cache::{CacheConfig, DetailCache, SearchCache};
use crate::domain::BoardMode;
use crate::irail::IrailClient;
use crate::poll::{BoardPoller, PollConfig};
use crate::resolver::ResolverConfig;
use crate::snapshot::SnapshotStore;
use crate::stations::StationDirectory;

/// The (station, mode) the background poller currently keeps fresh.
struct BoardWatch {
    station: String,
    mode: BoardMode,
    poller: BoardPoller,
}

/// Shared application state.
///
/// Created once at startup, cloned per request handler. All mutation goes
/// through the interior-mutable caches, the station directory and the
/// poller slot.
#[derive(Clone)]
pub struct AppState {
    /// Upstream API client.
    pub irail: Arc<IrailClient>,

    /// In-memory vehicle detail cache (5 minutes, keyed by vehicle+day).
    pub details: Arc<DetailCache>,

    /// Global train-number search outcome cache.
    pub search: Arc<SearchCache>,

    /// Durable snapshot store; `None` when no cache directory exists.
    pub snapshots: Option<Arc<SnapshotStore>>,

    /// Station directory for search and nearest lookup.
    pub stations: StationDirectory,

    /// Resolver tuning.
    pub resolver: Arc<ResolverConfig>,

    /// Poller tuning.
    pub poll: Arc<PollConfig>,

    watcher: Arc<Mutex<Option<BoardWatch>>>,
}

impl AppState {
    /// Create the application state.
    pub fn new(
        irail: IrailClient,
        cache_config: &CacheConfig,
        resolver: ResolverConfig,
        stations: StationDirectory,
        snapshots: Option<SnapshotStore>,
        poll: PollConfig,
    ) -> Self {
        Self {
            irail: Arc::new(irail),
            details: Arc::new(DetailCache::new(cache_config)),
            search: Arc::new(SearchCache::new(cache_config)),
            snapshots: snapshots.map(Arc::new),
            stations,
            resolver: Arc::new(resolver),
            poll: Arc::new(poll),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// Point the background poller at a (station, mode).
    ///
    /// Watching the pair already being refreshed is a no-op; anything else
    /// cancels the previous poller and spawns a new one. Without a
    /// snapshot store there is nowhere to put refreshed boards, so no
    /// poller runs.
    pub async fn watch_board(&self, station: &str, mode: BoardMode) {
        let Some(snapshots) = &self.snapshots else {
            return;
        };

        let mut guard = self.watcher.lock().await;
        if let Some(watch) = guard.as_ref()
            && watch.station == station
            && watch.mode == mode
            && !watch.poller.is_finished()
        {
            return;
        }

        if let Some(previous) = guard.take() {
            previous.poller.cancel();
        }

        let poller = BoardPoller::spawn(
            self.irail.clone(),
            snapshots.clone(),
            station.to_string(),
            mode,
            (*self.resolver).clone(),
            (*self.poll).clone(),
        );
        *guard = Some(BoardWatch {
            station: station.to_string(),
            mode,
            poller,
        });
    }

    /// The currently watched (station, mode), if any.
    pub async fn watched_board(&self) -> Option<(String, BoardMode)> {
        let guard = self.watcher.lock().await;
        guard
            .as_ref()
            .map(|watch| (watch.station.clone(), watch.mode))
    }
}

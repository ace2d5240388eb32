//! In-memory station directory.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::Station;
use crate::geo::{self, Coordinates};
use crate::irail::IrailClient;
use crate::snapshot::{STATION_LIST_TTL, STATIONS_KEY, SnapshotStore};

/// Upper bound on search results, matching the picker's display cap.
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Thread-safe station directory.
#[derive(Clone, Default)]
pub struct StationDirectory {
    inner: Arc<RwLock<Vec<Station>>>,
}

impl StationDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory holding the given stations.
    pub fn from_stations(stations: Vec<Station>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(stations)),
        }
    }

    /// Number of stations.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the directory holds no stations.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Replace the station set. Returns the new count.
    pub async fn replace(&self, stations: Vec<Station>) -> usize {
        let count = stations.len();
        let mut guard = self.inner.write().await;
        *guard = stations;
        count
    }

    /// Fuzzy search by name: case-insensitive, diacritic-folding substring
    /// match, alphabetical, capped at `limit` (at most
    /// [`MAX_SEARCH_RESULTS`]). An empty query lists the first stations
    /// alphabetically.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<Station> {
        let needle = fold(query);
        let guard = self.inner.read().await;

        let mut matches: Vec<Station> = guard
            .iter()
            .filter(|s| needle.is_empty() || fold(&s.name).contains(&needle))
            .cloned()
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches.truncate(limit.min(MAX_SEARCH_RESULTS));
        matches
    }

    /// Exact lookup by name, ignoring case and diacritics.
    pub async fn get(&self, name: &str) -> Option<Station> {
        let needle = fold(name);
        let guard = self.inner.read().await;
        guard.iter().find(|s| fold(&s.name) == needle).cloned()
    }

    /// The station closest to `from`, with its distance in kilometres.
    pub async fn nearest(&self, from: Coordinates) -> Option<(Station, f64)> {
        let guard = self.inner.read().await;
        geo::nearest(guard.iter(), from).map(|(station, dist)| (station.clone(), dist))
    }

    /// Re-fetch the station set from the upstream directory.
    ///
    /// A successful fetch replaces the set and refreshes the durable
    /// snapshot; a failed one leaves the current set in place and returns
    /// the error to the caller.
    pub async fn refresh(
        &self,
        client: &IrailClient,
        snapshots: Option<&SnapshotStore>,
    ) -> Result<usize, crate::irail::IrailError> {
        let stations = client.stations().await?;
        if let Some(store) = snapshots {
            store.store(STATIONS_KEY, &stations);
        }
        Ok(self.replace(stations).await)
    }
}

/// Fetch the station set, falling back to the durable snapshot when the
/// live fetch fails.
///
/// A successful fetch refreshes the snapshot. When both the network and
/// the snapshot come up empty the directory starts empty; boards still
/// work, only search and locate degrade.
pub async fn load_directory(
    client: &IrailClient,
    snapshots: Option<&SnapshotStore>,
) -> StationDirectory {
    match client.stations().await {
        Ok(stations) => {
            info!(count = stations.len(), "loaded station directory");
            if let Some(store) = snapshots {
                store.store(STATIONS_KEY, &stations);
            }
            StationDirectory::from_stations(stations)
        }
        Err(err) => {
            warn!(%err, "station directory fetch failed, trying snapshot");
            let cached: Option<Vec<Station>> =
                snapshots.and_then(|store| store.load(STATIONS_KEY, STATION_LIST_TTL));
            match cached {
                Some(stations) => {
                    info!(count = stations.len(), "using snapshot station directory");
                    StationDirectory::from_stations(stations)
                }
                None => {
                    warn!("no usable station snapshot, starting with an empty directory");
                    StationDirectory::new()
                }
            }
        }
    }
}

/// Lowercase and strip the diacritics that occur in Belgian station names.
fn fold(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ä' | 'å' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            'ñ' => 'n',
            'ÿ' => 'y',
            other => other,
        })
        .collect()
}

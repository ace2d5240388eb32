//! Durable snapshot store.
//!
//! JSON files under a cache directory, wrapped in a `{stored_at_secs,
//! payload}` envelope. Used for the 7-day station directory cache and the
//! 10-minute liveboard fallback snapshots.
//!
//! Every failure mode here (missing file, bad JSON, full disk, unwritable
//! directory) degrades to a cache miss. Reads and writes never surface an
//! error to the caller; they log and move on.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::BoardMode;

/// TTL for the station directory snapshot.
pub const STATION_LIST_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// TTL for per-(station, mode) liveboard snapshots.
pub const BOARD_SNAPSHOT_TTL: Duration = Duration::from_secs(10 * 60);

/// Snapshot key for the station directory.
pub const STATIONS_KEY: &str = "stations";

/// Snapshot key for a station's board in one mode.
pub fn board_key(station: &str, mode: BoardMode) -> String {
    format!("board_{}_{}", station, mode.as_str())
}

/// Stored envelope with its write timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope<T> {
    stored_at_secs: u64,
    payload: T,
}

/// Durable JSON snapshot store.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Open the store at the platform cache directory.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn open_default() -> Option<Self> {
        let dirs = directories::ProjectDirs::from("", "", "nexttrain")?;
        Some(Self {
            dir: dirs.cache_dir().to_path_buf(),
        })
    }

    /// Open the store at a specific directory.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        // Keys embed station names; map anything that is not filesystem-safe
        // (spaces, accents, slashes) to underscores.
        let file: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }

    /// Store a payload under a key, stamped with the current time.
    ///
    /// Failures are logged and swallowed.
    pub fn store<T: Serialize>(&self, key: &str, payload: &T) {
        if let Err(err) = self.try_store(key, payload) {
            warn!(key, %err, "snapshot write failed");
        }
    }

    fn try_store<T: Serialize>(&self, key: &str, payload: &T) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let stored_at_secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let envelope = Envelope {
            stored_at_secs,
            payload,
        };
        let json = serde_json::to_string(&envelope)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

        std::fs::write(self.path(key), json)
    }

    /// Load a payload no older than `ttl`.
    ///
    /// Returns `None` for missing, unreadable, unparseable or expired
    /// entries.
    pub fn load<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        let contents = std::fs::read_to_string(self.path(key)).ok()?;
        let envelope: Envelope<T> = serde_json::from_str(&contents).ok()?;

        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .ok()?
            .as_secs();

        let age = now.saturating_sub(envelope.stored_at_secs);
        if age >= ttl.as_secs() {
            return None;
        }

        Some(envelope.payload)
    }
}

//! Periodic board refresh.
//!
//! A cancellable background task that re-assembles the board for one
//! watched (station, mode) on a fixed interval and stores the result as a
//! durable snapshot, so the board endpoint has fresh fallback data when
//! the upstream is unreachable. The task is owned by whoever spawns it,
//! not by the resolver; re-watching a different station means cancelling
//! this poller and spawning a new one.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::BoardMode;
use crate::irail::IrailClient;
use crate::resolver::{ResolverConfig, assemble_board};
use crate::snapshot::{SnapshotStore, board_key};

/// Configuration for the board poller.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Time between refreshes.
    pub interval: Duration,
}

impl PollConfig {
    /// Set the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Handle to a running board poller.
///
/// Dropping the handle leaves the task running; call [`BoardPoller::stop`]
/// (or [`BoardPoller::cancel`]) to end it.
pub struct BoardPoller {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl BoardPoller {
    /// Spawn a poller for one (station, mode).
    ///
    /// The first refresh happens after one full interval; the caller has
    /// typically just assembled the board itself.
    pub fn spawn(
        client: Arc<IrailClient>,
        snapshots: Arc<SnapshotStore>,
        station: String,
        mode: BoardMode,
        resolver: ResolverConfig,
        config: PollConfig,
    ) -> Self {
        let (shutdown, mut cancelled) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.tick().await; // first tick fires immediately, skip it

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match assemble_board(client.as_ref(), &station, mode, Local::now(), &resolver)
                            .await
                        {
                            Ok(entries) => {
                                debug!(station, count = entries.len(), "board refreshed");
                                snapshots.store(&board_key(&station, mode), &entries);
                            }
                            Err(err) => warn!(station, %err, "board refresh failed"),
                        }
                    }
                    changed = cancelled.changed() => {
                        if changed.is_err() || *cancelled.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        Self { shutdown, handle }
    }

    /// Ask the task to stop without waiting for it.
    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Stop the task and wait for it to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }

    /// Whether the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

//! Resolver configuration.

use chrono::Duration;

/// Configuration parameters for board assembly and global search.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum number of board entries to accumulate before stopping.
    pub min_trains: usize,

    /// Maximum number of upstream liveboard calls per assembly.
    pub max_loops: u32,

    /// How far to advance the query cursor when a slice comes back empty
    /// (minutes).
    pub empty_advance_mins: i64,

    /// How far to advance when the upstream rejects a time slice with
    /// HTTP 400 (minutes).
    pub rejected_advance_mins: i64,

    /// How far before the cursor an entry may be scheduled and still be
    /// accepted (seconds). Absorbs upstream boards that start slightly in
    /// the past.
    pub lookback_secs: i64,

    /// How far past the last accepted entry the cursor jumps, to avoid
    /// re-fetching the same slice (seconds).
    pub cursor_step_secs: i64,

    /// Maximum simultaneous vehicle probes during global search.
    pub probe_concurrency: usize,
}

impl ResolverConfig {
    /// Set the minimum number of board entries.
    pub fn with_min_trains(mut self, min_trains: usize) -> Self {
        self.min_trains = min_trains;
        self
    }

    /// Set the iteration bound.
    pub fn with_max_loops(mut self, max_loops: u32) -> Self {
        self.max_loops = max_loops;
        self
    }

    /// Set the probe concurrency bound.
    pub fn with_probe_concurrency(mut self, probe_concurrency: usize) -> Self {
        self.probe_concurrency = probe_concurrency;
        self
    }

    /// Cursor advance for an empty slice.
    pub fn empty_advance(&self) -> Duration {
        Duration::minutes(self.empty_advance_mins)
    }

    /// Cursor advance for a rejected (HTTP 400) slice.
    pub fn rejected_advance(&self) -> Duration {
        Duration::minutes(self.rejected_advance_mins)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            min_trains: 4,
            max_loops: 10,
            empty_advance_mins: 120,
            rejected_advance_mins: 60,
            lookback_secs: 60,
            cursor_step_secs: 120,
            probe_concurrency: 6,
        }
    }
}

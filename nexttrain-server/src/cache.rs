//! In-memory TTL caches.
//!
//! Two independent caches with different lifetimes:
//!
//! - Vehicle details change quickly while a train is running, so detail
//!   records live for 5 minutes, keyed by `(vehicle, day)`. A cache entry
//!   is valid only for its exact pair; train numbers recur daily, so an
//!   entry for one day must never answer a query for another.
//! - Global-search outcomes: a positive match stays useful for 30 minutes,
//!   a negative one goes stale fast (a train may appear on a delayed
//!   schedule) and is kept for 2 minutes only.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{Composition, ServiceDay, VehicleId, VehicleJourney};

/// Cache key for vehicle details: the (vehicle, day) identity pair.
type DetailKey = (VehicleId, ServiceDay);

/// Configuration for the in-memory caches.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for vehicle detail records.
    pub detail_ttl: Duration,

    /// Maximum number of detail records.
    pub detail_capacity: u64,

    /// TTL for positive global-search outcomes.
    pub positive_ttl: Duration,

    /// TTL for negative global-search outcomes.
    pub negative_ttl: Duration,

    /// Maximum number of search outcomes per polarity.
    pub search_capacity: u64,
}

impl CacheConfig {
    /// Set the detail record TTL.
    pub fn with_detail_ttl(mut self, ttl: Duration) -> Self {
        self.detail_ttl = ttl;
        self
    }

    /// Set the positive search outcome TTL.
    pub fn with_positive_ttl(mut self, ttl: Duration) -> Self {
        self.positive_ttl = ttl;
        self
    }

    /// Set the negative search outcome TTL.
    pub fn with_negative_ttl(mut self, ttl: Duration) -> Self {
        self.negative_ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            detail_ttl: Duration::from_secs(5 * 60),
            detail_capacity: 512,
            positive_ttl: Duration::from_secs(30 * 60),
            negative_ttl: Duration::from_secs(2 * 60),
            search_capacity: 1024,
        }
    }
}

/// Cached detail record for one `(vehicle, day)`.
///
/// Either side may be `None` when its fetch failed; both are fetched
/// concurrently and failures are swallowed at the call site.
#[derive(Debug, Clone)]
pub struct VehicleRecord {
    pub journey: Option<VehicleJourney>,
    pub composition: Option<Composition>,
}

/// In-memory cache for vehicle detail records.
pub struct DetailCache {
    entries: MokaCache<DetailKey, Arc<VehicleRecord>>,
}

impl DetailCache {
    /// Create a cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.detail_ttl)
            .max_capacity(config.detail_capacity)
            .build();

        Self { entries }
    }

    /// Get the record for an exact (vehicle, day) pair.
    pub async fn get(&self, vehicle: &VehicleId, day: ServiceDay) -> Option<Arc<VehicleRecord>> {
        self.entries.get(&(vehicle.clone(), day)).await
    }

    /// Insert a record.
    pub async fn insert(&self, vehicle: VehicleId, day: ServiceDay, record: Arc<VehicleRecord>) {
        self.entries.insert((vehicle, day), record).await;
    }

    /// Number of live entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Drop all entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

/// A successful global-search outcome.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub vehicle: VehicleId,
    pub day: ServiceDay,
    pub journey: VehicleJourney,
}

/// A cached global-search outcome.
#[derive(Debug, Clone)]
pub enum CachedSearch {
    Hit(Arc<SearchHit>),
    Miss,
}

/// In-memory cache for global train-number search outcomes, keyed by the
/// bare digit string.
pub struct SearchCache {
    hits: MokaCache<String, Arc<SearchHit>>,
    misses: MokaCache<String, ()>,
}

impl SearchCache {
    /// Create a cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let hits = MokaCache::builder()
            .time_to_live(config.positive_ttl)
            .max_capacity(config.search_capacity)
            .build();
        let misses = MokaCache::builder()
            .time_to_live(config.negative_ttl)
            .max_capacity(config.search_capacity)
            .build();

        Self { hits, misses }
    }

    /// Look up a previous outcome for these digits.
    pub async fn get(&self, digits: &str) -> Option<CachedSearch> {
        if let Some(hit) = self.hits.get(digits).await {
            return Some(CachedSearch::Hit(hit));
        }
        if self.misses.get(digits).await.is_some() {
            return Some(CachedSearch::Miss);
        }
        None
    }

    /// Record a successful resolution.
    pub async fn record_hit(&self, digits: &str, hit: Arc<SearchHit>) {
        // A fresh hit supersedes any lingering negative entry.
        self.misses.invalidate(digits).await;
        self.hits.insert(digits.to_string(), hit).await;
    }

    /// Record an exhausted search.
    pub async fn record_miss(&self, digits: &str) {
        self.misses.insert(digits.to_string(), ()).await;
    }
}

//! Station directory: the full station set with fuzzy search and
//! nearest-station lookup.
//!
//! The set is fetched once per session from the upstream directory
//! endpoint, kept in memory behind an `RwLock`, persisted as a durable
//! snapshot, and refreshed daily in the background.

mod directory;

pub use directory::{MAX_SEARCH_RESULTS, StationDirectory, load_directory};

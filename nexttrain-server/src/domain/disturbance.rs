//! Service disturbance type.

/// A network disturbance notice.
#[derive(Debug, Clone, PartialEq)]
pub struct Disturbance {
    pub title: String,
    pub description: String,
}

impl Disturbance {
    /// Whether this disturbance mentions the given station.
    ///
    /// Case-insensitive substring containment over title and description.
    /// The upstream publishes free text, so this is a heuristic and yields
    /// false positives and negatives by nature.
    pub fn concerns(&self, station: &str) -> bool {
        if station.is_empty() {
            return false;
        }
        let needle = station.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

//! Station type.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A railway station from the upstream directory.
///
/// Immutable once fetched; the full set is fetched once per session and
/// cached durably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    /// The upstream `standardname`, used as the station's identifier.
    pub name: String,
    /// WGS84 position, when the directory provides one.
    pub coords: Option<Coordinates>,
}

impl Station {
    pub fn new(name: impl Into<String>, coords: Option<Coordinates>) -> Self {
        Self {
            name: name.into(),
            coords,
        }
    }
}

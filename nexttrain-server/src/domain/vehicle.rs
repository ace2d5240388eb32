//! Vehicle identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid vehicle identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid vehicle id: {reason}")]
pub struct InvalidVehicleId {
    reason: &'static str,
}

/// An operator-prefixed vehicle identifier.
///
/// The canonical namespaced form is `BE.NMBS.IC2120`; the upstream also
/// accepts the bare form `IC2120`. The identifier names one scheduled
/// service and is only meaningful together with a calendar day, because
/// train numbers recur daily.
///
/// # Examples
///
/// ```
/// use nexttrain_server::domain::VehicleId;
///
/// let id = VehicleId::parse("BE.NMBS.IC2120").unwrap();
/// assert_eq!(id.local_name(), "IC2120");
/// assert_eq!(id.number(), "2120");
/// assert_eq!(id.category(), "IC");
///
/// assert!(VehicleId::parse("").is_err());
/// assert!(VehicleId::parse("IC").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(String);

impl VehicleId {
    /// Parse a vehicle identifier.
    ///
    /// Accepts dot-separated namespaced forms and bare forms. The local
    /// name (the last dot segment) must end in at least one digit, which
    /// is the train number.
    pub fn parse(s: &str) -> Result<Self, InvalidVehicleId> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidVehicleId {
                reason: "must not be empty",
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(InvalidVehicleId {
                reason: "contains characters outside [A-Za-z0-9.-_]",
            });
        }

        let local = s.rsplit('.').next().unwrap_or(s);
        if local.is_empty() {
            return Err(InvalidVehicleId {
                reason: "empty segment after final dot",
            });
        }

        if !local.ends_with(|c: char| c.is_ascii_digit()) {
            return Err(InvalidVehicleId {
                reason: "must end with the train number digits",
            });
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the full identifier as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last dot segment, e.g. `IC2120` for `BE.NMBS.IC2120`.
    pub fn local_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// The trailing digit run of the local name, i.e. the bare train number.
    pub fn number(&self) -> &str {
        let local = self.local_name();
        let start = local
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        &local[start..]
    }

    /// The local name with the trailing digits removed, e.g. `IC` or `S1`.
    pub fn category(&self) -> &str {
        let local = self.local_name();
        &local[..local.len() - self.number().len()]
    }

    /// Whether the identifier carries an operator namespace (`BE.NMBS.`).
    pub fn is_namespaced(&self) -> bool {
        self.0.contains('.')
    }
}

impl fmt::Debug for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VehicleId({})", self.0)
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Liveboard entry types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ServiceDay, VehicleId};

/// Error returned when parsing an invalid board mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid board mode: expected \"departure\" or \"arrival\"")]
pub struct InvalidMode;

/// Whether a board lists departures or arrivals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardMode {
    Departure,
    Arrival,
}

impl BoardMode {
    /// The upstream `arrdep` query value.
    pub fn arrdep(&self) -> &'static str {
        match self {
            BoardMode::Departure => "DEP",
            BoardMode::Arrival => "ARR",
        }
    }

    /// Lowercase name, as used in snapshot keys and the web API.
    pub fn as_str(&self) -> &'static str {
        match self {
            BoardMode::Departure => "departure",
            BoardMode::Arrival => "arrival",
        }
    }
}

impl FromStr for BoardMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "departure" | "dep" => Ok(BoardMode::Departure),
            "arrival" | "arr" => Ok(BoardMode::Arrival),
            _ => Err(InvalidMode),
        }
    }
}

impl fmt::Display for BoardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse crowding indicator reported by the upstream source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Occupancy {
    Low,
    Medium,
    High,
    Unknown,
}

impl Occupancy {
    /// Parse the upstream occupancy name; anything unrecognized is Unknown.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some("low") => Occupancy::Low,
            Some("medium") => Occupancy::Medium,
            Some("high") => Occupancy::High,
            _ => Occupancy::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Occupancy::Low => "low",
            Occupancy::Medium => "medium",
            Occupancy::High => "high",
            Occupancy::Unknown => "unknown",
        }
    }
}

/// One scheduled movement on a station board.
///
/// The displayed day is always derived from `time`; the date used to query
/// the board is a pagination hint only and is deliberately not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardEntry {
    /// Parsed vehicle identifier.
    pub vehicle: VehicleId,
    /// Vehicle string exactly as the upstream sent it.
    pub raw_vehicle: String,
    /// Scheduled time, epoch seconds.
    pub time: i64,
    /// Delay in seconds (0 when on time).
    pub delay_secs: i64,
    /// Platform label, when announced.
    pub platform: Option<String>,
    /// Whether the movement is cancelled.
    pub canceled: bool,
    /// Crowding indicator.
    pub occupancy: Occupancy,
    /// Destination (departures) or origin (arrivals) label.
    pub direction: Option<String>,
}

impl BoardEntry {
    /// The equality key used to deduplicate merged board pages.
    pub fn dedup_key(&self) -> (&str, i64, &str) {
        (self.vehicle.as_str(), self.time, &self.raw_vehicle)
    }

    /// The calendar day this entry belongs to, derived from its time.
    pub fn day(&self) -> Option<ServiceDay> {
        ServiceDay::from_epoch(self.time)
    }

    /// Scheduled time plus delay.
    pub fn actual_time(&self) -> i64 {
        self.time + self.delay_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(vehicle: &str, time: i64) -> BoardEntry {
        BoardEntry {
            vehicle: VehicleId::parse(vehicle).unwrap(),
            raw_vehicle: vehicle.to_string(),
            time,
            delay_secs: 0,
            platform: None,
            canceled: false,
            occupancy: Occupancy::Unknown,
            direction: None,
        }
    }

    #[test]
    fn mode_parsing() {
        assert_eq!("departure".parse::<BoardMode>().unwrap(), BoardMode::Departure);
        assert_eq!("ARRIVAL".parse::<BoardMode>().unwrap(), BoardMode::Arrival);
        assert_eq!("dep".parse::<BoardMode>().unwrap(), BoardMode::Departure);
        assert!("neither".parse::<BoardMode>().is_err());
    }

    #[test]
    fn mode_arrdep() {
        assert_eq!(BoardMode::Departure.arrdep(), "DEP");
        assert_eq!(BoardMode::Arrival.arrdep(), "ARR");
    }

    #[test]
    fn occupancy_from_name() {
        assert_eq!(Occupancy::from_name(Some("low")), Occupancy::Low);
        assert_eq!(Occupancy::from_name(Some("medium")), Occupancy::Medium);
        assert_eq!(Occupancy::from_name(Some("high")), Occupancy::High);
        assert_eq!(Occupancy::from_name(Some("unknown")), Occupancy::Unknown);
        assert_eq!(Occupancy::from_name(Some("packed")), Occupancy::Unknown);
        assert_eq!(Occupancy::from_name(None), Occupancy::Unknown);
    }

    #[test]
    fn dedup_key_distinguishes_time_and_vehicle() {
        let a = entry("BE.NMBS.IC529", 1_700_000_000);
        let b = entry("BE.NMBS.IC529", 1_700_000_000);
        let c = entry("BE.NMBS.IC529", 1_700_003_600);
        let d = entry("BE.NMBS.IC530", 1_700_000_000);

        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
        assert_ne!(a.dedup_key(), d.dedup_key());
    }

    #[test]
    fn actual_time_includes_delay() {
        let mut e = entry("BE.NMBS.IC529", 1_700_000_000);
        e.delay_secs = 300;
        assert_eq!(e.actual_time(), 1_700_000_300);
    }

    #[test]
    fn day_roundtrips_through_epoch() {
        use chrono::{Local, NaiveDate, TimeZone};

        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let dt = Local
            .from_local_datetime(&date.and_hms_opt(13, 45, 0).unwrap())
            .single()
            .unwrap();
        let e = entry("BE.NMBS.IC529", dt.timestamp());
        assert_eq!(e.day().unwrap(), ServiceDay::new(date));
    }
}

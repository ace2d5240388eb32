//! Vehicle itinerary types.

use super::{ServiceDay, VehicleId};

/// A station stop on a vehicle's itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    /// Station display name.
    pub station: String,
    /// Scheduled time, epoch seconds.
    pub time: i64,
    /// Delay in seconds (0 when on time).
    pub delay_secs: i64,
    /// Platform label, when announced.
    pub platform: Option<String>,
    /// Whether this call is cancelled.
    pub canceled: bool,
}

impl Stop {
    /// Scheduled time plus delay.
    pub fn actual_time(&self) -> i64 {
        self.time + self.delay_secs
    }
}

/// The stop-by-stop itinerary of one vehicle on one calendar day.
///
/// Identified by the `(vehicle, day)` pair; the same vehicle id names a
/// different journey every day.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleJourney {
    pub vehicle: VehicleId,
    pub day: ServiceDay,
    /// Stops in running order.
    pub stops: Vec<Stop>,
}

impl VehicleJourney {
    /// Whether the upstream returned any stops at all.
    ///
    /// An empty stop list means the vehicle does not run on this day; the
    /// global search treats it as a miss.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Index of the last stop the vehicle has already called at, judging
    /// by scheduled time plus delay against `now` (epoch seconds).
    pub fn last_passed_stop(&self, now: i64) -> Option<usize> {
        self.stops
            .iter()
            .rposition(|stop| stop.actual_time() <= now)
    }
}

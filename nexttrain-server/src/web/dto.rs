//! Request and response DTOs for the JSON API.

use serde::{Deserialize, Serialize};

use crate::cache::VehicleRecord;
use crate::domain::{BoardEntry, Disturbance, Station, Stop, Unit, VehicleJourney};
use crate::resolver::SearchMatch;

/// Query for `GET /api/board`.
#[derive(Debug, Deserialize)]
pub struct BoardQuery {
    pub station: String,
    /// `departure` (default) or `arrival`.
    pub mode: Option<String>,
}

/// Query for `GET /api/vehicle`.
#[derive(Debug, Deserialize)]
pub struct VehicleQuery {
    pub id: String,
    /// `ddmmyy`; defaults to today.
    pub date: Option<String>,
}

/// Query for `GET /api/search/train`.
#[derive(Debug, Deserialize)]
pub struct TrainSearchQuery {
    pub q: String,
}

/// Query for `GET /api/stations/search`.
#[derive(Debug, Deserialize)]
pub struct StationSearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

/// Query for `GET /api/stations/nearest`.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
    /// Use the looser first-visit distance threshold.
    #[serde(default)]
    pub first_visit: bool,
}

/// One train on a rendered board.
#[derive(Debug, Serialize)]
pub struct TrainView {
    pub vehicle: String,
    /// Short display number, e.g. `IC2120`.
    pub number: String,
    /// Scheduled time, epoch seconds.
    pub time: i64,
    /// Calendar day of the scheduled time, `ddmmyy`.
    pub day: String,
    pub delay_secs: i64,
    pub platform: Option<String>,
    pub canceled: bool,
    pub occupancy: &'static str,
    pub direction: Option<String>,
}

impl TrainView {
    pub fn from_entry(entry: &BoardEntry) -> Self {
        Self {
            vehicle: entry.vehicle.as_str().to_string(),
            number: entry.vehicle.local_name().to_string(),
            time: entry.time,
            day: entry.day().map(|d| d.ddmmyy()).unwrap_or_default(),
            delay_secs: entry.delay_secs,
            platform: entry.platform.clone(),
            canceled: entry.canceled,
            occupancy: entry.occupancy.as_str(),
            direction: entry.direction.clone(),
        }
    }
}

/// A disturbance relevant to the requested station.
#[derive(Debug, Serialize)]
pub struct DisturbanceView {
    pub title: String,
    pub description: String,
}

impl DisturbanceView {
    pub fn from_disturbance(d: &Disturbance) -> Self {
        Self {
            title: d.title.clone(),
            description: d.description.clone(),
        }
    }
}

/// Response for `GET /api/board`.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub station: String,
    pub mode: &'static str,
    /// True when served from the durable fallback snapshot.
    pub stale: bool,
    pub trains: Vec<TrainView>,
    pub disturbances: Vec<DisturbanceView>,
}

/// One stop of a vehicle itinerary.
#[derive(Debug, Serialize)]
pub struct StopView {
    pub station: String,
    pub time: i64,
    pub delay_secs: i64,
    pub platform: Option<String>,
    pub canceled: bool,
}

impl StopView {
    fn from_stop(stop: &Stop) -> Self {
        Self {
            station: stop.station.clone(),
            time: stop.time,
            delay_secs: stop.delay_secs,
            platform: stop.platform.clone(),
            canceled: stop.canceled,
        }
    }

    pub fn from_journey(journey: &VehicleJourney) -> Vec<Self> {
        journey.stops.iter().map(Self::from_stop).collect()
    }
}

/// One physical unit of a composition.
#[derive(Debug, Serialize)]
pub struct UnitView {
    pub id: Option<String>,
    pub material_type: String,
    pub kind: &'static str,
}

impl UnitView {
    pub fn from_unit(unit: &Unit) -> Self {
        Self {
            id: unit.id.clone(),
            material_type: unit.material_type.clone(),
            kind: unit.kind.as_str(),
        }
    }
}

/// Response for `GET /api/vehicle`.
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    pub vehicle: String,
    pub date: String,
    /// Empty when the itinerary fetch failed or the vehicle does not run.
    pub stops: Vec<StopView>,
    /// Absent when the composition fetch failed.
    pub units: Option<Vec<UnitView>>,
}

impl VehicleDetailResponse {
    pub fn from_record(vehicle: &str, date: String, record: &VehicleRecord) -> Self {
        Self {
            vehicle: vehicle.to_string(),
            date,
            stops: record
                .journey
                .as_ref()
                .map(StopView::from_journey)
                .unwrap_or_default(),
            units: record
                .composition
                .as_ref()
                .map(|c| c.units.iter().map(UnitView::from_unit).collect()),
        }
    }
}

/// Response for `GET /api/search/train`.
#[derive(Debug, Serialize)]
pub struct TrainSearchResponse {
    pub vehicle: String,
    pub number: String,
    pub date: String,
    pub stops: Vec<StopView>,
}

impl TrainSearchResponse {
    pub fn from_match(found: &SearchMatch) -> Self {
        Self {
            vehicle: found.vehicle.as_str().to_string(),
            number: found.vehicle.local_name().to_string(),
            date: found.day.ddmmyy(),
            stops: StopView::from_journey(&found.journey),
        }
    }
}

/// A station in search results.
#[derive(Debug, Serialize)]
pub struct StationView {
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl StationView {
    pub fn from_station(station: &Station) -> Self {
        Self {
            name: station.name.clone(),
            lat: station.coords.map(|c| c.lat),
            lon: station.coords.map(|c| c.lon),
        }
    }
}

/// Response for `GET /api/stations/search`.
#[derive(Debug, Serialize)]
pub struct StationSearchResponse {
    pub stations: Vec<StationView>,
}

/// Response for `GET /api/stations/nearest`.
#[derive(Debug, Serialize)]
pub struct NearestResponse {
    pub station: StationView,
    pub distance_km: f64,
}

/// JSON body for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

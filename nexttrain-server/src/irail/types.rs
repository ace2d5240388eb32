//! iRail API response DTOs.
//!
//! These types map directly to the iRail JSON responses. Two upstream
//! quirks are absorbed here and nowhere else:
//!
//! - Collections are duck-typed: one element arrives as a bare object,
//!   several as an array ([`OneOrMany`]).
//! - Scalars are stringly: timestamps, delays and flags arrive as JSON
//!   strings, occasionally as bare numbers ([`NumString`]).
//!
//! Fields use `Option` liberally because iRail omits fields rather than
//! sending nulls.

use serde::Deserialize;

/// A collection the upstream serves either as a single object or an array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    /// Coerce to an ordered sequence.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// A scalar the upstream serves either as a JSON string or a bare number.
///
/// Normalized to its string form at deserialization time; accessors parse
/// on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct NumString(pub String);

impl NumString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.0.trim().parse().ok()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }

    /// Interpret as a boolean flag (`"1"`/`"true"` are set).
    pub fn as_flag(&self) -> bool {
        matches!(self.0.trim(), "1" | "true")
    }
}

impl<'de> Deserialize<'de> for NumString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
            Bool(bool),
        }

        Ok(NumString(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Int(i) => i.to_string(),
            Raw::Float(f) => f.to_string(),
            Raw::Bool(b) => (if b { "1" } else { "0" }).to_string(),
        }))
    }
}

/// Response from `/stations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationsResponse {
    pub station: Option<OneOrMany<StationDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub standardname: Option<String>,
    pub name: Option<String>,
    /// Longitude, despite the name.
    #[serde(rename = "locationX")]
    pub location_x: Option<NumString>,
    /// Latitude.
    #[serde(rename = "locationY")]
    pub location_y: Option<NumString>,
}

/// Response from `/disturbances/`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisturbancesResponse {
    pub disturbance: Option<OneOrMany<DisturbanceDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisturbanceDto {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Response from `/liveboard/`. One of the two blocks is present
/// depending on the requested direction.
#[derive(Debug, Clone, Deserialize)]
pub struct LiveboardResponse {
    pub departures: Option<DeparturesDto>,
    pub arrivals: Option<ArrivalsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeparturesDto {
    pub departure: Option<OneOrMany<BoardEntryDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArrivalsDto {
    pub arrival: Option<OneOrMany<BoardEntryDto>>,
}

/// One liveboard entry.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardEntryDto {
    /// Namespaced vehicle identifier, e.g. `BE.NMBS.IC2120`.
    pub vehicle: Option<String>,
    pub vehicleinfo: Option<VehicleInfoDto>,
    /// Scheduled time, epoch seconds.
    pub time: Option<NumString>,
    /// Delay in seconds.
    pub delay: Option<NumString>,
    pub platform: Option<String>,
    pub canceled: Option<NumString>,
    pub occupancy: Option<OccupancyDto>,
    /// Destination (departures) or origin (arrivals) display name.
    pub station: Option<String>,
    pub stationinfo: Option<StationDto>,
    pub direction: Option<DirectionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleInfoDto {
    pub name: Option<String>,
    pub shortname: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OccupancyDto {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionDto {
    pub name: Option<String>,
}

/// Response from `/vehicle/`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleResponse {
    pub vehicle: Option<String>,
    pub vehicleinfo: Option<VehicleInfoDto>,
    pub stops: Option<StopsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopsDto {
    pub stop: Option<OneOrMany<StopDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopDto {
    pub station: Option<String>,
    pub time: Option<NumString>,
    pub delay: Option<NumString>,
    pub platform: Option<String>,
    pub canceled: Option<NumString>,
}

/// Response from `/composition/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CompositionResponse {
    pub composition: Option<CompositionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompositionDto {
    pub segments: Option<SegmentsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentsDto {
    pub segment: Option<OneOrMany<SegmentDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentDto {
    pub composition: Option<SegmentCompositionDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentCompositionDto {
    pub units: Option<UnitsDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitsDto {
    pub unit: Option<OneOrMany<UnitDto>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitDto {
    pub id: Option<NumString>,
    #[serde(rename = "materialType")]
    pub material_type: Option<MaterialTypeDto>,
}

/// Material type, served either as a bare label or a typed object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MaterialTypeDto {
    Name(String),
    Typed {
        parent_type: Option<String>,
        sub_type: Option<String>,
    },
}

impl MaterialTypeDto {
    /// The best available label for classification and display.
    pub fn label(&self) -> Option<&str> {
        match self {
            MaterialTypeDto::Name(name) => Some(name),
            MaterialTypeDto::Typed { parent_type, .. } => parent_type.as_deref(),
        }
    }
}

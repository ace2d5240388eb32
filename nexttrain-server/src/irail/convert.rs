//! Conversion from iRail DTOs to domain types.
//!
//! All duck-typed and stringly upstream data is normalized here. Individual
//! entries that cannot be made sense of are skipped with a warning rather
//! than failing the whole response.

use tracing::warn;

use crate::domain::{
    BoardEntry, BoardMode, Composition, Disturbance, Occupancy, ServiceDay, Station, Stop, Unit,
    UnitKind, VehicleId, VehicleJourney,
};
use crate::geo::Coordinates;

use super::types::{
    BoardEntryDto, CompositionResponse, DisturbancesResponse, LiveboardResponse, OneOrMany,
    StationDto, StationsResponse, VehicleResponse,
};

/// Coerce an optional duck-typed collection to a sequence.
fn seq<T>(value: Option<OneOrMany<T>>) -> Vec<T> {
    value.map(OneOrMany::into_vec).unwrap_or_default()
}

/// Convert the station directory response.
pub fn stations(resp: StationsResponse) -> Vec<Station> {
    seq(resp.station).into_iter().filter_map(station).collect()
}

fn station(dto: StationDto) -> Option<Station> {
    let name = dto
        .standardname
        .or(dto.name)
        .filter(|name| !name.is_empty())?;

    let coords = match (
        dto.location_y.as_ref().and_then(|v| v.as_f64()),
        dto.location_x.as_ref().and_then(|v| v.as_f64()),
    ) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };

    Some(Station::new(name, coords))
}

/// Convert the disturbances response.
pub fn disturbances(resp: DisturbancesResponse) -> Vec<Disturbance> {
    seq(resp.disturbance)
        .into_iter()
        .filter_map(|dto| {
            let title = dto.title?;
            Some(Disturbance {
                title,
                description: dto.description.unwrap_or_default(),
            })
        })
        .collect()
}

/// Extract the entries of a liveboard response for the requested mode.
///
/// The upstream nests departures under `departures.departure` and arrivals
/// under `arrivals.arrival`; an absent block means an empty board.
pub fn board_entries(resp: LiveboardResponse, mode: BoardMode) -> Vec<BoardEntry> {
    let raw = match mode {
        BoardMode::Departure => seq(resp.departures.and_then(|block| block.departure)),
        BoardMode::Arrival => seq(resp.arrivals.and_then(|block| block.arrival)),
    };

    raw.into_iter().filter_map(board_entry).collect()
}

fn board_entry(dto: BoardEntryDto) -> Option<BoardEntry> {
    let raw_vehicle = dto
        .vehicle
        .clone()
        .or_else(|| dto.vehicleinfo.as_ref().and_then(|info| info.name.clone()))?;

    let vehicle = match VehicleId::parse(&raw_vehicle) {
        Ok(id) => id,
        Err(err) => {
            warn!(%raw_vehicle, %err, "skipping board entry with unusable vehicle id");
            return None;
        }
    };

    let Some(time) = dto.time.as_ref().and_then(|v| v.as_i64()) else {
        warn!(%raw_vehicle, "skipping board entry without a parseable time");
        return None;
    };

    let direction = dto
        .direction
        .and_then(|d| d.name)
        .or(dto.station)
        .or_else(|| dto.stationinfo.and_then(|info| info.standardname.or(info.name)));

    Some(BoardEntry {
        vehicle,
        raw_vehicle,
        time,
        delay_secs: dto.delay.as_ref().and_then(|v| v.as_i64()).unwrap_or(0),
        platform: dto.platform.filter(|p| !p.is_empty()),
        canceled: dto.canceled.as_ref().is_some_and(|v| v.as_flag()),
        occupancy: Occupancy::from_name(
            dto.occupancy.as_ref().and_then(|o| o.name.as_deref()),
        ),
        direction,
    })
}

/// Convert a vehicle response into an itinerary for `(vehicle, day)`.
pub fn vehicle_journey(
    resp: VehicleResponse,
    vehicle: &VehicleId,
    day: ServiceDay,
) -> VehicleJourney {
    let stops = seq(resp.stops.and_then(|block| block.stop))
        .into_iter()
        .filter_map(|dto| {
            let station = dto.station.filter(|s| !s.is_empty())?;
            let Some(time) = dto.time.as_ref().and_then(|v| v.as_i64()) else {
                warn!(%station, "skipping stop without a parseable time");
                return None;
            };

            Some(Stop {
                station,
                time,
                delay_secs: dto.delay.as_ref().and_then(|v| v.as_i64()).unwrap_or(0),
                platform: dto.platform.filter(|p| !p.is_empty()),
                canceled: dto.canceled.as_ref().is_some_and(|v| v.as_flag()),
            })
        })
        .collect();

    VehicleJourney {
        vehicle: vehicle.clone(),
        day,
        stops,
    }
}

/// Flatten a composition response into a deduplicated unit sequence.
pub fn composition(resp: CompositionResponse) -> Composition {
    let segments = seq(resp
        .composition
        .and_then(|c| c.segments)
        .and_then(|s| s.segment));

    let units = segments
        .into_iter()
        .flat_map(|segment| {
            seq(segment
                .composition
                .and_then(|c| c.units)
                .and_then(|u| u.unit))
        })
        .map(|dto| {
            let material_type = dto
                .material_type
                .as_ref()
                .and_then(|m| m.label())
                .unwrap_or("?")
                .to_string();

            Unit {
                id: dto.id.map(|id| id.0),
                kind: UnitKind::classify(&material_type),
                material_type,
            }
        });

    Composition::from_units(units)
}

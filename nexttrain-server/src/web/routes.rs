//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::Local;
use tracing::warn;

use crate::cache::VehicleRecord;
use crate::domain::{BoardEntry, BoardMode, ServiceDay, VehicleId};
use crate::geo::{Coordinates, FIRST_VISIT_MAX_KM, LOCATE_MAX_KM};
use crate::resolver::{ResolveError, assemble_board, resolve_train_number};
use crate::snapshot::{BOARD_SNAPSHOT_TTL, board_key};
use crate::stations::MAX_SEARCH_RESULTS;

use super::dto::*;
use super::state::AppState;

/// Most disturbances shown on one board.
const MAX_BOARD_DISTURBANCES: usize = 3;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/board", get(board))
        .route("/api/vehicle", get(vehicle_detail))
        .route("/api/search/train", get(search_train))
        .route("/api/stations/search", get(search_stations))
        .route("/api/stations/nearest", get(nearest_station))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Assemble the live board for a station.
///
/// A live assembly refreshes the durable snapshot and re-points the
/// background poller at this (station, mode). When the live fetch fails
/// for anything other than an unknown station, a recent snapshot is
/// served instead, marked `stale`.
async fn board(
    State(state): State<AppState>,
    Query(req): Query<BoardQuery>,
) -> Result<Json<BoardResponse>, AppError> {
    let mode = match &req.mode {
        Some(raw) => raw.parse::<BoardMode>().map_err(|_| AppError::BadRequest {
            message: format!("unknown board mode: {raw}"),
        })?,
        None => BoardMode::Departure,
    };

    // Map free-form input onto the canonical standardname when the
    // directory knows it; otherwise let the upstream resolve the name.
    let station = match state.stations.get(&req.station).await {
        Some(known) => known.name,
        None => req.station.clone(),
    };

    let (trains, stale) = match assemble_board(
        state.irail.as_ref(),
        &station,
        mode,
        Local::now(),
        &state.resolver,
    )
    .await
    {
        Ok(entries) => {
            if let Some(store) = &state.snapshots {
                store.store(&board_key(&station, mode), &entries);
            }
            state.watch_board(&station, mode).await;
            (entries, false)
        }
        Err(err) if err.is_station_not_found() => {
            return Err(AppError::NotFound {
                message: format!("station not found: {station}"),
            });
        }
        Err(err) => {
            let fallback: Option<Vec<BoardEntry>> = state
                .snapshots
                .as_ref()
                .and_then(|store| store.load(&board_key(&station, mode), BOARD_SNAPSHOT_TTL));
            match fallback {
                Some(entries) => {
                    warn!(%station, %err, "live board failed, serving stale snapshot");
                    (entries, true)
                }
                None => {
                    return Err(AppError::Upstream {
                        message: err.to_string(),
                    });
                }
            }
        }
    };

    // Disturbances are optional data: a failed fetch means an empty banner.
    let disturbances = match state.irail.disturbances().await {
        Ok(all) => all,
        Err(err) => {
            warn!(%err, "disturbances fetch failed");
            Vec::new()
        }
    };
    let disturbances = disturbances
        .iter()
        .filter(|d| d.concerns(&station))
        .take(MAX_BOARD_DISTURBANCES)
        .map(DisturbanceView::from_disturbance)
        .collect();

    Ok(Json(BoardResponse {
        station,
        mode: mode.as_str(),
        stale,
        trains: trains.iter().map(TrainView::from_entry).collect(),
        disturbances,
    }))
}

/// Itinerary and composition for one vehicle on one day.
///
/// Served from the detail cache when a record for this exact
/// (vehicle, day) pair is fresh. The itinerary is required; the
/// composition is optional data and its failure only drops the units
/// from the response.
async fn vehicle_detail(
    State(state): State<AppState>,
    Query(req): Query<VehicleQuery>,
) -> Result<Json<VehicleDetailResponse>, AppError> {
    let id = VehicleId::parse(&req.id).map_err(|err| AppError::BadRequest {
        message: err.to_string(),
    })?;
    let day = match &req.date {
        Some(raw) => ServiceDay::parse_ddmmyy(raw).map_err(|err| AppError::BadRequest {
            message: err.to_string(),
        })?,
        None => ServiceDay::today(),
    };

    if let Some(record) = state.details.get(&id, day).await {
        return Ok(Json(VehicleDetailResponse::from_record(
            id.as_str(),
            day.ddmmyy(),
            &record,
        )));
    }

    let (journey, composition) =
        tokio::join!(state.irail.vehicle(&id, day), state.irail.composition(&id, day));

    let journey = match journey {
        Ok(journey) => journey,
        Err(err) if err.is_not_found() => {
            return Err(AppError::NotFound {
                message: format!("no vehicle {id} on {day}"),
            });
        }
        Err(err) => {
            return Err(AppError::Upstream {
                message: err.to_string(),
            });
        }
    };

    let composition = match composition {
        Ok(comp) if !comp.is_empty() => Some(comp),
        Ok(_) => None,
        Err(err) => {
            warn!(vehicle = id.as_str(), %err, "composition fetch failed");
            None
        }
    };

    let record = Arc::new(VehicleRecord {
        journey: Some(journey),
        composition,
    });
    state.details.insert(id.clone(), day, record.clone()).await;

    Ok(Json(VehicleDetailResponse::from_record(
        id.as_str(),
        day.ddmmyy(),
        &record,
    )))
}

/// Resolve a bare train number to a vehicle and day.
async fn search_train(
    State(state): State<AppState>,
    Query(req): Query<TrainSearchQuery>,
) -> Result<Json<TrainSearchResponse>, AppError> {
    let found = resolve_train_number(
        state.irail.as_ref(),
        &req.q,
        ServiceDay::today(),
        &state.search,
        &state.resolver,
    )
    .await
    .map_err(|err| match err {
        ResolveError::EmptyQuery => AppError::BadRequest {
            message: "train number must contain digits".to_string(),
        },
        ResolveError::NoMatch => AppError::NotFound {
            message: format!("no train found for \"{}\"", req.q),
        },
        ResolveError::Upstream(err) => AppError::Upstream {
            message: err.to_string(),
        },
    })?;

    Ok(Json(TrainSearchResponse::from_match(&found)))
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchQuery>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(MAX_SEARCH_RESULTS);
    let stations = state
        .stations
        .search(&req.q, limit)
        .await
        .iter()
        .map(StationView::from_station)
        .collect();

    Json(StationSearchResponse { stations })
}

/// The station nearest to the given position.
///
/// A match beyond the distance threshold is rejected as "too far";
/// `first_visit=true` selects the looser threshold used for the silent
/// locate on a first visit.
async fn nearest_station(
    State(state): State<AppState>,
    Query(req): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, AppError> {
    let from = Coordinates::new(req.lat, req.lon);
    if !from.is_valid() {
        return Err(AppError::BadRequest {
            message: "coordinates out of range".to_string(),
        });
    }

    let max_km = if req.first_visit {
        FIRST_VISIT_MAX_KM
    } else {
        LOCATE_MAX_KM
    };

    match state.stations.nearest(from).await {
        Some((station, distance_km)) if distance_km <= max_km => Ok(Json(NearestResponse {
            station: StationView::from_station(&station),
            distance_km,
        })),
        Some((station, distance_km)) => Err(AppError::NotFound {
            message: format!(
                "nearest station {} is {distance_km:.1} km away, beyond the {max_km:.0} km limit",
                station.name
            ),
        }),
        None => Err(AppError::NotFound {
            message: "no station with known coordinates".to_string(),
        }),
    }
}

/// Application error type.
///
/// `NotFound` carries the user-facing "station not found" / "no train
/// found" messages; transport failures surface their raw error text
/// under `Upstream` so the two stay distinguishable.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Upstream { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "request failed");

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

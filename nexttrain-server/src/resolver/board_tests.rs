//! Board assembly tests against scripted liveboard slices.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};

use crate::domain::{BoardEntry, BoardMode, Occupancy, ServiceDay, VehicleId};
use crate::irail::IrailError;

use super::board::{BoardSource, assemble_board};
use super::config::ResolverConfig;
use super::error::ResolveError;

/// Serves a scripted sequence of slices and records every request.
/// Once the script runs out it serves empty slices.
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Vec<BoardEntry>, IrailError>>>,
    requests: Mutex<Vec<(ServiceDay, NaiveTime)>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<Vec<BoardEntry>, IrailError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<(ServiceDay, NaiveTime)> {
        self.requests.lock().unwrap().clone()
    }
}

impl BoardSource for ScriptedSource {
    async fn fetch_board(
        &self,
        _station: &str,
        _mode: BoardMode,
        day: ServiceDay,
        time: NaiveTime,
    ) -> Result<Vec<BoardEntry>, IrailError> {
        self.requests.lock().unwrap().push((day, time));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

fn local(day: u32, h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local
        .from_local_datetime(&date(day).and_hms_opt(h, m, s).unwrap())
        .single()
        .unwrap()
}

fn epoch(day: u32, h: u32, m: u32) -> i64 {
    local(day, h, m, 0).timestamp()
}

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

async fn assemble(
    source: &ScriptedSource,
    now: DateTime<Local>,
    config: &ResolverConfig,
) -> Result<Vec<BoardEntry>, ResolveError> {
    assemble_board(source, "Libramont", BoardMode::Departure, now, config).await
}

#[tokio::test]
async fn one_full_page_is_enough() {
    let source = ScriptedSource::new(vec![Ok(vec![
        entry("BE.NMBS.IC2120", epoch(15, 10, 5)),
        entry("BE.NMBS.L562", epoch(15, 10, 20)),
        entry("BE.NMBS.IC2121", epoch(15, 10, 40)),
        entry("BE.NMBS.P8008", epoch(15, 11, 0)),
    ])]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    assert_eq!(board[0].vehicle.as_str(), "BE.NMBS.IC2120");
    assert_eq!(source.requests().len(), 1);
}

#[tokio::test]
async fn truncates_to_minimum_count() {
    let source = ScriptedSource::new(vec![Ok((0..7)
        .map(|i| entry(&format!("BE.NMBS.IC210{i}"), epoch(15, 10, 5 + i)))
        .collect())]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    assert_eq!(board[3].vehicle.as_str(), "BE.NMBS.IC2103");
}

#[tokio::test]
async fn accumulates_across_pages_and_advances_cursor() {
    let source = ScriptedSource::new(vec![
        Ok(vec![
            entry("BE.NMBS.IC2120", epoch(15, 10, 5)),
            entry("BE.NMBS.L562", epoch(15, 10, 30)),
        ]),
        Ok(vec![
            entry("BE.NMBS.IC2121", epoch(15, 11, 0)),
            entry("BE.NMBS.P8008", epoch(15, 11, 20)),
        ]),
    ]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    // Cursor lands two minutes past the last accepted entry (10:30).
    assert_eq!(requests[1].0, ServiceDay::new(date(15)));
    assert_eq!(requests[1].1, NaiveTime::from_hms_opt(10, 32, 0).unwrap());
}

#[tokio::test]
async fn duplicates_within_a_slice_are_dropped() {
    let source = ScriptedSource::new(vec![Ok(vec![
        entry("BE.NMBS.IC529", epoch(15, 10, 5)),
        entry("BE.NMBS.IC529", epoch(15, 10, 5)),
        entry("BE.NMBS.L562", epoch(15, 10, 20)),
        entry("BE.NMBS.IC2121", epoch(15, 10, 40)),
        entry("BE.NMBS.P8008", epoch(15, 11, 0)),
    ])]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    let ic529_count = board
        .iter()
        .filter(|e| e.vehicle.as_str() == "BE.NMBS.IC529")
        .count();
    assert_eq!(ic529_count, 1);
}

#[tokio::test]
async fn duplicates_across_pages_are_dropped() {
    // A cursor step shorter than the lookback makes consecutive pages
    // overlap, so the same entry arrives twice and must be merged once.
    let config = ResolverConfig {
        cursor_step_secs: 0,
        ..ResolverConfig::default()
    };

    let duplicated = entry("BE.NMBS.IC529", epoch(15, 10, 30));
    let source = ScriptedSource::new(vec![
        Ok(vec![
            entry("BE.NMBS.IC2120", epoch(15, 10, 5)),
            duplicated.clone(),
        ]),
        Ok(vec![
            duplicated.clone(),
            entry("BE.NMBS.IC2121", epoch(15, 11, 0)),
            entry("BE.NMBS.P8008", epoch(15, 11, 20)),
        ]),
    ]);

    let board = assemble(&source, local(15, 10, 0, 0), &config).await.unwrap();

    assert_eq!(board.len(), 4);
    let ic529_count = board
        .iter()
        .filter(|e| e.dedup_key() == duplicated.dedup_key())
        .count();
    assert_eq!(ic529_count, 1);
}

#[tokio::test]
async fn entries_behind_the_cursor_are_discarded() {
    let source = ScriptedSource::new(vec![Ok(vec![
        // 90 seconds before "now": beyond the 60 second lookback.
        entry("BE.NMBS.IC1111", epoch(15, 10, 0) - 90),
        entry("BE.NMBS.IC2120", epoch(15, 10, 5)),
        entry("BE.NMBS.L562", epoch(15, 10, 20)),
        entry("BE.NMBS.IC2121", epoch(15, 10, 40)),
        entry("BE.NMBS.P8008", epoch(15, 11, 0)),
    ])]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|e| e.vehicle.as_str() != "BE.NMBS.IC1111"));
}

#[tokio::test]
async fn empty_slice_advances_two_hours() {
    let source = ScriptedSource::new(vec![
        Ok(Vec::new()),
        Ok(vec![
            entry("BE.NMBS.IC2120", epoch(15, 12, 10)),
            entry("BE.NMBS.L562", epoch(15, 12, 30)),
            entry("BE.NMBS.IC2121", epoch(15, 12, 50)),
            entry("BE.NMBS.P8008", epoch(15, 13, 10)),
        ]),
    ]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);

    let requests = source.requests();
    assert_eq!(requests[1].1, NaiveTime::from_hms_opt(12, 0, 0).unwrap());
}

#[tokio::test]
async fn http_400_skips_one_hour_without_aborting() {
    let source = ScriptedSource::new(vec![
        Err(IrailError::HttpStatus(400)),
        Ok(vec![
            entry("BE.NMBS.IC2120", epoch(15, 11, 10)),
            entry("BE.NMBS.L562", epoch(15, 11, 30)),
            entry("BE.NMBS.IC2121", epoch(15, 11, 50)),
            entry("BE.NMBS.P8008", epoch(15, 12, 10)),
        ]),
    ]);

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);

    let requests = source.requests();
    assert_eq!(requests[1].1, NaiveTime::from_hms_opt(11, 0, 0).unwrap());
}

#[tokio::test]
async fn other_upstream_errors_abort() {
    let source = ScriptedSource::new(vec![Err(IrailError::HttpStatus(500))]);
    let result = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default()).await;
    assert!(matches!(
        result,
        Err(ResolveError::Upstream(IrailError::HttpStatus(500)))
    ));

    let source = ScriptedSource::new(vec![Err(IrailError::Timeout)]);
    let result = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default()).await;
    assert!(matches!(
        result,
        Err(ResolveError::Upstream(IrailError::Timeout))
    ));
}

#[tokio::test]
async fn station_not_found_aborts() {
    let source = ScriptedSource::new(vec![Err(IrailError::HttpStatus(404))]);
    let result = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default()).await;
    assert!(result.err().unwrap().is_station_not_found());
}

#[tokio::test]
async fn iteration_bound_stops_the_loop() {
    // The script is empty, so every slice comes back empty.
    let source = ScriptedSource::new(Vec::new());

    let board = assemble(&source, local(15, 10, 0, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert!(board.is_empty());
    assert_eq!(source.requests().len(), 10);
}

#[tokio::test]
async fn rolls_over_to_next_day_when_today_is_exhausted() {
    let tomorrow_entries = vec![
        entry("BE.NMBS.L100", epoch(16, 0, 10)),
        entry("BE.NMBS.L101", epoch(16, 0, 40)),
        entry("BE.NMBS.L102", epoch(16, 1, 10)),
        entry("BE.NMBS.L103", epoch(16, 1, 40)),
    ];

    let source = ScriptedSource::new(vec![
        // Late evening: the board only holds after-midnight trains.
        Ok(vec![tomorrow_entries[0].clone(), tomorrow_entries[1].clone()]),
        Ok(tomorrow_entries.clone()),
    ]);

    let board = assemble(&source, local(15, 23, 30, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|e| {
        e.day().unwrap() == ServiceDay::new(date(16))
    }));

    let requests = source.requests();
    assert_eq!(requests.len(), 2);
    // The rollover jumps to the start of the following day.
    assert_eq!(requests[1].0, ServiceDay::new(date(16)));
    assert_eq!(requests[1].1, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
}

#[tokio::test]
async fn mixes_today_and_tomorrow_after_rollover() {
    let source = ScriptedSource::new(vec![
        Ok(vec![entry("BE.NMBS.IC2120", epoch(15, 23, 35))]),
        // Today's board is dry; only a stray after-midnight train shows up.
        Ok(vec![entry("BE.NMBS.L100", epoch(16, 0, 15))]),
        Ok(vec![
            entry("BE.NMBS.L100", epoch(16, 0, 15)),
            entry("BE.NMBS.L101", epoch(16, 0, 45)),
            entry("BE.NMBS.L102", epoch(16, 1, 15)),
        ]),
    ]);

    let board = assemble(&source, local(15, 23, 30, 0), &ResolverConfig::default())
        .await
        .unwrap();

    assert_eq!(board.len(), 4);
    assert_eq!(board[0].vehicle.as_str(), "BE.NMBS.IC2120");
    assert_eq!(board[1].vehicle.as_str(), "BE.NMBS.L100");

    let requests = source.requests();
    assert_eq!(requests.len(), 3);
    // Second request: two minutes past IC2120. Third: start of tomorrow.
    assert_eq!(requests[1].1, NaiveTime::from_hms_opt(23, 37, 0).unwrap());
    assert_eq!(requests[2].0, ServiceDay::new(date(16)));
    assert_eq!(requests[2].1, NaiveTime::from_hms_opt(0, 0, 0).unwrap());
}

#[tokio::test]
async fn stray_past_day_entry_still_rolls_forward() {
    // Shortly after midnight the upstream may still serve yesterday's
    // board tail. The rollover must never move backwards because of it.
    let source = ScriptedSource::new(vec![
        Ok(vec![entry("BE.NMBS.L999", epoch(15, 0, 0) - 15)]),
        Ok(vec![
            entry("BE.NMBS.L100", epoch(16, 0, 10)),
            entry("BE.NMBS.L101", epoch(16, 0, 40)),
            entry("BE.NMBS.L102", epoch(16, 1, 10)),
            entry("BE.NMBS.L103", epoch(16, 1, 40)),
        ]),
    ]);

    let board = assemble(&source, local(15, 0, 0, 30), &ResolverConfig::default())
        .await
        .unwrap();

    let requests = source.requests();
    assert_eq!(requests[1].0, ServiceDay::new(date(16)));

    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|e| e.day().unwrap() == ServiceDay::new(date(16))));
}

#[tokio::test]
async fn late_evening_with_todays_trains_does_not_roll_over() {
    let source = ScriptedSource::new(vec![Ok(vec![
        entry("BE.NMBS.IC2120", epoch(15, 23, 35)),
        entry("BE.NMBS.L100", epoch(16, 0, 15)),
        entry("BE.NMBS.IC2121", epoch(15, 23, 50)),
        entry("BE.NMBS.L101", epoch(16, 0, 45)),
        entry("BE.NMBS.IC2122", epoch(15, 23, 55)),
        entry("BE.NMBS.IC2123", epoch(15, 23, 58)),
    ])]);

    let board = assemble(&source, local(15, 23, 30, 0), &ResolverConfig::default())
        .await
        .unwrap();

    // Today still has four trains; tomorrow's strays are not used.
    assert_eq!(board.len(), 4);
    assert!(board.iter().all(|e| e.day().unwrap() == ServiceDay::new(date(15))));
}

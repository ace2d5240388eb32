//! Board assembly: minimum-count fill with day rollover.
//!
//! A single liveboard slice often holds too few upcoming trains, and near
//! midnight today's board runs dry entirely. Assembly pages through time
//! slices, partitions entries by the calendar day *derived from their
//! scheduled time* (the query date is only a pagination hint), and rolls
//! forward to the next day when today has nothing left.
//!
//! Cursor advancement is strictly sequential: each iteration depends on
//! the entries accepted by the previous one.

use chrono::{DateTime, Local, NaiveTime, TimeZone};
use tracing::{debug, warn};

use crate::domain::{BoardEntry, BoardMode, ServiceDay};
use crate::irail::{IrailClient, IrailError};

use super::config::ResolverConfig;
use super::error::ResolveError;

/// Source of liveboard slices.
///
/// Abstracts the HTTP client so assembly can be tested against scripted
/// boards.
#[allow(async_fn_in_trait)]
pub trait BoardSource {
    /// Fetch the board slice for a station starting at (day, time).
    async fn fetch_board(
        &self,
        station: &str,
        mode: BoardMode,
        day: ServiceDay,
        time: NaiveTime,
    ) -> Result<Vec<BoardEntry>, IrailError>;
}

impl BoardSource for IrailClient {
    async fn fetch_board(
        &self,
        station: &str,
        mode: BoardMode,
        day: ServiceDay,
        time: NaiveTime,
    ) -> Result<Vec<BoardEntry>, IrailError> {
        self.liveboard(station, mode, Some(day), Some(time)).await
    }
}

/// Assemble a deduplicated board of at most `config.min_trains` upcoming
/// movements for a station, starting from `now`.
///
/// Behavior per slice:
/// - HTTP 400 means "no data for this exact time slice": advance one hour
///   and retry. Any other upstream error aborts the whole assembly.
/// - An empty slice advances the cursor two hours.
/// - Entries scheduled more than `lookback_secs` before the cursor are
///   discarded.
/// - Until the rollover, only entries whose derived day is today are
///   accepted. When today yields nothing and either the slice held
///   other-day entries or the query has moved past today, the cursor
///   jumps to the start of the *next* day (forward only, regardless of
///   which day the stray entries were on) and both partitions become
///   acceptable fill.
/// - Duplicates under (vehicle, time, raw vehicle) equality are dropped.
///
/// Stops after `config.max_loops` slices at the latest and truncates to
/// exactly `config.min_trains` entries.
pub async fn assemble_board<S: BoardSource>(
    source: &S,
    station: &str,
    mode: BoardMode,
    now: DateTime<Local>,
    config: &ResolverConfig,
) -> Result<Vec<BoardEntry>, ResolveError> {
    let today = ServiceDay::of(&now);
    let mut collected: Vec<BoardEntry> = Vec::new();
    let mut cursor = now;
    let mut allow_next_day = false;
    let mut loops = 0;

    while collected.len() < config.min_trains && loops < config.max_loops {
        loops += 1;

        let query_day = ServiceDay::of(&cursor);
        let slice = match source
            .fetch_board(station, mode, query_day, cursor.time())
            .await
        {
            Ok(slice) => slice,
            Err(err) if err.is_bad_request() => {
                debug!(station, %query_day, "slice rejected upstream, skipping ahead");
                cursor += config.rejected_advance();
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if slice.is_empty() {
            cursor += config.empty_advance();
            continue;
        }

        let min_time = cursor.timestamp() - config.lookback_secs;
        let mut todays: Vec<BoardEntry> = Vec::new();
        let mut others: Vec<BoardEntry> = Vec::new();

        for entry in slice {
            if entry.time < min_time {
                continue;
            }
            match entry.day() {
                Some(day) if day == today => todays.push(entry),
                Some(_) => others.push(entry),
                None => {
                    warn!(vehicle = entry.vehicle.as_str(), "entry time out of range");
                }
            }
        }

        let batch: Vec<BoardEntry> = if allow_next_day {
            todays.into_iter().chain(others).collect()
        } else if todays.is_empty() {
            if !others.is_empty() || query_day != today {
                // Today's board is exhausted. Roll forward to the start of
                // tomorrow; stray entries from other days (even earlier
                // ones) become acceptable fill from here on.
                allow_next_day = true;
                match start_of_next_day(today, cursor) {
                    Some(next) => cursor = next,
                    None => break,
                }
                continue;
            } else {
                cursor += config.empty_advance();
                continue;
            }
        } else {
            todays
        };

        if batch.is_empty() {
            cursor += config.empty_advance();
            continue;
        }

        let last_time = batch.last().map(|entry| entry.time).unwrap_or(min_time);

        for entry in batch {
            let is_duplicate = collected
                .iter()
                .any(|existing| existing.dedup_key() == entry.dedup_key());
            if !is_duplicate {
                collected.push(entry);
            }
        }

        match local_from_epoch(last_time + config.cursor_step_secs) {
            Some(next) => cursor = next,
            None => break,
        }
    }

    collected.truncate(config.min_trains);
    Ok(collected)
}

/// Convert epoch seconds to a local datetime.
fn local_from_epoch(secs: i64) -> Option<DateTime<Local>> {
    DateTime::from_timestamp(secs, 0).map(|utc| utc.with_timezone(&Local))
}

/// Local midnight at the start of the day after `today`.
///
/// Falls back to a plain two-hour advance when midnight cannot be
/// represented (a DST gap, at worst).
fn start_of_next_day(today: ServiceDay, cursor: DateTime<Local>) -> Option<DateTime<Local>> {
    let next = today.succ()?;
    let midnight = next.date().and_hms_opt(0, 0, 0)?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .or_else(|| cursor.checked_add_signed(chrono::Duration::hours(2)))
}

//! Calendar-day handling for the upstream API.
//!
//! iRail addresses liveboards, vehicles and compositions by calendar day,
//! passed as a compact `ddmmyy` parameter. Train numbers repeat every day,
//! so the day is part of the identity of a vehicle run: `(vehicle, day)`
//! keys the detail cache and the global search, and entries for one day
//! must never be served for another.

use std::fmt;

use chrono::{DateTime, Local, NaiveDate};

/// Error returned when parsing an invalid `ddmmyy` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ddmmyy day: {reason}")]
pub struct InvalidDay {
    reason: &'static str,
}

impl InvalidDay {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// A calendar day as used by the upstream API.
///
/// Wraps a `NaiveDate`. The local timezone is applied exactly once, when a
/// day is derived from an epoch timestamp (`from_epoch`) or from the wall
/// clock (`today`); all other operations are timezone-free.
///
/// # Examples
///
/// ```
/// use nexttrain_server::domain::ServiceDay;
/// use chrono::NaiveDate;
///
/// let day = ServiceDay::new(NaiveDate::from_ymd_opt(2026, 8, 4).unwrap());
/// assert_eq!(day.ddmmyy(), "040826");
/// assert_eq!(ServiceDay::parse_ddmmyy("040826").unwrap(), day);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceDay(NaiveDate);

impl ServiceDay {
    /// Create a day from a date.
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The current local calendar day.
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Derive the local calendar day of an epoch-seconds timestamp.
    ///
    /// Returns `None` for timestamps outside the representable range.
    pub fn from_epoch(secs: i64) -> Option<Self> {
        let utc = DateTime::from_timestamp(secs, 0)?;
        Some(Self(utc.with_timezone(&Local).date_naive()))
    }

    /// The day of a local datetime.
    pub fn of(dt: &DateTime<Local>) -> Self {
        Self(dt.date_naive())
    }

    /// Returns the wrapped date.
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Format as the upstream `ddmmyy` parameter.
    pub fn ddmmyy(&self) -> String {
        self.0.format("%d%m%y").to_string()
    }

    /// Parse a `ddmmyy` string. Years map into 2000-2099.
    pub fn parse_ddmmyy(s: &str) -> Result<Self, InvalidDay> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDay::new("expected exactly six digits"));
        }

        let num = |range: std::ops::Range<usize>| -> u32 {
            s[range].parse().expect("digits checked above")
        };

        let day = num(0..2);
        let month = num(2..4);
        let year = 2000 + num(4..6) as i32;

        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| InvalidDay::new("no such calendar day"))
    }

    /// The previous calendar day.
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// The next calendar day.
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }
}

impl fmt::Debug for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceDay({})", self.0)
    }
}

impl fmt::Display for ServiceDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

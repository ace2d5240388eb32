//! iRail HTTP client.
//!
//! This module provides the client for the public iRail API
//! (<https://api.irail.be>), which serves Belgian railway open data.
//!
//! Key characteristics of iRail:
//! - Collections are duck-typed: a field holding one element arrives as an
//!   object, several elements arrive as an array. `types::OneOrMany`
//!   absorbs this; nothing outside this module ever sees it.
//! - Numbers arrive as JSON strings (`"time": "1700000000"`).
//! - Dates are passed as compact `ddmmyy` strings, times as `HHMM`.
//! - A liveboard query for a time slice with no data answers HTTP 400.

mod client;
mod convert;
mod error;
mod types;

pub use client::{IrailClient, IrailConfig};
pub use error::IrailError;
pub use types::{
    BoardEntryDto, CompositionResponse, DisturbancesResponse, LiveboardResponse, NumString,
    OneOrMany, StationsResponse, VehicleResponse,
};

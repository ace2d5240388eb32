//! Live departure and arrival boards for Belgian railway stations.
//!
//! A web application wrapping the public iRail API: per-station liveboards
//! with minimum-count fill across the day boundary, vehicle itinerary and
//! composition lookups, and global train-number search probing operator
//! prefixes over a three-day window.

pub mod cache;
pub mod domain;
pub mod geo;
pub mod irail;
pub mod poll;
pub mod resolver;
pub mod snapshot;
pub mod stations;
pub mod web;

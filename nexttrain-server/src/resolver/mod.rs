//! Train resolution.
//!
//! Two operations build on the liveboard and vehicle endpoints:
//!
//! - **Board assembly** ([`assemble_board`]): produce a deduplicated,
//!   minimum-size list of upcoming movements for a station, paging through
//!   time slices and rolling over to the next day when today's board runs
//!   out.
//! - **Global train-number search** ([`resolve_train_number`]): resolve a
//!   bare number like `2120` to a concrete vehicle and day by probing
//!   operator-prefix candidates across a three-day window with bounded
//!   concurrency.

mod board;
mod config;
mod error;
mod search;

#[cfg(test)]
mod board_tests;

pub use board::{BoardSource, assemble_board};
pub use config::ResolverConfig;
pub use error::ResolveError;
pub use search::{
    OPERATOR_PREFIXES, SearchMatch, VehicleSource, candidate_ids, resolve_train_number,
    strip_to_digits,
};

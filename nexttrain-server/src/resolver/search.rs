//! Global train-number search.
//!
//! Resolves a bare number like `2120` to a concrete vehicle and calendar
//! day. The number alone names neither: the operator prefix is unknown
//! (`IC2120`? `P2120`?) and around midnight the run may belong to
//! yesterday's or tomorrow's schedule. So the search enumerates candidate
//! identifiers over the known prefixes and probes them against the
//! vehicle endpoint, day by day over (today, yesterday, tomorrow), with a
//! bounded number of in-flight requests. The first candidate with a
//! non-empty stop list wins and cancels the remaining probes of that day.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::cache::{CachedSearch, SearchCache, SearchHit};
use crate::domain::{ServiceDay, VehicleId, VehicleJourney};
use crate::irail::{IrailClient, IrailError};

use super::config::ResolverConfig;
use super::error::ResolveError;

/// Operator/category prefixes tried during global search, most common
/// passenger services first to keep average latency down.
pub const OPERATOR_PREFIXES: [&str; 10] =
    ["IC", "S", "L", "P", "IR", "EC", "ICE", "THA", "ICT", "EXT"];

/// Source of vehicle itineraries.
///
/// Abstracts the HTTP client so the search can be tested against scripted
/// vehicles.
#[allow(async_fn_in_trait)]
pub trait VehicleSource {
    /// Fetch the itinerary for a vehicle on a day.
    async fn fetch_vehicle(
        &self,
        id: &VehicleId,
        day: ServiceDay,
    ) -> Result<VehicleJourney, IrailError>;
}

impl VehicleSource for IrailClient {
    async fn fetch_vehicle(
        &self,
        id: &VehicleId,
        day: ServiceDay,
    ) -> Result<VehicleJourney, IrailError> {
        self.vehicle(id, day).await
    }
}

/// A resolved train number.
#[derive(Debug, Clone)]
pub struct SearchMatch {
    pub vehicle: VehicleId,
    pub day: ServiceDay,
    pub journey: VehicleJourney,
}

impl From<&SearchHit> for SearchMatch {
    fn from(hit: &SearchHit) -> Self {
        Self {
            vehicle: hit.vehicle.clone(),
            day: hit.day,
            journey: hit.journey.clone(),
        }
    }
}

/// Keep only the digits of user input (`"IC 2120"` becomes `"2120"`).
pub fn strip_to_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Candidate vehicle identifiers for a digit string: every known prefix
/// in namespaced and bare form, deduplicated, common prefixes first.
pub fn candidate_ids(digits: &str) -> Vec<VehicleId> {
    let mut seen = std::collections::HashSet::new();
    let mut candidates = Vec::new();

    for prefix in OPERATOR_PREFIXES {
        for name in [
            format!("BE.NMBS.{prefix}{digits}"),
            format!("{prefix}{digits}"),
        ] {
            if seen.insert(name.clone())
                && let Ok(id) = VehicleId::parse(&name)
            {
                candidates.push(id);
            }
        }
    }

    candidates
}

/// Resolve user input to a vehicle and day across a three-day window.
///
/// Outcomes are cached by digit string: positive matches for the
/// configured positive TTL, exhausted searches for the (much shorter)
/// negative TTL. A cached outcome answers without any network probes.
///
/// A probe answering 404 is a clean per-candidate miss. Any other
/// upstream failure aborts the resolution, so that "no train found" is
/// never reported because of a network problem.
pub async fn resolve_train_number<S: VehicleSource>(
    source: &S,
    input: &str,
    today: ServiceDay,
    cache: &SearchCache,
    config: &ResolverConfig,
) -> Result<SearchMatch, ResolveError> {
    let digits = strip_to_digits(input);
    if digits.is_empty() {
        return Err(ResolveError::EmptyQuery);
    }

    match cache.get(&digits).await {
        Some(CachedSearch::Hit(hit)) => return Ok(SearchMatch::from(hit.as_ref())),
        Some(CachedSearch::Miss) => return Err(ResolveError::NoMatch),
        None => {}
    }

    // Priority order: today first, then yesterday (a run that started
    // before midnight), then tomorrow (a lookup shortly before midnight).
    let mut window = vec![today];
    window.extend(today.pred());
    window.extend(today.succ());

    for day in window {
        if let Some(found) = probe_day(source, &digits, day, config).await? {
            debug!(vehicle = found.vehicle.as_str(), %day, "train number resolved");
            cache
                .record_hit(
                    &digits,
                    Arc::new(SearchHit {
                        vehicle: found.vehicle.clone(),
                        day: found.day,
                        journey: found.journey.clone(),
                    }),
                )
                .await;
            return Ok(found);
        }
    }

    cache.record_miss(&digits).await;
    Err(ResolveError::NoMatch)
}

/// Probe all candidates for one day with bounded concurrency.
///
/// Returns the first candidate whose itinerary has stops. Dropping the
/// probe stream on that first hit cancels the day's remaining in-flight
/// requests at their next suspension point.
async fn probe_day<S: VehicleSource>(
    source: &S,
    digits: &str,
    day: ServiceDay,
    config: &ResolverConfig,
) -> Result<Option<SearchMatch>, ResolveError> {
    let mut probes = stream::iter(candidate_ids(digits))
        .map(|id| async move {
            match source.fetch_vehicle(&id, day).await {
                Ok(journey) if !journey.is_empty() => Ok(Some((id, journey))),
                Ok(_) => Ok(None),
                Err(err) if err.is_not_found() => Ok(None),
                Err(err) => Err(err),
            }
        })
        .buffer_unordered(config.probe_concurrency.max(1));

    while let Some(outcome) = probes.next().await {
        match outcome {
            Ok(Some((vehicle, journey))) => {
                return Ok(Some(SearchMatch {
                    vehicle,
                    day,
                    journey,
                }));
            }
            Ok(None) => {}
            Err(err) => return Err(err.into()),
        }
    }

    Ok(None)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Stripping keeps exactly the digits, in order.
        #[test]
        fn strip_keeps_digit_order(s in "[A-Za-z0-9 .-]{0,20}") {
            let digits = strip_to_digits(&s);
            prop_assert!(digits.bytes().all(|b| b.is_ascii_digit()));

            let expected: String = s.chars().filter(char::is_ascii_digit).collect();
            prop_assert_eq!(digits, expected);
        }

        /// Every candidate embeds the digits and parses back to them.
        #[test]
        fn candidates_embed_digits(digits in "[0-9]{1,4}") {
            for candidate in candidate_ids(&digits) {
                prop_assert!(candidate.as_str().ends_with(&digits));
                prop_assert_eq!(candidate.number(), digits.as_str());
            }
        }

        /// Candidates are unique.
        #[test]
        fn candidates_unique(digits in "[0-9]{1,4}") {
            let candidates = candidate_ids(&digits);
            let unique: std::collections::HashSet<&str> =
                candidates.iter().map(|c| c.as_str()).collect();
            prop_assert_eq!(unique.len(), candidates.len());
        }
    }
}

//! Great-circle distance and nearest-station selection.

use serde::{Deserialize, Serialize};

use crate::domain::Station;

/// Mean Earth radius in kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Maximum distance for a user-initiated locate to accept a station.
pub const LOCATE_MAX_KM: f64 = 15.0;

/// Looser threshold used for the silent first-visit locate.
pub const FIRST_VISIT_MAX_KM: f64 = 50.0;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Whether latitude and longitude are finite and in range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// Haversine distance between two positions, in kilometres.
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    EARTH_RADIUS_KM * 2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Find the station closest to `from` among those with coordinates.
///
/// Returns the station and its distance in kilometres. Thresholding is the
/// caller's concern ([`LOCATE_MAX_KM`], [`FIRST_VISIT_MAX_KM`]).
pub fn nearest<'a, I>(stations: I, from: Coordinates) -> Option<(&'a Station, f64)>
where
    I: IntoIterator<Item = &'a Station>,
{
    let mut best: Option<(&'a Station, f64)> = None;

    for station in stations {
        let Some(coords) = station.coords else {
            continue;
        };
        let dist = distance_km(from, coords);
        if best.is_none_or(|(_, d)| dist < d) {
            best = Some((station, dist));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIBRAMONT: Coordinates = Coordinates {
        lat: 49.9267,
        lon: 5.3763,
    };
    const OOSTENDE: Coordinates = Coordinates {
        lat: 51.2283,
        lon: 2.9258,
    };

    #[test]
    fn zero_distance() {
        assert!(distance_km(LIBRAMONT, LIBRAMONT) < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(LIBRAMONT, OOSTENDE);
        let ba = distance_km(OOSTENDE, LIBRAMONT);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_distance_sanity() {
        // Libramont to Oostende is roughly 230 km as the crow flies.
        let d = distance_km(LIBRAMONT, OOSTENDE);
        assert!(d > 200.0 && d < 260.0, "got {d}");
    }

    #[test]
    fn nearby_user_selects_libramont() {
        let stations = vec![
            Station::new("Libramont", Some(LIBRAMONT)),
            Station::new("Oostende", Some(OOSTENDE)),
            Station::new("No coordinates", None),
        ];

        let user = Coordinates::new(49.93, 5.38);
        let (station, dist) = nearest(&stations, user).unwrap();

        assert_eq!(station.name, "Libramont");
        assert!(dist < LOCATE_MAX_KM);
        assert!(dist < 15.0);
    }

    #[test]
    fn far_user_exceeds_locate_threshold_but_not_first_visit() {
        let stations = vec![Station::new("Libramont", Some(LIBRAMONT))];

        // Roughly 30 km north of Libramont.
        let user = Coordinates::new(50.20, 5.38);
        let (_, dist) = nearest(&stations, user).unwrap();

        assert!(dist > LOCATE_MAX_KM);
        assert!(dist < FIRST_VISIT_MAX_KM);
    }

    #[test]
    fn very_far_user_exceeds_both_thresholds() {
        let stations = vec![Station::new("Libramont", Some(LIBRAMONT))];

        let user = Coordinates::new(51.5, 0.0); // London-ish
        let (_, dist) = nearest(&stations, user).unwrap();

        assert!(dist > FIRST_VISIT_MAX_KM);
    }

    #[test]
    fn no_station_with_coordinates() {
        let stations = vec![Station::new("Nowhere", None)];
        assert!(nearest(&stations, LIBRAMONT).is_none());
    }

    #[test]
    fn empty_station_set() {
        let stations: Vec<Station> = vec![];
        assert!(nearest(&stations, LIBRAMONT).is_none());
    }

    #[test]
    fn coordinate_validation() {
        assert!(Coordinates::new(49.9, 5.3).is_valid());
        assert!(!Coordinates::new(91.0, 5.3).is_valid());
        assert!(!Coordinates::new(49.9, 181.0).is_valid());
        assert!(!Coordinates::new(f64::NAN, 5.3).is_valid());
    }
}

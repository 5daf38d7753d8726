use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use shared::{Coordinate, Distance, MILE_IN_KM};

pub const EARTH_RADIUS_KM: f64 = 6_371.0;

pub fn to_kilometers(miles: f64) -> f64 {
    miles * MILE_IN_KM
}

pub fn to_miles(kilometers: f64) -> f64 {
    kilometers / MILE_IN_KM
}

pub fn is_valid_coordinate(lon: f64, lat: f64) -> bool {
    (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Wrap a longitude into (-180, 180].
pub fn normalize_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 540.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

/// Source of fallback bearings for [`destination_point_random`].
///
/// Production uses the thread RNG; tests pin a seed so projections stay
/// reproducible.
pub trait BearingSampler {
    /// Next bearing in degrees, uniform over [0, 360).
    fn sample_bearing(&mut self) -> f64;
}

#[derive(Debug, Default)]
pub struct RandomBearing;

impl BearingSampler for RandomBearing {
    fn sample_bearing(&mut self) -> f64 {
        rand::rng().random_range(0.0..360.0)
    }
}

#[derive(Debug)]
pub struct SeededBearing(StdRng);

impl SeededBearing {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl BearingSampler for SeededBearing {
    fn sample_bearing(&mut self) -> f64 {
        self.0.random_range(0.0..360.0)
    }
}

/// Project a destination point from `origin` along `bearing_degrees`
/// (clockwise from north) over the given great-circle distance.
///
/// Pure spherical forward projection; identical inputs always produce
/// identical output.
pub fn destination_point(origin: Coordinate, distance: Distance, bearing_degrees: f64) -> Coordinate {
    let angular_distance = distance.as_kilometers() / EARTH_RADIUS_KM;
    let bearing = bearing_degrees.to_radians();
    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();

    // Rounding can push the sine fractionally past 1 near the poles, which
    // would turn asin into NaN.
    let lat2 = f64::asin(
        (lat1.sin() * angular_distance.cos()
            + lat1.cos() * angular_distance.sin() * bearing.cos())
        .clamp(-1.0, 1.0),
    );
    let lon2 = lon1
        + f64::atan2(
            bearing.sin() * angular_distance.sin() * lat1.cos(),
            angular_distance.cos() - lat1.sin() * lat2.sin(),
        );

    Coordinate {
        lat: lat2.to_degrees(),
        lon: normalize_longitude(lon2.to_degrees()),
    }
}

/// [`destination_point`] with the bearing drawn from `sampler`.
pub fn destination_point_random(
    origin: Coordinate,
    distance: Distance,
    sampler: &mut impl BearingSampler,
) -> Coordinate {
    destination_point(origin, distance, sampler.sample_bearing())
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversion_round_trip() {
        for x in [0.5, 1.0, 2.0, 3.1, 26.2] {
            let there_and_back = to_miles(to_kilometers(x));
            assert!((there_and_back - x).abs() / x < 1e-9);
        }
    }

    #[test]
    fn test_is_valid_coordinate() {
        assert!(is_valid_coordinate(-80.8431, 35.2272));
        assert!(is_valid_coordinate(-180.0, -90.0));
        assert!(is_valid_coordinate(180.0, 90.0));
        assert!(!is_valid_coordinate(-180.1, 0.0));
        assert!(!is_valid_coordinate(0.0, 90.5));
    }

    #[test]
    fn test_normalize_longitude() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        // -180 and +180 name the same meridian; the canonical form is +180.
        assert_eq!(normalize_longitude(-180.0), 180.0);
        assert_eq!(normalize_longitude(190.0), -170.0);
        assert_eq!(normalize_longitude(-190.0), 170.0);
        assert_eq!(normalize_longitude(370.0), 10.0);
        assert_eq!(normalize_longitude(-370.0), -10.0);
    }

    #[test]
    fn test_destination_point_north() {
        let start = Coordinate {
            lat: 45.0,
            lon: 5.0,
        };
        let dest = destination_point(start, Distance::kilometers(10.0), 0.0);

        // At 45° latitude, 1° of latitude ≈ 111 km, so 10 km ≈ 0.09°.
        assert!((dest.lat - 45.09).abs() < 0.01);
        assert!((dest.lon - 5.0).abs() < 0.01);
    }

    #[test]
    fn test_destination_point_east() {
        let start = Coordinate {
            lat: 45.0,
            lon: 5.0,
        };
        let dest = destination_point(start, Distance::kilometers(10.0), 90.0);

        assert!((dest.lat - 45.0).abs() < 0.01);
        assert!(dest.lon > 5.0);
        assert!(dest.lon < 5.2);
    }

    #[test]
    fn test_destination_point_south_west() {
        let start = Coordinate {
            lat: 45.0,
            lon: 5.0,
        };
        let south = destination_point(start, Distance::kilometers(10.0), 180.0);
        assert!(south.lat < 45.0);
        assert!((south.lon - 5.0).abs() < 0.01);

        let west = destination_point(start, Distance::kilometers(10.0), 270.0);
        assert!((west.lat - 45.0).abs() < 0.01);
        assert!(west.lon < 5.0);
    }

    #[test]
    fn test_destination_point_accepts_mile_distances() {
        let start = Coordinate {
            lat: 35.2272,
            lon: -80.8431,
        };
        let dest = destination_point(start, Distance::miles(1.0), 0.0);
        let travelled = haversine_km(start, dest);
        assert!((travelled - MILE_IN_KM).abs() < 0.001);
    }

    #[test]
    fn test_destination_point_deterministic() {
        let start = Coordinate {
            lat: 35.2272,
            lon: -80.8431,
        };
        let a = destination_point(start, Distance::miles(1.0), 137.0);
        let b = destination_point(start, Distance::miles(1.0), 137.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_destination_point_crosses_antimeridian() {
        let start = Coordinate {
            lat: 0.0,
            lon: 179.0,
        };
        let dest = destination_point(start, Distance::kilometers(200.0), 90.0);

        assert!(dest.lon < -170.0);
        assert!(dest.lon > -180.0);
    }

    #[test]
    fn test_seeded_bearing_is_reproducible() {
        let start = Coordinate {
            lat: 45.0,
            lon: 5.0,
        };
        let mut first = SeededBearing::new(7);
        let mut second = SeededBearing::new(7);
        let a = destination_point_random(start, Distance::miles(1.0), &mut first);
        let b = destination_point_random(start, Distance::miles(1.0), &mut second);
        assert_eq!(a, b);
    }

    #[test]
    fn test_haversine_symmetry() {
        let a = Coordinate {
            lat: 45.0,
            lon: 5.0,
        };
        let b = Coordinate {
            lat: 46.0,
            lon: 6.0,
        };
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn valid_coord() -> impl Strategy<Value = Coordinate> {
            (-90.0..=90.0, -180.0..=180.0).prop_map(|(lat, lon)| Coordinate { lat, lon })
        }

        proptest! {
            #[test]
            fn prop_destination_point_stays_valid(
                origin in valid_coord(),
                distance_miles in 0.0..=100.0,
                bearing in 0.0..360.0
            ) {
                let dest = destination_point(origin, Distance::miles(distance_miles), bearing);
                prop_assert!(is_valid_coordinate(dest.lon, dest.lat));
            }

            #[test]
            fn prop_destination_point_deterministic(
                origin in valid_coord(),
                distance_miles in 0.0..=100.0,
                bearing in 0.0..360.0
            ) {
                let first = destination_point(origin, Distance::miles(distance_miles), bearing);
                let second = destination_point(origin, Distance::miles(distance_miles), bearing);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_unit_round_trip(x in 1e-6..=1e6) {
                let there_and_back = to_miles(to_kilometers(x));
                prop_assert!((there_and_back - x).abs() / x < 1e-9);
            }

            #[test]
            fn prop_normalize_longitude_range(lon in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
                let normalized = normalize_longitude(lon);
                prop_assert!(normalized > -180.0);
                prop_assert!(normalized <= 180.0);
            }

            #[test]
            fn prop_sampled_bearing_in_range(seed in any::<u64>()) {
                let mut sampler = SeededBearing::new(seed);
                let bearing = sampler.sample_bearing();
                prop_assert!((0.0..360.0).contains(&bearing));
            }
        }
    }
}

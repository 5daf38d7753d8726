use std::cmp::Ordering;

use shared::ElevationPreference;

use crate::error::PlanError;
use crate::models::{RankedRouteSet, RouteCandidate};

/// Order candidates by elevation preference and split into primary plus
/// ranked alternatives.
///
/// `low` ranks flattest first, `high` hilliest first, `moderate` closest to
/// the mean gain of this candidate set. Sorting is stable, so ties keep the
/// caller's enumeration order.
pub fn rank_candidates(
    mut candidates: Vec<RouteCandidate>,
    preference: ElevationPreference,
) -> Result<RankedRouteSet, PlanError> {
    if candidates.is_empty() {
        return Err(PlanError::EmptyCandidateSet);
    }

    match preference {
        ElevationPreference::Low => {
            candidates.sort_by(|a, b| total_cmp(a.elevation_gain, b.elevation_gain));
        }
        ElevationPreference::High => {
            candidates.sort_by(|a, b| total_cmp(b.elevation_gain, a.elevation_gain));
        }
        ElevationPreference::Moderate => {
            let mean = candidates.iter().map(|c| c.elevation_gain).sum::<f64>()
                / candidates.len() as f64;
            candidates.sort_by(|a, b| {
                total_cmp(
                    (a.elevation_gain - mean).abs(),
                    (b.elevation_gain - mean).abs(),
                )
            });
        }
    }

    let primary = candidates.remove(0);
    Ok(RankedRouteSet {
        primary,
        alternatives: candidates,
    })
}

fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Coordinate, Distance};

    fn candidate(tag: f64, elevation_gain: f64) -> RouteCandidate {
        // The tag is smuggled through the longitude so tests can identify
        // candidates after sorting.
        RouteCandidate {
            geometry: vec![
                Coordinate { lat: 0.0, lon: tag },
                Coordinate { lat: 0.1, lon: tag },
            ],
            path_distance: Distance::kilometers(elevation_gain / 10.0),
            elevation_gain,
        }
    }

    fn gains(set: &RankedRouteSet) -> Vec<f64> {
        let mut all = vec![set.primary.elevation_gain];
        all.extend(set.alternatives.iter().map(|c| c.elevation_gain));
        all
    }

    #[test]
    fn low_preference_ranks_flattest_first() {
        let set = rank_candidates(
            vec![
                candidate(1.0, 10.0),
                candidate(2.0, 40.0),
                candidate(3.0, 25.0),
                candidate(4.0, 55.0),
            ],
            ElevationPreference::Low,
        )
        .unwrap();

        assert_eq!(set.primary.elevation_gain, 10.0);
        assert_eq!(gains(&set), vec![10.0, 25.0, 40.0, 55.0]);
    }

    #[test]
    fn high_preference_ranks_hilliest_first() {
        let set = rank_candidates(
            vec![
                candidate(1.0, 10.0),
                candidate(2.0, 40.0),
                candidate(3.0, 25.0),
                candidate(4.0, 55.0),
            ],
            ElevationPreference::High,
        )
        .unwrap();

        assert_eq!(gains(&set), vec![55.0, 40.0, 25.0, 10.0]);
    }

    #[test]
    fn moderate_preference_ranks_by_deviation_from_mean() {
        // Mean of {10, 40, 25, 55} is 32.5; deviations are 22.5, 7.5, 7.5, 22.5.
        let set = rank_candidates(
            vec![
                candidate(1.0, 10.0),
                candidate(2.0, 40.0),
                candidate(3.0, 25.0),
                candidate(4.0, 55.0),
            ],
            ElevationPreference::Moderate,
        )
        .unwrap();

        let ranked = gains(&set);
        assert_eq!(ranked, vec![40.0, 25.0, 10.0, 55.0]);

        let mean = 32.5;
        let deviations: Vec<f64> = ranked.iter().map(|g| (g - mean).abs()).collect();
        assert!(deviations.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn moderate_mean_is_recomputed_per_call() {
        let set = rank_candidates(
            vec![candidate(1.0, 100.0), candidate(2.0, 200.0)],
            ElevationPreference::Moderate,
        )
        .unwrap();
        // Mean 150: both deviate equally, stable order keeps input order.
        assert_eq!(gains(&set), vec![100.0, 200.0]);
    }

    #[test]
    fn ties_preserve_input_order() {
        let set = rank_candidates(
            vec![
                candidate(1.0, 20.0),
                candidate(2.0, 20.0),
                candidate(3.0, 20.0),
            ],
            ElevationPreference::Low,
        )
        .unwrap();

        assert_eq!(set.primary.geometry[0].lon, 1.0);
        assert_eq!(set.alternatives[0].geometry[0].lon, 2.0);
        assert_eq!(set.alternatives[1].geometry[0].lon, 3.0);
    }

    #[test]
    fn single_candidate_becomes_primary_with_no_alternatives() {
        let set = rank_candidates(vec![candidate(1.0, 30.0)], ElevationPreference::High).unwrap();
        assert_eq!(set.primary.elevation_gain, 30.0);
        assert!(set.alternatives.is_empty());
    }

    #[test]
    fn empty_set_is_an_error() {
        let err = rank_candidates(Vec::new(), ElevationPreference::Low).unwrap_err();
        assert!(matches!(err, PlanError::EmptyCandidateSet));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_low_is_non_decreasing(gains_in in prop::collection::vec(0.0..1000.0f64, 1..12)) {
                let candidates = gains_in.iter().enumerate()
                    .map(|(i, &g)| candidate(i as f64, g))
                    .collect();
                let set = rank_candidates(candidates, ElevationPreference::Low).unwrap();
                let ranked = gains(&set);
                prop_assert!(ranked.windows(2).all(|w| w[0] <= w[1]));
            }

            #[test]
            fn prop_high_is_non_increasing(gains_in in prop::collection::vec(0.0..1000.0f64, 1..12)) {
                let candidates = gains_in.iter().enumerate()
                    .map(|(i, &g)| candidate(i as f64, g))
                    .collect();
                let set = rank_candidates(candidates, ElevationPreference::High).unwrap();
                let ranked = gains(&set);
                prop_assert!(ranked.windows(2).all(|w| w[0] >= w[1]));
            }

            #[test]
            fn prop_moderate_deviation_is_non_decreasing(gains_in in prop::collection::vec(0.0..1000.0f64, 1..12)) {
                let mean = gains_in.iter().sum::<f64>() / gains_in.len() as f64;
                let candidates = gains_in.iter().enumerate()
                    .map(|(i, &g)| candidate(i as f64, g))
                    .collect();
                let set = rank_candidates(candidates, ElevationPreference::Moderate).unwrap();
                let deviations: Vec<f64> = gains(&set).iter().map(|g| (g - mean).abs()).collect();
                prop_assert!(deviations.windows(2).all(|w| w[0] <= w[1] + 1e-12));
            }

            #[test]
            fn prop_alternatives_exclude_primary(gains_in in prop::collection::vec(0.0..1000.0f64, 1..12)) {
                let count = gains_in.len();
                let candidates = gains_in.iter().enumerate()
                    .map(|(i, &g)| candidate(i as f64, g))
                    .collect();
                let set = rank_candidates(candidates, ElevationPreference::Low).unwrap();
                prop_assert_eq!(set.alternatives.len(), count - 1);
                let primary_tag = set.primary.geometry[0].lon;
                prop_assert!(set.alternatives.iter().all(|c| c.geometry[0].lon != primary_tag));
            }
        }
    }
}

use shared::{Coordinate, Distance};

/// One routed out-and-back candidate: the outbound polyline to a turnaround
/// point, its routed distance, and the estimated elevation gain used for
/// ranking. Immutable once built.
#[derive(Debug, Clone)]
pub struct RouteCandidate {
    pub geometry: Vec<Coordinate>,
    pub path_distance: Distance,
    pub elevation_gain: f64,
}

impl RouteCandidate {
    pub fn turnaround(&self) -> Option<Coordinate> {
        self.geometry.last().copied()
    }

    /// The full round trip: outbound leg plus the mirrored return leg,
    /// without duplicating the turnaround point.
    pub fn out_and_back_path(&self) -> Vec<Coordinate> {
        let mut path = self.geometry.clone();
        path.extend(self.geometry.iter().rev().skip(1));
        path
    }
}

/// Ranked outcome of one generation cycle. `alternatives` never contains
/// `primary` and is ordered best-to-worst under the active preference.
#[derive(Debug, Clone)]
pub struct RankedRouteSet {
    pub primary: RouteCandidate,
    pub alternatives: Vec<RouteCandidate>,
}

impl RankedRouteSet {
    pub fn route_count(&self) -> usize {
        1 + self.alternatives.len()
    }

    /// Route at `rank` (0 = primary, 1.. = alternatives in ranked order).
    pub fn get(&self, rank: usize) -> Option<&RouteCandidate> {
        if rank == 0 {
            Some(&self.primary)
        } else {
            self.alternatives.get(rank - 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(points: &[(f64, f64)]) -> RouteCandidate {
        RouteCandidate {
            geometry: points
                .iter()
                .map(|&(lat, lon)| Coordinate { lat, lon })
                .collect(),
            path_distance: Distance::kilometers(1.0),
            elevation_gain: 10.0,
        }
    }

    #[test]
    fn out_and_back_mirrors_without_duplicate_turnaround() {
        let route = candidate(&[(45.0, 5.0), (45.01, 5.0), (45.02, 5.0)]);
        let path = route.out_and_back_path();

        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), path.last());
        assert_eq!(path[2], route.turnaround().unwrap());
        assert_eq!(path[3], path[1]);
    }

    #[test]
    fn ranked_set_indexing() {
        let set = RankedRouteSet {
            primary: candidate(&[(45.0, 5.0), (45.01, 5.0)]),
            alternatives: vec![candidate(&[(45.0, 5.0), (45.0, 5.01)])],
        };
        assert_eq!(set.route_count(), 2);
        assert!(set.get(0).is_some());
        assert!(set.get(1).is_some());
        assert!(set.get(2).is_none());
    }
}

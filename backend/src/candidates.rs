use std::sync::Arc;

use futures::future::join_all;
use shared::{Coordinate, Distance};

use crate::error::PlanError;
use crate::geomath;
use crate::models::RouteCandidate;
use crate::providers::DirectionsApi;

/// Cardinal bearings sampled around the starting point, degrees clockwise
/// from north. Four directions trade request volume for spatial diversity.
pub const CANDIDATE_BEARINGS_DEG: [f64; 4] = [0.0, 90.0, 180.0, 270.0];

/// Estimates elevation gain for a routed path.
///
/// The default is a distance-based proxy, not terrain data; swapping in a
/// provider backed by a real elevation service changes nothing downstream
/// because the selector only reads `elevation_gain`.
pub trait ElevationEstimator: Send + Sync {
    fn estimate_gain(&self, path_distance_meters: f64) -> f64;
}

/// `path_distance_meters * 0.01` — a stand-in slope of 1 m gain per 100 m
/// travelled.
#[derive(Debug, Default)]
pub struct DistanceProxyEstimator;

impl ElevationEstimator for DistanceProxyEstimator {
    fn estimate_gain(&self, path_distance_meters: f64) -> f64 {
        path_distance_meters * 0.01
    }
}

/// Produces out-and-back route candidates: one turnaround point per cardinal
/// bearing at half the target distance, one routed path per turnaround.
pub struct RouteCandidateGenerator<D> {
    directions: Arc<D>,
    estimator: Arc<dyn ElevationEstimator>,
}

impl<D: DirectionsApi> RouteCandidateGenerator<D> {
    pub fn new(directions: Arc<D>) -> Self {
        Self {
            directions,
            estimator: Arc::new(DistanceProxyEstimator),
        }
    }

    pub fn with_estimator(directions: Arc<D>, estimator: Arc<dyn ElevationEstimator>) -> Self {
        Self {
            directions,
            estimator,
        }
    }

    /// Fetch all four directions concurrently and keep whatever routed.
    ///
    /// Individual failures are logged and dropped; the join waits for every
    /// request to settle. Only a fully empty result is fatal.
    pub async fn generate(
        &self,
        starting_point: Coordinate,
        target_distance: Distance,
    ) -> Result<Vec<RouteCandidate>, PlanError> {
        if !target_distance.value.is_finite() || target_distance.value <= 0.0 {
            return Err(PlanError::InvalidInput(
                "target distance must be positive".into(),
            ));
        }
        if !geomath::is_valid_coordinate(starting_point.lon, starting_point.lat) {
            return Err(PlanError::InvalidInput(
                "starting point out of valid range".into(),
            ));
        }

        let half_distance = Distance::miles(target_distance.as_miles() / 2.0);
        let fetches = CANDIDATE_BEARINGS_DEG
            .iter()
            .map(|&bearing| self.fetch_candidate(starting_point, half_distance, bearing));
        let settled = join_all(fetches).await;

        let candidates: Vec<RouteCandidate> = settled.into_iter().flatten().collect();
        tracing::info!(
            "{} of {} candidate directions routed",
            candidates.len(),
            CANDIDATE_BEARINGS_DEG.len()
        );

        if candidates.is_empty() {
            return Err(PlanError::EmptyCandidateSet);
        }
        Ok(candidates)
    }

    async fn fetch_candidate(
        &self,
        starting_point: Coordinate,
        half_distance: Distance,
        bearing: f64,
    ) -> Option<RouteCandidate> {
        let turnaround = geomath::destination_point(starting_point, half_distance, bearing);

        match self.directions.route(starting_point, turnaround).await {
            Ok(path) if path.geometry.len() >= 2 => {
                let elevation_gain = self.estimator.estimate_gain(path.distance_meters);
                Some(RouteCandidate {
                    geometry: path.geometry,
                    path_distance: Distance::kilometers(path.distance_meters / 1000.0),
                    elevation_gain,
                })
            }
            Ok(_) => {
                tracing::warn!("bearing {bearing:.0}°: degenerate geometry, dropping candidate");
                None
            }
            Err(err) => {
                tracing::warn!("bearing {bearing:.0}°: {err}, dropping candidate");
                None
            }
        }
    }
}

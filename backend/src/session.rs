use std::sync::Arc;

use shared::{
    Coordinate, Distance, ElevationPreference, ParkingLot, SessionPhase, WaterFountain,
};

use crate::amenities;
use crate::candidates::RouteCandidateGenerator;
use crate::error::PlanError;
use crate::geomath;
use crate::models::{RankedRouteSet, RouteCandidate};
use crate::parking::ParkingLocator;
use crate::providers::{DirectionsApi, PlacesApi};
use crate::render::{MapRenderer, MarkerStyle, RouteStyle};
use crate::selector;

/// Orchestrates one planning session over a single map surface.
///
/// Owns the starting point, target distance, and elevation preference, and
/// re-runs generation whenever one of them changes. All collaborator
/// failures are converted into a displayable error state; nothing escapes
/// the session boundary as a panic or stray Err.
///
/// A monotonically increasing generation token guards against overlapping
/// cycles: a result is applied only when its token still matches, so a
/// superseded cycle's late result is dropped silently.
pub struct RoutePlanningSession<D, P, R> {
    generator: RouteCandidateGenerator<D>,
    parking: ParkingLocator<P>,
    places: Arc<P>,
    renderer: R,
    phase: SessionPhase,
    loading: bool,
    error: Option<String>,
    starting_point: Option<Coordinate>,
    target_distance: Distance,
    elevation_preference: ElevationPreference,
    parking_lots: Vec<ParkingLot>,
    selected_lot_id: Option<String>,
    route_set: Option<RankedRouteSet>,
    fountains: Vec<WaterFountain>,
    generation: u64,
}

impl<D, P, R> RoutePlanningSession<D, P, R>
where
    D: DirectionsApi,
    P: PlacesApi,
    R: MapRenderer,
{
    pub fn new(directions: Arc<D>, places: Arc<P>, renderer: R) -> Self {
        Self {
            generator: RouteCandidateGenerator::new(directions),
            parking: ParkingLocator::new(Arc::clone(&places)),
            places,
            renderer,
            phase: SessionPhase::Idle,
            loading: false,
            error: None,
            starting_point: None,
            target_distance: Distance::miles(shared::default_target_distance_miles()),
            elevation_preference: shared::default_elevation_preference(),
            parking_lots: Vec::new(),
            selected_lot_id: None,
            route_set: None,
            fountains: Vec::new(),
            generation: 0,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn target_distance(&self) -> Distance {
        self.target_distance
    }

    pub fn elevation_preference(&self) -> ElevationPreference {
        self.elevation_preference
    }

    pub fn parking_lots(&self) -> &[ParkingLot] {
        &self.parking_lots
    }

    pub fn selected_lot_id(&self) -> Option<&str> {
        self.selected_lot_id.as_deref()
    }

    pub fn route_set(&self) -> Option<&RankedRouteSet> {
        self.route_set.as_ref()
    }

    pub fn water_fountains(&self) -> &[WaterFountain] {
        &self.fountains
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// A new user location arrived: discard the previous session state,
    /// locate parking, pre-select the nearest lot, and generate routes.
    pub async fn set_user_location(&mut self, location: Coordinate) -> Result<(), PlanError> {
        if !geomath::is_valid_coordinate(location.lon, location.lat) {
            return Err(PlanError::InvalidInput(
                "location out of valid range".into(),
            ));
        }

        self.reset();
        self.phase = SessionPhase::LocatingParking;
        self.loading = true;

        let located = self.parking.locate(location).await;
        match located {
            Ok(lots) => {
                let nearest = lots[0].clone();
                self.parking_lots = lots;
                self.selected_lot_id = Some(nearest.id.clone());
                self.starting_point = Some(nearest.coordinates);
                self.phase = SessionPhase::AwaitingSelection;
                tracing::info!("pre-selected nearest parking lot \"{}\"", nearest.name);
                self.regenerate().await;
                Ok(())
            }
            Err(err) => {
                self.enter_error(err);
                Ok(())
            }
        }
    }

    /// Switch the starting point to another of the located lots.
    pub async fn select_parking_lot(&mut self, lot_id: &str) -> Result<(), PlanError> {
        let lot = self
            .parking_lots
            .iter()
            .find(|lot| lot.id == lot_id)
            .cloned()
            .ok_or_else(|| PlanError::InvalidInput(format!("unknown parking lot \"{lot_id}\"")))?;

        self.selected_lot_id = Some(lot.id);
        self.starting_point = Some(lot.coordinates);
        self.regenerate().await;
        Ok(())
    }

    pub async fn set_target_distance(&mut self, distance: Distance) -> Result<(), PlanError> {
        if !distance.value.is_finite() || distance.value <= 0.0 {
            return Err(PlanError::InvalidInput(
                "target distance must be positive".into(),
            ));
        }

        self.target_distance = distance;
        if self.starting_point.is_some() {
            self.regenerate().await;
        }
        Ok(())
    }

    pub async fn set_elevation_preference(&mut self, preference: ElevationPreference) {
        self.elevation_preference = preference;
        if self.starting_point.is_some() {
            self.regenerate().await;
        }
    }

    /// Re-render the route at `rank` (0 = primary, 1.. = alternatives).
    ///
    /// Rendering only: the session stays in its current phase, the ranked
    /// set is untouched, and no regeneration is triggered.
    pub fn show_route(&mut self, rank: usize) -> Result<(), PlanError> {
        let route = self
            .route_set
            .as_ref()
            .and_then(|set| set.get(rank))
            .cloned()
            .ok_or_else(|| PlanError::InvalidInput(format!("no route at rank {rank}")))?;

        let style = if rank == 0 {
            RouteStyle::Primary
        } else {
            RouteStyle::Alternative
        };
        self.render_pass(&route, style);
        Ok(())
    }

    async fn regenerate(&mut self) {
        let token = self.begin_generation();
        let outcome = self.run_generation().await;
        self.finish_generation(token, outcome);
    }

    /// Open a new generation cycle, superseding any in flight.
    fn begin_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.phase = SessionPhase::Generating;
        self.loading = true;
        self.error = None;
        self.route_set = None;
        self.generation
    }

    async fn run_generation(
        &self,
    ) -> Result<(RankedRouteSet, Vec<WaterFountain>), PlanError> {
        let starting_point = self.starting_point.ok_or_else(|| {
            PlanError::InvalidInput("no starting point selected".into())
        })?;

        let candidates = self
            .generator
            .generate(starting_point, self.target_distance)
            .await?;
        let ranked = selector::rank_candidates(candidates, self.elevation_preference)?;

        let fountains =
            match amenities::find_water_fountains(self.places.as_ref(), &ranked.primary.geometry)
                .await
            {
                Ok(fountains) => fountains,
                Err(err) => {
                    tracing::warn!("water fountain lookup failed: {err}");
                    Vec::new()
                }
            };

        Ok((ranked, fountains))
    }

    /// Apply a finished cycle's outcome, unless a newer cycle superseded it.
    fn finish_generation(
        &mut self,
        token: u64,
        outcome: Result<(RankedRouteSet, Vec<WaterFountain>), PlanError>,
    ) {
        if token != self.generation {
            tracing::debug!(
                "dropping superseded generation result (token {token}, current {})",
                self.generation
            );
            return;
        }

        self.loading = false;
        match outcome {
            Ok((ranked, fountains)) => {
                self.fountains = fountains;
                let primary = ranked.primary.clone();
                self.render_pass(&primary, RouteStyle::Primary);
                self.route_set = Some(ranked);
                self.phase = SessionPhase::Ready;
                tracing::info!(
                    "route set ready: primary gain {:.0}m, {} alternatives",
                    primary.elevation_gain,
                    self.route_set.as_ref().map_or(0, |s| s.alternatives.len())
                );
            }
            Err(err) => self.enter_error(err),
        }
    }

    fn enter_error(&mut self, err: PlanError) {
        self.loading = false;
        self.route_set = None;
        self.fountains.clear();
        self.renderer.clear_route_layers();
        self.error = Some(err.to_string());
        self.phase = SessionPhase::Error;
        tracing::warn!("session entered error state: {}", self.error.as_deref().unwrap_or(""));
    }

    /// One full rendering pass. Cleanup always completes before anything is
    /// drawn, so no layer of a previous route survives.
    fn render_pass(&mut self, route: &RouteCandidate, style: RouteStyle) {
        let start_label = self
            .selected_lot_id
            .as_deref()
            .and_then(|id| self.parking_lots.iter().find(|lot| lot.id == id))
            .map(|lot| lot.name.clone())
            .unwrap_or_else(|| "Start/End Point".to_string());

        self.renderer.clear_route_layers();
        self.renderer.draw_route(&route.geometry, style);
        if let Some(start) = self.starting_point {
            self.renderer
                .place_marker(start, MarkerStyle::Start, &start_label);
        }
        if let Some(turnaround) = route.turnaround() {
            self.renderer
                .place_marker(turnaround, MarkerStyle::Turnaround, "Turnaround Point");
        }
        self.renderer.fit_bounds(&route.geometry);
        for fountain in &self.fountains {
            self.renderer
                .place_marker(fountain.coordinates, MarkerStyle::Fountain, &fountain.name);
        }
    }

    fn reset(&mut self) {
        // Bumping the token first invalidates any cycle still in flight for
        // the previous starting point.
        self.generation = self.generation.wrapping_add(1);
        self.phase = SessionPhase::Idle;
        self.loading = false;
        self.error = None;
        self.starting_point = None;
        self.parking_lots.clear();
        self.selected_lot_id = None;
        self.route_set = None;
        self.fountains.clear();
    }
}

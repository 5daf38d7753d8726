use std::cmp::Ordering;
use std::sync::Arc;

use shared::{Coordinate, Distance, ParkingLot};

use crate::error::PlanError;
use crate::geomath;
use crate::providers::{PlaceHit, PlacesApi};

/// Fixed parking search radius around the user's location.
pub const SEARCH_RADIUS_MILES: f64 = 5.0;

const PARKING_QUERY: &str = "parking";

/// Finds and ranks parking lots usable as a route's starting point.
pub struct ParkingLocator<P> {
    places: Arc<P>,
}

impl<P: PlacesApi> ParkingLocator<P> {
    pub fn new(places: Arc<P>) -> Self {
        Self { places }
    }

    /// Parking lots within the search radius, nearest first.
    ///
    /// Zero matches is `NoParkingFound`; a provider failure propagates as a
    /// displayable condition. Both are fatal to this step only.
    pub async fn locate(&self, user_location: Coordinate) -> Result<Vec<ParkingLot>, PlanError> {
        if !geomath::is_valid_coordinate(user_location.lon, user_location.lat) {
            return Err(PlanError::InvalidInput(
                "user location out of valid range".into(),
            ));
        }

        let radius_meters = geomath::to_kilometers(SEARCH_RADIUS_MILES) * 1000.0;
        let hits = self
            .places
            .search(user_location, radius_meters, PARKING_QUERY)
            .await?;

        let mut lots: Vec<ParkingLot> = hits
            .into_iter()
            .filter(is_parking)
            .map(|hit| to_parking_lot(user_location, hit))
            .collect();

        if lots.is_empty() {
            tracing::info!("no parking POIs within {SEARCH_RADIUS_MILES} miles");
            return Err(PlanError::NoParkingFound);
        }

        lots.sort_by(|a, b| {
            a.distance_from_user
                .value
                .partial_cmp(&b.distance_from_user.value)
                .unwrap_or(Ordering::Equal)
        });
        tracing::info!("found {} parking lots, nearest \"{}\"", lots.len(), lots[0].name);
        Ok(lots)
    }
}

fn is_parking(hit: &PlaceHit) -> bool {
    hit.category_contains("parking") || hit.marker.as_deref() == Some("parking")
}

fn to_parking_lot(user_location: Coordinate, hit: PlaceHit) -> ParkingLot {
    // Providers report straight-line distance in meters; fall back to our
    // own great-circle distance when the field is missing.
    let distance_miles = match hit.distance_meters {
        Some(meters) => geomath::to_miles(meters / 1000.0),
        None => geomath::to_miles(geomath::haversine_km(user_location, hit.coordinates)),
    };

    ParkingLot {
        id: hit.id,
        name: hit.name,
        coordinates: hit.coordinates,
        distance_from_user: Distance::miles(distance_miles),
    }
}

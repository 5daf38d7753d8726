use shared::{Coordinate, RouteBounds, WaterFountain};

use crate::geomath;
use crate::providers::{PlaceHit, PlacesApi, ProviderError};

const FOUNTAIN_QUERY: &str = "drinking water fountain";

/// Margin added around the route's bounding box before searching, degrees.
const BOUNDS_MARGIN_DEG: f64 = 0.01;

/// Water fountains near a route geometry.
///
/// The places contract searches by center and radius, so the route's padded
/// bounding box is reduced to its center plus the radius that covers the far
/// corner.
pub async fn find_water_fountains<P: PlacesApi>(
    places: &P,
    geometry: &[Coordinate],
) -> Result<Vec<WaterFountain>, ProviderError> {
    let Some(bounds) = padded_bounds(geometry) else {
        return Ok(Vec::new());
    };

    let center = Coordinate {
        lat: (bounds.min_lat + bounds.max_lat) / 2.0,
        lon: (bounds.min_lon + bounds.max_lon) / 2.0,
    };
    let corner = Coordinate {
        lat: bounds.max_lat,
        lon: bounds.max_lon,
    };
    let radius_meters = geomath::haversine_km(center, corner) * 1000.0;

    let hits = places.search(center, radius_meters, FOUNTAIN_QUERY).await?;
    let fountains: Vec<WaterFountain> = hits
        .into_iter()
        .filter(is_water_source)
        .map(|hit| WaterFountain {
            id: hit.id,
            name: hit.name,
            coordinates: hit.coordinates,
            address: hit.address,
        })
        .collect();

    tracing::debug!("{} water fountains near route", fountains.len());
    Ok(fountains)
}

/// Route bounding box expanded by [`BOUNDS_MARGIN_DEG`]; `None` for an
/// empty geometry.
pub fn padded_bounds(geometry: &[Coordinate]) -> Option<RouteBounds> {
    let first = geometry.first()?;
    let mut bounds = RouteBounds {
        min_lat: first.lat,
        max_lat: first.lat,
        min_lon: first.lon,
        max_lon: first.lon,
    };
    for coord in geometry {
        bounds.min_lat = bounds.min_lat.min(coord.lat);
        bounds.max_lat = bounds.max_lat.max(coord.lat);
        bounds.min_lon = bounds.min_lon.min(coord.lon);
        bounds.max_lon = bounds.max_lon.max(coord.lon);
    }
    Some(RouteBounds {
        min_lat: bounds.min_lat - BOUNDS_MARGIN_DEG,
        max_lat: bounds.max_lat + BOUNDS_MARGIN_DEG,
        min_lon: bounds.min_lon - BOUNDS_MARGIN_DEG,
        max_lon: bounds.max_lon + BOUNDS_MARGIN_DEG,
    })
}

fn is_water_source(hit: &PlaceHit) -> bool {
    let name = hit.name.to_lowercase();
    hit.category_contains("water") || name.contains("fountain") || name.contains("water")
}

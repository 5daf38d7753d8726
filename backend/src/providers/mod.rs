pub mod directions;
pub mod geocode;
pub mod places;
pub mod types;

use std::future::Future;

use shared::Coordinate;
use thiserror::Error;

pub use directions::MapboxDirections;
pub use geocode::{GeocodeError, MapboxGeocoder};
pub use places::MapboxPlaces;

pub const MAPBOX_BASE_URL: &str = "https://api.mapbox.com";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("malformed provider response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("no route in provider response")]
    NoRoute,
}

/// A routed walking path returned by a directions provider.
#[derive(Debug, Clone)]
pub struct RoutedPath {
    pub geometry: Vec<Coordinate>,
    pub distance_meters: f64,
}

/// A point of interest returned by a places provider.
#[derive(Debug, Clone)]
pub struct PlaceHit {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub coordinates: Coordinate,
    /// Straight-line distance from the search center, when the provider
    /// reports one.
    pub distance_meters: Option<f64>,
    pub category: Option<String>,
    /// Map-marker type tag (e.g. "parking"), provider-specific.
    pub marker: Option<String>,
}

impl PlaceHit {
    pub fn category_contains(&self, needle: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.to_lowercase().contains(needle))
    }
}

/// Directions collaborator: routed walking path between two coordinates,
/// alternatives and full-resolution geometry requested where the provider
/// supports them.
pub trait DirectionsApi: Send + Sync {
    fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<RoutedPath, ProviderError>> + Send;
}

/// Places collaborator: POI search around a center, one contract for both
/// parking lots and water fountains (the query string differs).
pub trait PlacesApi: Send + Sync {
    fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        query: &str,
    ) -> impl Future<Output = Result<Vec<PlaceHit>, ProviderError>> + Send;
}

/// Forward geocoding collaborator, owned by the location-input shell.
pub trait GeocodeApi: Send + Sync {
    fn forward(&self, query: &str) -> impl Future<Output = Result<Coordinate, GeocodeError>> + Send;
}

//! Wire formats of the Mapbox Directions and Geocoding APIs, reduced to the
//! fields this service reads.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsRoute {
    pub geometry: LineStringGeometry,
    /// Routed path length in meters.
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub struct LineStringGeometry {
    /// GeoJSON order: [lon, lat].
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    #[serde(default)]
    pub features: Vec<GeocodingFeature>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingFeature {
    pub id: String,
    /// Short display name of the feature.
    pub text: String,
    /// Full place name including containing regions.
    pub place_name: Option<String>,
    /// [lon, lat].
    pub center: [f64; 2],
    #[serde(default)]
    pub properties: FeatureProperties,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeatureProperties {
    pub category: Option<String>,
    /// Maki icon identifier; "parking" tags parking POIs.
    pub maki: Option<String>,
    /// Distance from the proximity point in meters.
    pub distance: Option<f64>,
}

use std::time::Duration;

use shared::Coordinate;

use super::types::DirectionsResponse;
use super::{DirectionsApi, MAPBOX_BASE_URL, ProviderError, RoutedPath};

/// Mapbox Directions API client, walking profile, alternatives and full
/// geometry requested on every call.
pub struct MapboxDirections {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl MapboxDirections {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, MAPBOX_BASE_URL.to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            token,
            base_url,
        }
    }
}

impl DirectionsApi for MapboxDirections {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RoutedPath, ProviderError> {
        let url = format!(
            "{}/directions/v5/mapbox/walking/{},{};{},{}",
            self.base_url, origin.lon, origin.lat, destination.lon, destination.lat
        );
        tracing::debug!(
            "requesting walking route ({:.4},{:.4}) -> ({:.4},{:.4})",
            origin.lon,
            origin.lat,
            destination.lon,
            destination.lat
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("geometries", "geojson"),
                ("alternatives", "true"),
                ("overview", "full"),
                ("access_token", self.token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: DirectionsResponse = serde_json::from_str(&response.text().await?)?;
        let route = body.routes.into_iter().next().ok_or(ProviderError::NoRoute)?;

        let geometry: Vec<Coordinate> = route
            .geometry
            .coordinates
            .iter()
            .map(|&[lon, lat]| Coordinate { lat, lon })
            .collect();
        if geometry.len() < 2 {
            return Err(ProviderError::NoRoute);
        }

        Ok(RoutedPath {
            geometry,
            distance_meters: route.distance,
        })
    }
}

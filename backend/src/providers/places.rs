use std::time::Duration;

use shared::Coordinate;

use super::types::GeocodingResponse;
use super::{MAPBOX_BASE_URL, PlaceHit, PlacesApi, ProviderError};

/// POI search over the Mapbox Geocoding API. The free-text query selects the
/// amenity kind ("parking", "drinking water fountain"); the proximity point
/// and radius scope the results.
pub struct MapboxPlaces {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl MapboxPlaces {
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

impl PlacesApi for MapboxPlaces {
    async fn search(
        &self,
        center: Coordinate,
        radius_meters: f64,
        query: &str,
    ) -> Result<Vec<PlaceHit>, ProviderError> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url,
            query.replace(' ', "+")
        );
        let proximity = format!("{},{}", center.lon, center.lat);
        let radius = format!("{:.0}", radius_meters);
        tracing::debug!("searching places \"{query}\" near {proximity} within {radius}m");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("proximity", proximity.as_str()),
                ("radius", radius.as_str()),
                ("types", "poi"),
                ("access_token", self.token.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: GeocodingResponse = serde_json::from_str(&response.text().await?)?;
        Ok(body
            .features
            .into_iter()
            .map(|feature| PlaceHit {
                id: feature.id,
                name: feature.text,
                address: feature.place_name,
                coordinates: Coordinate {
                    lat: feature.center[1],
                    lon: feature.center[0],
                },
                distance_meters: feature.properties.distance,
                category: feature.properties.category,
                marker: feature.properties.maki,
            })
            .collect())
    }
}

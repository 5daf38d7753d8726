use std::time::Duration;

use shared::Coordinate;
use thiserror::Error;

use crate::geomath;

use super::types::GeocodingResponse;
use super::{GeocodeApi, MAPBOX_BASE_URL, ProviderError};

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("location not found")]
    NotFound,
    #[error("invalid location format: {0}")]
    InvalidFormat(String),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Resolve free-text user input to a validated coordinate.
///
/// Input containing a comma is first tried as a raw `lon,lat` pair; anything
/// else (or a pair that fails to parse) goes through forward geocoding.
pub async fn resolve_location<G: GeocodeApi>(
    geocoder: &G,
    input: &str,
) -> Result<Coordinate, GeocodeError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(GeocodeError::InvalidFormat(
            "location must not be empty".into(),
        ));
    }

    if trimmed.contains(',') {
        match parse_coordinate_pair(trimmed) {
            Ok(coord) => return Ok(coord),
            Err(err) => {
                tracing::debug!("coordinate parse failed ({err}), falling back to geocoding");
            }
        }
    }

    geocoder.forward(trimmed).await
}

/// Parse `lon,lat` with both components in range.
pub fn parse_coordinate_pair(input: &str) -> Result<Coordinate, GeocodeError> {
    let parts: Vec<&str> = input.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(GeocodeError::InvalidFormat(
            "expected longitude,latitude".into(),
        ));
    }

    let lon: f64 = parts[0]
        .parse()
        .map_err(|_| GeocodeError::InvalidFormat("longitude is not a number".into()))?;
    let lat: f64 = parts[1]
        .parse()
        .map_err(|_| GeocodeError::InvalidFormat("latitude is not a number".into()))?;

    if !geomath::is_valid_coordinate(lon, lat) {
        return Err(GeocodeError::InvalidFormat(
            "coordinates out of valid range".into(),
        ));
    }

    Ok(Coordinate { lat, lon })
}

/// Mapbox forward geocoder.
pub struct MapboxGeocoder {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl MapboxGeocoder {
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

impl GeocodeApi for MapboxGeocoder {
    async fn forward(&self, query: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url,
            query.replace(' ', "+")
        );
        tracing::debug!("geocoding \"{query}\"");

        let response = self
            .client
            .get(&url)
            .query(&[("access_token", self.token.as_str())])
            .send()
            .await
            .map_err(ProviderError::from)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()).into());
        }

        let text = response.text().await.map_err(ProviderError::from)?;
        let body: GeocodingResponse =
            serde_json::from_str(&text).map_err(ProviderError::from)?;
        let feature = body.features.into_iter().next().ok_or(GeocodeError::NotFound)?;
        let [lon, lat] = feature.center;

        if !geomath::is_valid_coordinate(lon, lat) {
            return Err(GeocodeError::InvalidFormat(
                "geocoder returned out-of-range coordinates".into(),
            ));
        }

        Ok(Coordinate { lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lon_lat_pair() {
        let coord = parse_coordinate_pair("-80.8431, 35.2272").unwrap();
        assert_eq!(coord.lon, -80.8431);
        assert_eq!(coord.lat, 35.2272);
    }

    #[test]
    fn rejects_wrong_arity() {
        assert!(matches!(
            parse_coordinate_pair("1.0"),
            Err(GeocodeError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_coordinate_pair("1.0,2.0,3.0"),
            Err(GeocodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_components() {
        assert!(matches!(
            parse_coordinate_pair("uptown,charlotte"),
            Err(GeocodeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_pair() {
        assert!(matches!(
            parse_coordinate_pair("-200.0, 35.0"),
            Err(GeocodeError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_coordinate_pair("-80.0, 95.0"),
            Err(GeocodeError::InvalidFormat(_))
        ));
    }

    #[tokio::test]
    async fn resolve_prefers_pair_parse_over_geocoding() {
        struct NeverCalled;
        impl GeocodeApi for NeverCalled {
            async fn forward(&self, _query: &str) -> Result<Coordinate, GeocodeError> {
                panic!("forward geocoding must not run for a valid pair");
            }
        }

        let coord = resolve_location(&NeverCalled, "-80.8431,35.2272")
            .await
            .unwrap();
        assert_eq!(coord.lat, 35.2272);
    }

    #[tokio::test]
    async fn resolve_falls_back_to_geocoder_for_free_text() {
        struct Fixed;
        impl GeocodeApi for Fixed {
            async fn forward(&self, _query: &str) -> Result<Coordinate, GeocodeError> {
                Ok(Coordinate {
                    lat: 35.2272,
                    lon: -80.8431,
                })
            }
        }

        let coord = resolve_location(&Fixed, "Freedom Park, Charlotte")
            .await
            .unwrap();
        assert_eq!(coord.lon, -80.8431);
    }

    #[tokio::test]
    async fn resolve_rejects_empty_input() {
        struct NeverCalled;
        impl GeocodeApi for NeverCalled {
            async fn forward(&self, _query: &str) -> Result<Coordinate, GeocodeError> {
                unreachable!()
            }
        }

        assert!(matches!(
            resolve_location(&NeverCalled, "   ").await,
            Err(GeocodeError::InvalidFormat(_))
        ));
    }
}

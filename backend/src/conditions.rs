//! Current-weather data producer consumed by the presentational shell.
//! The planning core never calls this.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use shared::{Coordinate, CurrentConditions};

use crate::providers::ProviderError;

const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

pub trait ConditionsApi: Send + Sync {
    fn current(
        &self,
        coordinate: Coordinate,
    ) -> impl Future<Output = Result<CurrentConditions, ProviderError>> + Send;
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: Option<WeatherMain>,
    #[serde(default)]
    weather: Vec<WeatherEntry>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WeatherEntry {
    description: Option<String>,
    icon: Option<String>,
}

pub struct OpenWeatherClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            api_key,
            base_url,
        }
    }
}

impl ConditionsApi for OpenWeatherClient {
    async fn current(&self, coordinate: Coordinate) -> Result<CurrentConditions, ProviderError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        let lat = coordinate.lat.to_string();
        let lon = coordinate.lon.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status.as_u16()));
        }

        let body: WeatherResponse = serde_json::from_str(&response.text().await?)?;
        Ok(to_conditions(body))
    }
}

fn to_conditions(body: WeatherResponse) -> CurrentConditions {
    let main = body.main;
    let entry = body.weather.into_iter().next();
    CurrentConditions {
        temperature_f: main
            .as_ref()
            .and_then(|m| m.temp)
            .map(|celsius| (celsius * 9.0 / 5.0 + 32.0).round() as i32),
        humidity: main.and_then(|m| m.humidity),
        description: entry.as_ref().and_then(|e| e.description.clone()),
        icon_url: entry.and_then(|e| e.icon).map(|icon| {
            format!("https://openweathermap.org/img/wn/{icon}@2x.png")
        }),
    }
}

use std::sync::Arc;

use backend::conditions::OpenWeatherClient;
use backend::config::Config;
use backend::providers::{MapboxDirections, MapboxGeocoder, MapboxPlaces};
use backend::{AppState, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("provider configuration");

    let directions = Arc::new(MapboxDirections::new(config.provider_token.clone()));
    let places = Arc::new(MapboxPlaces::new(config.provider_token.clone()));
    let geocoder = Arc::new(MapboxGeocoder::new(config.provider_token.clone()));
    let conditions = config
        .weather_api_key
        .clone()
        .map(|key| Arc::new(OpenWeatherClient::new(key)));
    if conditions.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set; /api/conditions disabled");
    }

    let state = AppState::new(directions, places, geocoder, conditions);
    let app = create_router(state);

    tracing::info!("starting backend on http://{}", config.bind_addr);
    axum::serve(
        tokio::net::TcpListener::bind(config.bind_addr).await.unwrap(),
        app,
    )
    .await
    .unwrap();
}

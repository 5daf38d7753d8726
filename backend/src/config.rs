use std::env;
use std::net::SocketAddr;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("MAPBOX_TOKEN environment variable not set")]
    MissingProviderToken,
    #[error("invalid provider token: public tokens start with \"pk.\"")]
    InvalidProviderToken,
    #[error("invalid BIND_ADDR: {0}")]
    InvalidBindAddr(String),
}

/// Provider credentials and listen address, read once at startup.
///
/// Tokens are handed to the client constructors explicitly; nothing in the
/// planning core reads the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider_token: String,
    pub weather_api_key: Option<String>,
    pub bind_addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let provider_token =
            env::var("MAPBOX_TOKEN").map_err(|_| ConfigError::MissingProviderToken)?;
        Self::build(
            provider_token,
            env::var("OPENWEATHER_API_KEY").ok(),
            env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        )
    }

    fn build(
        provider_token: String,
        weather_api_key: Option<String>,
        bind_addr: String,
    ) -> Result<Self, ConfigError> {
        if !provider_token.starts_with("pk.") {
            return Err(ConfigError::InvalidProviderToken);
        }

        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr))?;

        Ok(Self {
            provider_token,
            weather_api_key: weather_api_key.filter(|key| !key.is_empty()),
            bind_addr,
        })
    }
}

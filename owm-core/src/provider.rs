use crate::{
    Config,
    error::FetchError,
    model::{Location, WeatherRequest},
    payload::WeatherPayload,
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Current conditions and the five-day forecast for one location.
///
/// A half that could not be fetched is `None`; the cause has already been logged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherReport {
    pub current: Option<WeatherPayload>,
    pub forecast: Option<WeatherPayload>,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherPayload, FetchError>;

    async fn current(&self, location: &Location) -> Result<WeatherPayload, FetchError> {
        self.fetch(&WeatherRequest::current(location.clone())).await
    }

    async fn forecast(&self, location: &Location) -> Result<WeatherPayload, FetchError> {
        self.fetch(&WeatherRequest::forecast(location.clone())).await
    }

    async fn report(&self, location: &Location) -> WeatherReport {
        let current = match self.current(location).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(%location, error = %err, "current weather unavailable");
                None
            }
        };

        let forecast = match self.forecast(location).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                tracing::warn!(%location, error = %err, "forecast unavailable");
                None
            }
        };

        WeatherReport { current, forecast }
    }
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `owm configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::from_config(api_key, config)))
}

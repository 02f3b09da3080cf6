use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::{
    Config,
    config::{DEFAULT_ENDPOINT_URL, DEFAULT_TIMEOUT_SECS},
    error::FetchError,
    model::{HttpMethod, Units, WeatherRequest},
    payload::WeatherPayload,
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    endpoint_url: String,
    method: HttpMethod,
    units: Units,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            method: HttpMethod::Get,
            units: Units::Standard,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            http: Client::new(),
        }
    }

    pub fn from_config(api_key: String, config: &Config) -> Self {
        Self::new(api_key)
            .with_endpoint_url(config.endpoint_url.clone())
            .with_method(config.method)
            .with_units(config.units)
            .with_timeout(config.timeout())
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = endpoint_url.into();
        self
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.endpoint_url.trim_end_matches('/'), endpoint)
    }

    async fn send(&self, request: &WeatherRequest) -> Result<Value, FetchError> {
        let endpoint = request.kind.endpoint();
        let url = self.url_for(endpoint);

        let mut query = request.location.query_pairs();
        query.push(("appid", self.api_key.clone()));
        if let Some(units) = self.units.query_value() {
            query.push(("units", units.to_string()));
        }

        tracing::debug!(%url, method = %self.method, location = %request.location, "requesting OpenWeatherMap");

        let res = self
            .http
            .request(self.method.into(), &url)
            .query(&query)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|source| FetchError::Http { endpoint, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| FetchError::Http { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Json { endpoint, source })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn fetch(&self, request: &WeatherRequest) -> Result<WeatherPayload, FetchError> {
        let raw = self.send(request).await?;
        Ok(WeatherPayload::from_value(raw)?)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;
    use mockito::{Matcher, Server};

    const CURRENT_BODY: &str = r#"{
        "coord": {"lon": 24.71, "lat": 48.92},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
        "main": {"temp": 280.5, "humidity": 61},
        "name": "Ivano-Frankivsk",
        "cod": 200
    }"#;

    const FORECAST_BODY: &str = r#"{
        "cod": "200",
        "list": [
            {"dt_txt": "2024-01-01 12:00:00", "weather": [{"description": "light snow"}], "main": {"temp": 271.2}},
            {"dt_txt": "2024-01-01 15:00:00", "weather": [{"description": "snow"}], "main": {"temp": 272.0}}
        ],
        "city": {"name": "Lviv", "country": "UA"}
    }"#;

    fn provider(server: &Server) -> OpenWeatherProvider {
        OpenWeatherProvider::new("KEY".to_string()).with_endpoint_url(server.url())
    }

    #[tokio::test]
    async fn current_by_coordinates_sends_lat_lon_and_appid() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lat".into(), "48.92".into()),
                Matcher::UrlEncoded("lon".into(), "24.71".into()),
                Matcher::UrlEncoded("appid".into(), "KEY".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(CURRENT_BODY)
            .create_async()
            .await;

        let payload = provider(&server)
            .current(&Location::coordinates(48.92, 24.71))
            .await
            .expect("current weather should be fetched");

        mock.assert_async().await;
        assert!(matches!(payload, WeatherPayload::SingleObservation(_)));
        assert_eq!(payload.location_name(), "Ivano-Frankivsk");
    }

    #[tokio::test]
    async fn forecast_by_city_with_post_and_units() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/forecast")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Lviv".into()),
                Matcher::UrlEncoded("appid".into(), "KEY".into()),
                Matcher::UrlEncoded("units".into(), "metric".into()),
            ]))
            .with_status(200)
            .with_body(FORECAST_BODY)
            .create_async()
            .await;

        let payload = provider(&server)
            .with_method(HttpMethod::Post)
            .with_units(Units::Metric)
            .forecast(&Location::city("Lviv"))
            .await
            .expect("forecast should be fetched");

        mock.assert_async().await;
        assert!(matches!(payload, WeatherPayload::MultiEntry(ref f) if f.list.len() == 2));
    }

    #[tokio::test]
    async fn trailing_slash_in_endpoint_url_is_tolerated() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(CURRENT_BODY)
            .create_async()
            .await;

        let payload = OpenWeatherProvider::new("KEY".to_string())
            .with_endpoint_url(format!("{}/", server.url()))
            .current(&Location::city("Ivano-Frankivsk"))
            .await;

        mock.assert_async().await;
        assert!(payload.is_ok());
    }

    #[tokio::test]
    async fn error_status_is_reported_with_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"cod":401,"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let err = provider(&server).current(&Location::city("Kyiv")).await.unwrap_err();

        match err {
            FetchError::Status { endpoint, status, ref body } => {
                assert_eq!(endpoint, "weather");
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("Invalid API key"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_json_is_a_json_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let err = provider(&server).forecast(&Location::city("Kyiv")).await.unwrap_err();
        assert!(matches!(err, FetchError::Json { endpoint: "forecast", .. }));
    }

    #[tokio::test]
    async fn missing_keys_surface_as_payload_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/weather")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"name": "Kyiv", "weather": [{"description": "clear sky"}]}"#)
            .create_async()
            .await;

        let err = provider(&server).current(&Location::city("Kyiv")).await.unwrap_err();
        assert!(matches!(err, FetchError::Payload(ref p) if p.is_malformed()));
    }

    #[tokio::test]
    async fn report_fetches_both_endpoints() {
        let mut server = Server::new_async().await;
        let current = server
            .mock("GET", "/weather")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(CURRENT_BODY)
            .create_async()
            .await;
        let forecast = server
            .mock("GET", "/forecast")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let report = provider(&server).report(&Location::coordinates(48.92, 24.71)).await;

        current.assert_async().await;
        forecast.assert_async().await;
        assert!(report.current.is_some());
        assert!(report.forecast.is_none());
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "й".repeat(250);
        let truncated = truncate_body(&long);

        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}

use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Where to ask about: either a coordinate pair or a free-form city name.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates(Coordinates),
    City(String),
}

impl Location {
    pub fn coordinates(lat: f64, lon: f64) -> Self {
        Location::Coordinates(Coordinates { lat, lon })
    }

    pub fn city(name: impl Into<String>) -> Self {
        Location::City(name.into())
    }

    /// Query parameters identifying this location upstream.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
            Location::City(name) => vec![("q", name.clone())],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates(c) => write!(f, "{},{}", c.lat, c.lon),
            Location::City(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestType {
    Current,
    Forecast,
}

impl RequestType {
    /// Upstream endpoint name.
    pub fn endpoint(&self) -> &'static str {
        match self {
            RequestType::Current => "weather",
            RequestType::Forecast => "forecast",
        }
    }

    pub const fn all() -> &'static [RequestType] {
        &[RequestType::Current, RequestType::Forecast]
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl TryFrom<&str> for RequestType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "current" | "weather" => Ok(RequestType::Current),
            "forecast" => Ok(RequestType::Forecast),
            _ => Err(anyhow::anyhow!(
                "Unknown request type '{value}'. Supported request types: current (weather), forecast."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            _ => Err(anyhow::anyhow!("Invalid HTTP method '{value}'. Use 'GET' or 'POST'.")),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Unit system requested from upstream. `Standard` is the upstream default (Kelvin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Standard,
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Standard, Units::Metric, Units::Imperial]
    }

    /// The `units` query value, or `None` when upstream's default applies.
    pub fn query_value(&self) -> Option<&'static str> {
        match self {
            Units::Standard => None,
            other => Some(other.as_str()),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Units::all()
            .iter()
            .copied()
            .find(|u| u.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                anyhow::anyhow!("Unknown units '{value}'. Supported units: standard, metric, imperial.")
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    pub kind: RequestType,
    pub location: Location,
}

impl WeatherRequest {
    pub fn current(location: Location) -> Self {
        Self { kind: RequestType::Current, location }
    }

    pub fn forecast(location: Location) -> Self {
        Self { kind: RequestType::Forecast, location }
    }
}

/// Flat, display-ready view of one observation or one forecast snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub description: String,
    /// Upstream temperature rendered as text, in whatever units were requested.
    pub temp: String,
    /// `dt_txt` of the forecast entry; only set for forecast-derived records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

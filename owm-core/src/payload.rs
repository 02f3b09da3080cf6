//! Upstream response shapes, classified once at the fetch boundary.

use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::PayloadError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MainReadings {
    /// Kept as the raw JSON number so its textual form matches what upstream sent.
    pub temp: Number,
}

/// `GET /weather`: a single observation for one location.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Observation {
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: MainReadings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct City {
    pub name: String,
}

/// One 3-hour slot. Only `dt_txt` is read up front; `weather` and `main` are
/// decoded when the entry is selected, so skipped entries may be incomplete.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastEntry {
    pub dt_txt: String,
    #[serde(default)]
    weather: Option<Value>,
    #[serde(default)]
    main: Option<Value>,
}

impl ForecastEntry {
    pub fn conditions(&self) -> Result<Vec<Condition>, PayloadError> {
        let raw = self.field(&self.weather, "weather")?;
        Ok(Vec::<Condition>::deserialize(raw)?)
    }

    pub fn readings(&self) -> Result<MainReadings, PayloadError> {
        let raw = self.field(&self.main, "main")?;
        Ok(MainReadings::deserialize(raw)?)
    }

    fn field<'a>(
        &self,
        value: &'a Option<Value>,
        field: &'static str,
    ) -> Result<&'a Value, PayloadError> {
        value.as_ref().ok_or_else(|| PayloadError::MissingField {
            field,
            context: format!("forecast entry at {}", self.dt_txt),
        })
    }
}

/// `GET /forecast`: 3-hour entries over five days for one city.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastFeed {
    pub city: City,
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherPayload {
    SingleObservation(Observation),
    MultiEntry(ForecastFeed),
}

impl WeatherPayload {
    /// Classify a raw upstream document.
    ///
    /// The presence of a `list` key selects the multi-entry shape, even when the
    /// list is empty; everything else is read as a single observation.
    pub fn from_value(value: Value) -> Result<Self, PayloadError> {
        if value.get("list").is_some() {
            Ok(WeatherPayload::MultiEntry(serde_json::from_value(value)?))
        } else {
            Ok(WeatherPayload::SingleObservation(serde_json::from_value(value)?))
        }
    }

    pub fn location_name(&self) -> &str {
        match self {
            WeatherPayload::SingleObservation(obs) => &obs.name,
            WeatherPayload::MultiEntry(feed) => &feed.city.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_without_list_is_single_observation() {
        let payload = WeatherPayload::from_value(json!({
            "name": "Kyiv",
            "weather": [{"description": "clear sky", "main": "Clear"}],
            "main": {"temp": 280.5, "humidity": 40},
            "cod": 200
        }))
        .expect("valid observation");

        let WeatherPayload::SingleObservation(obs) = payload else {
            panic!("expected single observation");
        };
        assert_eq!(obs.name, "Kyiv");
        assert_eq!(obs.weather[0].description, "clear sky");
        assert_eq!(obs.main.temp.to_string(), "280.5");
    }

    #[test]
    fn empty_list_still_selects_multi_entry() {
        let payload =
            WeatherPayload::from_value(json!({"list": [], "city": {"name": "Lviv"}})).unwrap();

        assert!(matches!(payload, WeatherPayload::MultiEntry(ref f) if f.list.is_empty()));
        assert_eq!(payload.location_name(), "Lviv");
    }

    #[test]
    fn multi_entry_requires_city() {
        let err = WeatherPayload::from_value(json!({"list": []})).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("city"));
    }

    #[test]
    fn missing_main_is_malformed() {
        let err = WeatherPayload::from_value(json!({
            "name": "Kyiv",
            "weather": [{"description": "clear sky"}]
        }))
        .unwrap_err();

        assert!(matches!(err, PayloadError::Malformed(_)));
        assert!(err.to_string().contains("main"));
    }

    #[test]
    fn observation_without_name_is_malformed() {
        let err = WeatherPayload::from_value(json!({
            "weather": [{"description": "clear sky"}],
            "main": {"temp": 280.5}
        }))
        .unwrap_err();

        assert!(matches!(err, PayloadError::Malformed(_)));
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn forecast_entry_without_dt_txt_is_malformed() {
        let err = WeatherPayload::from_value(json!({
            "city": {"name": "Lviv"},
            "list": [{"weather": [{"description": "snow"}], "main": {"temp": 272.0}}]
        }))
        .unwrap_err();

        assert!(matches!(err, PayloadError::Malformed(_)));
        assert!(err.to_string().contains("dt_txt"));
    }

    #[test]
    fn forecast_entry_contents_are_decoded_on_demand() {
        let payload = WeatherPayload::from_value(json!({
            "city": {"name": "Lviv"},
            "list": [
                {"dt_txt": "2024-01-01 12:00:00", "weather": "garbage"},
                {"dt_txt": "2024-01-01 15:00:00", "weather": [{"description": "snow"}], "main": {"temp": 272}}
            ]
        }))
        .expect("entry contents are not checked while classifying");

        let WeatherPayload::MultiEntry(feed) = payload else {
            panic!("expected multi entry");
        };
        assert!(feed.list[0].conditions().unwrap_err().is_malformed());
        assert!(matches!(
            feed.list[0].readings().unwrap_err(),
            PayloadError::MissingField { field: "main", .. }
        ));
        assert_eq!(feed.list[1].conditions().unwrap()[0].description, "snow");
        assert_eq!(feed.list[1].readings().unwrap().temp.to_string(), "272");
    }

    #[test]
    fn non_numeric_temp_is_malformed() {
        let err = WeatherPayload::from_value(json!({
            "name": "Kyiv",
            "weather": [{"description": "clear sky"}],
            "main": {"temp": "warm"}
        }))
        .unwrap_err();

        assert!(err.is_malformed());
    }

    #[test]
    fn non_object_payload_is_malformed() {
        let err = WeatherPayload::from_value(json!([1, 2, 3])).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn integer_temp_keeps_integer_text() {
        let payload = WeatherPayload::from_value(json!({
            "name": "Odesa",
            "weather": [{"description": "mist"}],
            "main": {"temp": 280}
        }))
        .unwrap();

        let WeatherPayload::SingleObservation(obs) = payload else {
            panic!("expected single observation");
        };
        assert_eq!(obs.main.temp.to_string(), "280");
    }
}

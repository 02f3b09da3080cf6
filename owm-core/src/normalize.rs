//! Reshapes classified payloads into flat records and appends them to a store.

use chrono::{DateTime, NaiveDateTime, NaiveTime};
use std::{convert::TryFrom, fmt};

use crate::{
    error::PayloadError,
    model::NormalizedRecord,
    payload::{Condition, MainReadings, WeatherPayload},
    store::MemoryStore,
};

/// Format of forecast `dt_txt` values.
pub const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which forecast entries become records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFilter {
    /// Entries whose `dt_txt` time of day equals the target.
    TimeOfDay(NaiveTime),
    /// Every entry.
    Every,
}

impl SnapshotFilter {
    /// Whether the entry stamped `dt_txt` is kept. A timestamp that cannot be
    /// read never matches a time-of-day filter.
    pub fn matches(&self, dt_txt: &str) -> bool {
        match self {
            SnapshotFilter::Every => true,
            SnapshotFilter::TimeOfDay(target) => match time_of_day(dt_txt) {
                Some(time) => time == *target,
                None => {
                    tracing::debug!(dt_txt, "skipping forecast entry with unreadable timestamp");
                    false
                }
            },
        }
    }
}

/// Wall-clock time as written in `dt_txt`, ignoring any UTC offset.
fn time_of_day(dt_txt: &str) -> Option<NaiveTime> {
    let dt_txt = dt_txt.trim();
    NaiveDateTime::parse_from_str(dt_txt, DT_TXT_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(dt_txt, "%Y-%m-%dT%H:%M:%S"))
        .map(|ts| ts.time())
        .or_else(|_| DateTime::parse_from_rfc3339(dt_txt).map(|ts| ts.naive_local().time()))
        .ok()
}

impl Default for SnapshotFilter {
    /// The 15:00 slot of the 3-hour feed, one snapshot per day.
    fn default() -> Self {
        SnapshotFilter::TimeOfDay(
            NaiveTime::from_hms_opt(15, 0, 0).expect("15:00:00 is a valid time of day"),
        )
    }
}

impl fmt::Display for SnapshotFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotFilter::TimeOfDay(t) => write!(f, "{}", t.format("%H:%M:%S")),
            SnapshotFilter::Every => f.write_str("every"),
        }
    }
}

impl TryFrom<&str> for SnapshotFilter {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("every") || trimmed.eq_ignore_ascii_case("all") {
            return Ok(SnapshotFilter::Every);
        }

        NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
            .map(SnapshotFilter::TimeOfDay)
            .map_err(|_| {
                anyhow::anyhow!(
                    "Invalid snapshot time '{value}'. Use HH:MM:SS (e.g. 15:00:00) or 'every'."
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    filter: SnapshotFilter,
}

impl Normalizer {
    pub fn new(filter: SnapshotFilter) -> Self {
        Self { filter }
    }

    /// Build the records for one payload without touching any store.
    pub fn normalize(&self, payload: &WeatherPayload) -> Result<Vec<NormalizedRecord>, PayloadError> {
        match payload {
            WeatherPayload::SingleObservation(obs) => Ok(vec![NormalizedRecord {
                name: obs.name.clone(),
                description: first_description(&obs.weather, &obs.name)?,
                temp: temp_text(&obs.main),
                data: None,
            }]),
            WeatherPayload::MultiEntry(feed) => {
                let name = &feed.city.name;
                let mut records = Vec::new();

                for entry in &feed.list {
                    if !self.filter.matches(&entry.dt_txt) {
                        continue;
                    }

                    let context = format!("{name} forecast at {}", entry.dt_txt);
                    records.push(NormalizedRecord {
                        name: name.clone(),
                        description: first_description(&entry.conditions()?, &context)?,
                        temp: temp_text(&entry.readings()?),
                        data: Some(entry.dt_txt.clone()),
                    });
                }

                Ok(records)
            }
        }
    }

    /// Append the payload's records to `store`, returning how many were added.
    ///
    /// On error the store is left exactly as it was.
    pub fn normalize_and_store(
        &self,
        payload: &WeatherPayload,
        store: &mut MemoryStore,
    ) -> Result<usize, PayloadError> {
        let records = self.normalize(payload)?;
        let added = records.len();
        store.extend(records);

        tracing::debug!(location = payload.location_name(), added, "stored normalized records");
        Ok(added)
    }
}

fn first_description(weather: &[Condition], context: &str) -> Result<String, PayloadError> {
    weather
        .first()
        .map(|c| c.description.clone())
        .ok_or_else(|| PayloadError::EmptyWeatherList { context: context.to_string() })
}

// serde_json prints exponents without padding (`1e-7`), unlike Python's `1e-07`;
// real temperatures never reach that range.
fn temp_text(main: &MainReadings) -> String {
    main.temp.to_string()
}

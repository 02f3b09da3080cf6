use serde_json::Value;

use crate::{
    error::{FetchError, PayloadError},
    model::{NormalizedRecord, WeatherRequest},
    normalize::Normalizer,
    payload::WeatherPayload,
    provider::{WeatherProvider, WeatherReport},
    store::MemoryStore,
};

/// Saves fetched weather into an in-memory store and hands it back on request.
#[derive(Debug, Default)]
pub struct WeatherService {
    normalizer: Normalizer,
    store: MemoryStore,
}

impl WeatherService {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer, store: MemoryStore::new() }
    }

    pub fn save_weather(&mut self, payload: &WeatherPayload) -> Result<usize, PayloadError> {
        self.normalizer.normalize_and_store(payload, &mut self.store)
    }

    /// Classify and save an unparsed upstream document.
    pub fn save_raw(&mut self, raw: Value) -> Result<usize, PayloadError> {
        let payload = WeatherPayload::from_value(raw)?;
        self.save_weather(&payload)
    }

    /// Save both halves of a report; a missing half contributes nothing.
    pub fn save_report(&mut self, report: &WeatherReport) -> Result<usize, PayloadError> {
        let mut added = 0;
        for payload in [&report.current, &report.forecast].into_iter().flatten() {
            added += self.save_weather(payload)?;
        }
        Ok(added)
    }

    pub async fn fetch_and_save(
        &mut self,
        provider: &dyn WeatherProvider,
        request: &WeatherRequest,
    ) -> Result<usize, FetchError> {
        let payload = provider.fetch(request).await?;
        Ok(self.save_weather(&payload)?)
    }

    pub fn get_weather(&self) -> &[NormalizedRecord] {
        self.store.all()
    }

    pub fn clear_weather(&mut self) {
        self.store.clear();
    }

    pub fn into_store(self) -> MemoryStore {
        self.store
    }
}

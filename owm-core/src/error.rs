use reqwest::StatusCode;

/// A payload that does not have the shape its discriminator selected.
///
/// Every variant is a malformed-payload fault: the upstream broke its data
/// contract and nothing from the payload may reach the store.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// A required key is missing or has the wrong type.
    #[error("malformed weather payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The `weather` sequence has no first element to describe the conditions.
    #[error("malformed weather payload: empty `weather` list in {context}")]
    EmptyWeatherList { context: String },

    /// A selected forecast entry lacks `weather` or `main`.
    #[error("malformed weather payload: missing `{field}` in {context}")]
    MissingField { field: &'static str, context: String },
}

impl PayloadError {
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            PayloadError::Malformed(_)
                | PayloadError::EmptyWeatherList { .. }
                | PayloadError::MissingField { .. }
        )
    }
}

/// Failure to turn a request into a classified payload.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to OpenWeatherMap `{endpoint}` failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("OpenWeatherMap `{endpoint}` request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("failed to parse OpenWeatherMap `{endpoint}` JSON: {source}")]
    Json {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

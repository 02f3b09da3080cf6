//! Core library for the `owm` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - An OpenWeatherMap fetcher behind the `WeatherProvider` abstraction
//! - The two upstream payload shapes, classified once into `WeatherPayload`
//! - Normalization of payloads into flat records kept in an in-memory store
//!
//! It is used by `owm-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod provider;
pub mod service;
pub mod store;

pub use config::Config;
pub use error::{FetchError, PayloadError};
pub use model::{
    Coordinates, HttpMethod, Location, NormalizedRecord, RequestType, Units, WeatherRequest,
};
pub use normalize::{Normalizer, SnapshotFilter};
pub use payload::WeatherPayload;
pub use provider::{WeatherProvider, WeatherReport, provider_from_config};
pub use service::WeatherService;
pub use store::MemoryStore;

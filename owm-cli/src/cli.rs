use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text, validator::Validation};
use owm_core::{
    Config, HttpMethod, Location, Normalizer, SnapshotFilter, Units, WeatherRequest,
    WeatherService, provider_from_config,
};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "owm", version, about = "OpenWeatherMap CLI")]
pub struct Cli {
    /// HTTP method used for API requests (GET or POST); overrides the config.
    #[arg(long, global = true, value_parser = parse_method)]
    pub method: Option<HttpMethod>,

    /// Print records as JSON instead of a table.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set the API key, units and forecast snapshot time.
    Configure,

    /// Show current weather.
    Current {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Show the five-day forecast, one record per matching time slot.
    Forecast {
        #[command(flatten)]
        location: LocationArgs,

        /// Time slot to keep (HH:MM:SS) or "every"; overrides the config.
        #[arg(long, value_parser = parse_snapshot)]
        snapshot: Option<SnapshotFilter>,
    },

    /// Show current weather followed by the forecast.
    Report {
        #[command(flatten)]
        location: LocationArgs,

        /// Time slot to keep (HH:MM:SS) or "every"; overrides the config.
        #[arg(long, value_parser = parse_snapshot)]
        snapshot: Option<SnapshotFilter>,
    },
}

/// A city name or a coordinate pair.
#[derive(Debug, Args)]
#[group(required = true, multiple = true)]
pub struct LocationArgs {
    /// City name, e.g. "Ivano-Frankivsk" or "London,GB".
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude in decimal degrees.
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn to_location(&self) -> anyhow::Result<Location> {
        match (&self.city, self.lat, self.lon) {
            (Some(city), _, _) => Ok(Location::city(city.clone())),
            (None, Some(lat), Some(lon)) => Ok(Location::coordinates(lat, lon)),
            _ => Err(anyhow!("Pass either --city or both --lat and --lon.")),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Current { location } => {
                let request = WeatherRequest::current(location.to_location()?);
                fetch_and_print(self.method, self.json, None, &request).await
            }
            Command::Forecast { location, snapshot } => {
                let request = WeatherRequest::forecast(location.to_location()?);
                fetch_and_print(self.method, self.json, snapshot, &request).await
            }
            Command::Report { location, snapshot } => {
                report(self.method, self.json, snapshot, &location.to_location()?).await
            }
        }
    }
}

fn load_config(method: Option<HttpMethod>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    if let Some(method) = method {
        config.method = method;
    }
    Ok(config)
}

fn service_for(config: &Config, snapshot: Option<SnapshotFilter>) -> anyhow::Result<WeatherService> {
    let filter = match snapshot {
        Some(filter) => filter,
        None => config.snapshot_filter()?,
    };
    Ok(WeatherService::new(Normalizer::new(filter)))
}

async fn fetch_and_print(
    method: Option<HttpMethod>,
    json: bool,
    snapshot: Option<SnapshotFilter>,
    request: &WeatherRequest,
) -> anyhow::Result<()> {
    let config = load_config(method)?;
    let provider = provider_from_config(&config)?;
    let mut service = service_for(&config, snapshot)?;

    let added = service
        .fetch_and_save(provider.as_ref(), request)
        .await
        .with_context(|| format!("Failed to get {} for {}", request.kind, request.location))?;
    tracing::info!(added, location = %request.location, "saved weather records");

    println!("{}", output::render(service.get_weather(), json)?);
    Ok(())
}

async fn report(
    method: Option<HttpMethod>,
    json: bool,
    snapshot: Option<SnapshotFilter>,
    location: &Location,
) -> anyhow::Result<()> {
    let config = load_config(method)?;
    let provider = provider_from_config(&config)?;
    let mut service = service_for(&config, snapshot)?;

    let report = provider.report(location).await;
    if report.current.is_none() && report.forecast.is_none() {
        bail!("No weather data available for {location}. Run with RUST_LOG=warn for details.");
    }

    service.save_report(&report).with_context(|| format!("Failed to save weather for {location}"))?;

    println!("{}", output::render(service.get_weather(), json)?);
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let mut key_prompt = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if config.api_key.is_some() {
        key_prompt = key_prompt.with_help_message("Leave empty to keep the current key");
    }
    let api_key = key_prompt.prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    } else if config.api_key.is_none() {
        bail!("An API key is required.");
    }

    let cursor = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec()).with_starting_cursor(cursor).prompt()?;

    config.snapshot_time = Text::new("Forecast time slot to keep (HH:MM:SS or 'every'):")
        .with_default(&config.snapshot_time)
        .with_validator(|input: &str| {
            Ok(match SnapshotFilter::try_from(input) {
                Ok(_) => Validation::Valid,
                Err(err) => Validation::Invalid(err.to_string().into()),
            })
        })
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn parse_method(value: &str) -> Result<HttpMethod, String> {
    HttpMethod::try_from(value).map_err(|err| err.to_string())
}

fn parse_snapshot(value: &str) -> Result<SnapshotFilter, String> {
    SnapshotFilter::try_from(value).map_err(|err| err.to_string())
}

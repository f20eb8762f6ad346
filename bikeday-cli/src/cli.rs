use std::io::IsTerminal;

use anyhow::{Context, bail};
use bikeday_core::{
    Config, Coordinates, DailyForecast, ForecastReport, ForecastRequest, ForecastSet,
    ForecastSource, ProviderId, Temperature, Theme, provider, sample_forecasts, score_breakdown,
};
use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use inquire::{Confirm, CustomType, Password};
use tracing::debug;

use crate::render::{self, Style};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "bikeday", version, about = "Find the best day of the week to ride a bike")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable coloured output.
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials and location for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "weatherapi".
        provider: String,
    },

    /// Show the bike score for each upcoming forecast.
    Show {
        /// Latitude; defaults to the configured location.
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude; defaults to the configured location.
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        /// Provider to use instead of the configured default.
        #[arg(long)]
        provider: Option<String>,

        /// Skip the network and show sample data.
        #[arg(long)]
        offline: bool,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Score a single reading given on the command line.
    Score {
        /// Day temperature in °C.
        #[arg(long, allow_hyphen_values = true)]
        temp: f64,

        /// Wind speed in m/s.
        #[arg(long)]
        wind: f64,

        /// Precipitation in mm.
        #[arg(long, default_value_t = 0.0)]
        precip: f64,
    },

    /// Set the colour theme, or toggle it when no mode is given.
    Theme { mode: Option<ThemeArg> },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let color = !self.no_color
            && std::env::var_os("NO_COLOR").is_none()
            && std::io::stdout().is_terminal();

        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show {
                lat,
                lon,
                provider,
                offline,
                json,
            } => {
                let config = Config::load()?;
                let coordinates = match (lat, lon) {
                    (Some(lat), Some(lon)) => Coordinates::new(lat, lon)?,
                    _ => Coordinates::new(config.location.latitude, config.location.longitude)
                        .context("Configured location is invalid")?,
                };

                let set = if offline {
                    ForecastSet {
                        source: ForecastSource::Fallback {
                            reason: "offline mode".to_string(),
                        },
                        forecasts: sample_forecasts(Utc::now()),
                    }
                } else {
                    let result = fetch(&config, provider.as_deref(), coordinates).await;
                    ForecastSet::resolve(result, || sample_forecasts(Utc::now()))
                };

                if json {
                    println!("{}", render::json(&set)?);
                } else {
                    let style = Style { color, theme: config.theme };
                    print!("{}", render::forecast_set(&set, style));
                }
                Ok(())
            }
            Command::Score { temp, wind, precip } => {
                let forecast = DailyForecast::new(
                    Utc::now().timestamp(),
                    Temperature {
                        max: temp,
                        min: temp,
                        day: temp,
                    },
                    wind,
                    precip,
                    Vec::new(),
                )?;
                let theme = Config::load()?.theme;
                let breakdown = score_breakdown(&forecast);
                println!("{}", render::breakdown(&breakdown, Style { color, theme }));
                Ok(())
            }
            Command::Theme { mode } => {
                let mut config = Config::load()?;
                config.theme = mode.map(Theme::from).unwrap_or_else(|| config.theme.toggled());
                config.save()?;
                println!("Theme set to {}", config.theme.as_str());
                Ok(())
            }
        }
    }
}

/// Resolve the provider and fetch; any failure here ends up as fallback data.
async fn fetch(
    config: &Config,
    provider_name: Option<&str>,
    coordinates: Coordinates,
) -> anyhow::Result<ForecastReport> {
    let provider = match provider_name {
        Some(name) => provider::provider_from_config(ProviderId::try_from(name)?, config)?,
        None => provider::default_provider_from_config(config)?,
    };
    debug!(provider = %provider.id(), "fetching forecast");

    let report = provider.fetch_forecast(&ForecastRequest { coordinates }).await?;
    Ok(report)
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("{id} API key:"))
        .without_confirmation()
        .prompt()?;
    let api_key = api_key.trim();
    if api_key.is_empty() {
        bail!("API key must not be empty");
    }

    let latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.location.latitude)
        .with_error_message("Please enter a number, e.g. 40.7128")
        .prompt()?;
    let longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.location.longitude)
        .with_error_message("Please enter a number, e.g. -74.0060")
        .prompt()?;
    config.location = Coordinates::new(latitude, longitude)?;

    // The first configured provider becomes the default without asking.
    config.upsert_provider_api_key(id, api_key.to_string());
    if config.default_provider_id().ok() != Some(id)
        && Confirm::new(&format!("Use {id} as the default provider?"))
            .with_default(true)
            .prompt()?
    {
        config.set_default_provider(id);
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

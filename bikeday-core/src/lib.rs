//! Core library for the `bikeday` CLI.
//!
//! This crate defines:
//! - The forecast data model and its validation
//! - The bike score calculation and its qualitative tiers
//! - Abstraction over forecast providers
//! - Sample data and the live-or-fallback decision
//! - Configuration & credentials handling
//!
//! The scoring in [`score`] is pure and synchronous; everything else exists to
//! feed it forecasts.

pub mod config;
pub mod error;
pub mod fallback;
pub mod model;
pub mod provider;
pub mod score;

pub use config::{Config, ProviderConfig, Theme};
pub use error::{FetchError, ForecastError};
pub use fallback::{ForecastSet, ForecastSource, sample_forecasts};
pub use model::{
    Coordinates, DailyForecast, ForecastReport, ForecastRequest, Temperature, WeatherCondition,
};
pub use provider::{ForecastProvider, ProviderId};
pub use score::{BikeScore, ScoreBreakdown, ScoreTier, calculate_bike_score, score_breakdown};

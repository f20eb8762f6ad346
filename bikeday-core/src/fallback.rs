//! Sample forecasts and the explicit choice between live and sample data.

use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::model::{DailyForecast, ForecastReport, Temperature, WeatherCondition};

const SECONDS_PER_DAY: i64 = 86_400;

/// Fixed four-day dataset shown when no live forecast is available.
pub fn sample_forecasts(now: DateTime<Utc>) -> Vec<DailyForecast> {
    let base = now.timestamp();
    let day = |offset: i64,
               (max, min, t_day): (f64, f64, f64),
               wind_speed: f64,
               precipitation: f64,
               (main, description, icon): (&str, &str, &str)| DailyForecast {
        timestamp: base + offset * SECONDS_PER_DAY,
        temperature: Temperature { max, min, day: t_day },
        wind_speed,
        precipitation,
        weather_conditions: vec![WeatherCondition {
            main: main.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }],
    };

    vec![
        day(0, (22.0, 15.0, 18.5), 5.2, 0.0, ("Clouds", "Partly cloudy", "02d")),
        day(1, (24.0, 16.0, 20.0), 4.8, 0.0, ("Clear", "Sunny", "01d")),
        day(2, (20.0, 14.0, 17.0), 6.1, 2.5, ("Rain", "Light rain", "10d")),
        day(3, (21.0, 15.0, 18.0), 5.5, 0.0, ("Clear", "Clear sky", "01d")),
    ]
}

/// Where a [`ForecastSet`] came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ForecastSource {
    Live { location_name: String },
    Fallback { reason: String },
}

/// Forecasts ready for scoring, tagged with their origin.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastSet {
    pub source: ForecastSource,
    pub forecasts: Vec<DailyForecast>,
}

impl ForecastSet {
    /// Use the fetched report, or the caller's fallback data if fetching failed.
    pub fn resolve<E, F>(result: Result<ForecastReport, E>, fallback: F) -> Self
    where
        E: Display,
        F: FnOnce() -> Vec<DailyForecast>,
    {
        match result {
            Ok(report) => Self {
                source: ForecastSource::Live {
                    location_name: report.location_name,
                },
                forecasts: report.forecasts,
            },
            Err(err) => {
                warn!(error = %err, "forecast unavailable, using sample data");
                Self {
                    source: ForecastSource::Fallback {
                        reason: err.to_string(),
                    },
                    forecasts: fallback(),
                }
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ForecastSource::Fallback { .. })
    }
}

//! Bike score: how suitable a forecast is for cycling, from 0 to 100.
//!
//! Three sub-scores are computed independently, each 100 inside an ideal band
//! and decaying linearly to 0 across an acceptable range:
//!
//! | input             | ideal        | acceptable    | weight |
//! |-------------------|--------------|---------------|--------|
//! | day temperature   | 18–25 °C     | 10–30 °C      | 0.5    |
//! | precipitation     | 0 mm         | up to 2 mm    | 0.3    |
//! | wind speed        | up to 5 m/s  | up to 10 m/s  | 0.2    |
//!
//! The weighted sum is truncated toward zero, not rounded.

use std::fmt;

use serde::Serialize;

use crate::{error::ForecastError, model::DailyForecast};

const IDEAL_TEMP_MIN: f64 = 18.0;
const IDEAL_TEMP_MAX: f64 = 25.0;
const ACCEPTABLE_TEMP_MIN: f64 = 10.0;
const ACCEPTABLE_TEMP_MAX: f64 = 30.0;

const IDEAL_WIND_MAX: f64 = 5.0;
const ACCEPTABLE_WIND_MAX: f64 = 10.0;

const IDEAL_PRECIP_MAX: f64 = 0.0;
const ACCEPTABLE_PRECIP_MAX: f64 = 2.0;

const TEMPERATURE_WEIGHT: f64 = 0.5;
const PRECIPITATION_WEIGHT: f64 = 0.3;
const WIND_WEIGHT: f64 = 0.2;

/// Integer bike score in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BikeScore(u8);

impl BikeScore {
    pub const MAX: BikeScore = BikeScore(100);

    /// Clamps values above 100.
    pub fn new(value: u8) -> Self {
        Self(value.min(Self::MAX.0))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn tier(self) -> ScoreTier {
        ScoreTier::from_score(self)
    }

    /// Validate the forecast first, then score it.
    pub fn try_from_forecast(forecast: &DailyForecast) -> Result<Self, ForecastError> {
        forecast.validate()?;
        Ok(calculate_bike_score(forecast))
    }
}

impl fmt::Display for BikeScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Score a forecast.
///
/// Total over finite input. Non-finite values are outside the contract: the
/// result is still within `0..=100` but otherwise meaningless. Use
/// [`BikeScore::try_from_forecast`] to reject them.
pub fn calculate_bike_score(forecast: &DailyForecast) -> BikeScore {
    score_breakdown(forecast).score
}

/// Sub-scores behind a [`BikeScore`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub temperature: f64,
    pub wind: f64,
    pub precipitation: f64,
    pub score: BikeScore,
}

pub fn score_breakdown(forecast: &DailyForecast) -> ScoreBreakdown {
    let temperature = temperature_score(forecast.temperature.day);
    let wind = wind_score(forecast.wind_speed);
    let precipitation = precipitation_score(forecast.precipitation);

    let raw = temperature * TEMPERATURE_WEIGHT
        + precipitation * PRECIPITATION_WEIGHT
        + wind * WIND_WEIGHT;

    // `as` truncates toward zero and saturates, NaN becomes 0.
    let truncated = (raw as i64).clamp(0, i64::from(BikeScore::MAX.0));

    ScoreBreakdown {
        temperature,
        wind,
        precipitation,
        score: BikeScore(truncated as u8),
    }
}

fn temperature_score(temp: f64) -> f64 {
    if (IDEAL_TEMP_MIN..=IDEAL_TEMP_MAX).contains(&temp) {
        100.0
    } else if temp < ACCEPTABLE_TEMP_MIN {
        0.0
    } else if temp < IDEAL_TEMP_MIN {
        ramp_up(temp, ACCEPTABLE_TEMP_MIN, IDEAL_TEMP_MIN)
    } else if temp > ACCEPTABLE_TEMP_MAX {
        0.0
    } else if temp > IDEAL_TEMP_MAX {
        ramp_down(temp, IDEAL_TEMP_MAX, ACCEPTABLE_TEMP_MAX)
    } else {
        100.0
    }
}

fn wind_score(wind_speed: f64) -> f64 {
    if wind_speed <= IDEAL_WIND_MAX {
        100.0
    } else if wind_speed <= ACCEPTABLE_WIND_MAX {
        ramp_down(wind_speed, IDEAL_WIND_MAX, ACCEPTABLE_WIND_MAX)
    } else {
        0.0
    }
}

fn precipitation_score(precipitation: f64) -> f64 {
    if precipitation <= IDEAL_PRECIP_MAX {
        100.0
    } else if precipitation <= ACCEPTABLE_PRECIP_MAX {
        ramp_down(precipitation, IDEAL_PRECIP_MAX, ACCEPTABLE_PRECIP_MAX)
    } else {
        0.0
    }
}

/// 0 at `low`, 100 at `high`.
fn ramp_up(value: f64, low: f64, high: f64) -> f64 {
    (value - low) / (high - low) * 100.0
}

/// 100 at `low`, 0 at `high`.
fn ramp_down(value: f64, low: f64, high: f64) -> f64 {
    (high - value) / (high - low) * 100.0
}

/// Qualitative band of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    Perfect,
    Good,
    Fair,
    Poor,
    Avoid,
}

impl ScoreTier {
    pub fn from_score(score: BikeScore) -> Self {
        match score.value() {
            80.. => ScoreTier::Perfect,
            60.. => ScoreTier::Good,
            40.. => ScoreTier::Fair,
            20.. => ScoreTier::Poor,
            _ => ScoreTier::Avoid,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Perfect => "Perfect",
            ScoreTier::Good => "Good",
            ScoreTier::Fair => "Fair",
            ScoreTier::Poor => "Poor",
            ScoreTier::Avoid => "Avoid",
        }
    }

    /// Display colour as `0xRRGGBB`.
    pub fn color(&self) -> u32 {
        match self {
            ScoreTier::Perfect => 0x4CAF50,
            ScoreTier::Good => 0x8BC34A,
            ScoreTier::Fair => 0xFFC107,
            ScoreTier::Poor => 0xFF9800,
            ScoreTier::Avoid => 0xF44336,
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

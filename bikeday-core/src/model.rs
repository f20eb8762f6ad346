use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::ForecastError, provider::ProviderId};

/// Daily temperatures in degrees Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Temperature {
    pub max: f64,
    pub min: f64,
    pub day: f64,
}

/// A single weather condition as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Short category label, e.g. "Rain" or "Clouds".
    pub main: String,
    pub description: String,
    /// Provider icon code, e.g. "10d". Empty when the provider has none.
    #[serde(default)]
    pub icon: String,
}

/// Forecast for one time slot, the input to the bike score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    pub temperature: Temperature,
    /// Meters per second.
    pub wind_speed: f64,
    /// Accumulated millimeters.
    pub precipitation: f64,
    #[serde(default)]
    pub weather_conditions: Vec<WeatherCondition>,
}

impl DailyForecast {
    /// Build a forecast, rejecting non-finite numbers and negative wind or precipitation.
    pub fn new(
        timestamp: i64,
        temperature: Temperature,
        wind_speed: f64,
        precipitation: f64,
        weather_conditions: Vec<WeatherCondition>,
    ) -> Result<Self, ForecastError> {
        let forecast = Self {
            timestamp,
            temperature,
            wind_speed,
            precipitation,
            weather_conditions,
        };
        forecast.validate()?;
        Ok(forecast)
    }

    /// Check the numeric preconditions of the bike score.
    pub fn validate(&self) -> Result<(), ForecastError> {
        let fields = [
            ("temperature.max", self.temperature.max),
            ("temperature.min", self.temperature.min),
            ("temperature.day", self.temperature.day),
            ("wind_speed", self.wind_speed),
            ("precipitation", self.precipitation),
        ];
        if let Some((field, value)) = fields.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::NonFinite { field, value });
        }

        if self.wind_speed < 0.0 {
            return Err(ForecastError::NegativeWindSpeed(self.wind_speed));
        }
        if self.precipitation < 0.0 {
            return Err(ForecastError::NegativePrecipitation(self.precipitation));
        }

        Ok(())
    }

    pub fn date_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }

    /// The first reported condition, which is the one worth displaying.
    pub fn primary_condition(&self) -> Option<&WeatherCondition> {
        self.weather_conditions.first()
    }
}

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ForecastError> {
        let valid = (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(ForecastError::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }
}

impl Default for Coordinates {
    /// New York City.
    fn default() -> Self {
        Self {
            latitude: 40.7128,
            longitude: -74.0060,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest {
    pub coordinates: Coordinates,
}

/// Forecasts returned by a provider for one location.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub provider: ProviderId,
    pub location_name: String,
    pub forecasts: Vec<DailyForecast>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn temperature(day: f64) -> Temperature {
        Temperature {
            max: 22.0,
            min: 15.0,
            day,
        }
    }

    #[test]
    fn new_accepts_well_formed_values() {
        let forecast = DailyForecast::new(1_700_000_000, temperature(20.0), 3.0, 0.0, Vec::new())
            .expect("valid forecast");
        assert_eq!(forecast.wind_speed, 3.0);
        assert!(forecast.primary_condition().is_none());
    }

    #[rstest]
    #[case(f64::NAN, 1.0, 0.0, "temperature.day")]
    #[case(20.0, f64::INFINITY, 0.0, "wind_speed")]
    #[case(20.0, 1.0, f64::NEG_INFINITY, "precipitation")]
    fn new_rejects_non_finite_values(
        #[case] day: f64,
        #[case] wind: f64,
        #[case] precip: f64,
        #[case] expected_field: &str,
    ) {
        let err = DailyForecast::new(0, temperature(day), wind, precip, Vec::new()).unwrap_err();
        match err {
            ForecastError::NonFinite { field, .. } => assert_eq!(field, expected_field),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    #[case(f64::NAN, 15.0, "temperature.max")]
    #[case(22.0, f64::INFINITY, "temperature.min")]
    fn new_rejects_non_finite_extremes(
        #[case] max: f64,
        #[case] min: f64,
        #[case] expected_field: &str,
    ) {
        let temperature = Temperature {
            max,
            min,
            day: 18.0,
        };
        let err = DailyForecast::new(0, temperature, 1.0, 0.0, Vec::new()).unwrap_err();
        match err {
            ForecastError::NonFinite { field, .. } => assert_eq!(field, expected_field),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn new_rejects_negative_wind_and_precipitation() {
        let err = DailyForecast::new(0, temperature(20.0), -0.1, 0.0, Vec::new()).unwrap_err();
        assert_eq!(err, ForecastError::NegativeWindSpeed(-0.1));

        let err = DailyForecast::new(0, temperature(20.0), 0.0, -2.0, Vec::new()).unwrap_err();
        assert_eq!(err, ForecastError::NegativePrecipitation(-2.0));
    }

    #[test]
    fn deserialized_forecast_defaults_missing_conditions() {
        let json = r#"{
            "timestamp": 1700000000,
            "temperature": { "max": 22.0, "min": 15.0, "day": 18.5 },
            "wind_speed": 5.2,
            "precipitation": 0.0
        }"#;
        let forecast: DailyForecast = serde_json::from_str(json).expect("should deserialize");
        assert!(forecast.weather_conditions.is_empty());
        assert!(forecast.validate().is_ok());
    }

    #[test]
    fn date_time_converts_epoch_seconds() {
        let forecast =
            DailyForecast::new(86_400, temperature(20.0), 0.0, 0.0, Vec::new()).expect("valid");
        let dt = forecast.date_time().expect("in range");
        assert_eq!(dt.to_rfc3339(), "1970-01-02T00:00:00+00:00");
    }

    #[rstest]
    #[case(91.0, 0.0)]
    #[case(-90.5, 0.0)]
    #[case(0.0, 180.1)]
    fn coordinates_reject_out_of_range(#[case] lat: f64, #[case] lon: f64) {
        assert!(Coordinates::new(lat, lon).is_err());
    }

    #[test]
    fn default_coordinates_are_new_york() {
        let c = Coordinates::default();
        assert_eq!(Coordinates::new(c.latitude, c.longitude), Ok(c));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{DailyForecast, ForecastReport, ForecastRequest, Temperature, WeatherCondition},
    provider::fetch_body,
};

use super::{ForecastProvider, ProviderId};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
const PROVIDER: &str = "weatherapi";
/// Longest range available on the free plan.
const FORECAST_DAYS: u8 = 3;

/// Daily forecast from WeatherAPI.com, one [`DailyForecast`] per day.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    maxtemp_c: f64,
    mintemp_c: f64,
    avgtemp_c: f64,
    maxwind_kph: f64,
    #[serde(default)]
    totalprecip_mm: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date_epoch: i64,
    day: WaDay,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

impl WaForecastDay {
    fn into_daily(self) -> Result<DailyForecast, FetchError> {
        let day = self.day;
        // WeatherAPI has no category label; the condition text serves as both.
        let condition = WeatherCondition {
            main: day.condition.text.clone(),
            description: day.condition.text,
            icon: day.condition.icon,
        };

        DailyForecast::new(
            self.date_epoch,
            Temperature {
                max: day.maxtemp_c,
                min: day.mintemp_c,
                day: day.avgtemp_c,
            },
            day.maxwind_kph / 3.6,
            day.totalprecip_mm,
            vec![condition],
        )
        .map_err(|source| FetchError::InvalidRecord {
            provider: PROVIDER,
            source,
        })
    }
}

fn parse_forecast(body: &str) -> Result<ForecastReport, FetchError> {
    let parsed: WaForecastResponse = serde_json::from_str(body).map_err(|source| {
        FetchError::Decode {
            provider: PROVIDER,
            source,
        }
    })?;

    if parsed.forecast.forecastday.is_empty() {
        return Err(FetchError::Empty { provider: PROVIDER });
    }

    let forecasts = parsed
        .forecast
        .forecastday
        .into_iter()
        .map(WaForecastDay::into_daily)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastReport {
        provider: ProviderId::WeatherApi,
        location_name: format!("{}, {}", parsed.location.name, parsed.location.country),
        forecasts,
    })
}

#[async_trait]
impl ForecastProvider for WeatherApiProvider {
    fn id(&self) -> ProviderId {
        ProviderId::WeatherApi
    }

    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastReport, FetchError> {
        let url = format!("{}/v1/forecast.json", self.base_url.trim_end_matches('/'));
        let query = format!("{},{}", request.coordinates.latitude, request.coordinates.longitude);
        let days = FORECAST_DAYS.to_string();
        debug!(provider = PROVIDER, %query, "requesting forecast");

        let req = self.http.get(url).query(&[
            ("key", self.api_key.as_str()),
            ("q", query.as_str()),
            ("days", days.as_str()),
        ]);
        let body = fetch_body(PROVIDER, req).await?;

        let report = parse_forecast(&body)?;
        debug!(provider = PROVIDER, entries = report.forecasts.len(), "forecast mapped");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Coordinates, provider::test_support::serve_once};

    fn new_york() -> ForecastRequest {
        ForecastRequest {
            coordinates: Coordinates::default(),
        }
    }

    const SAMPLE: &str = r#"{
        "location": { "name": "New York", "country": "United States of America", "localtime_epoch": 1700000000 },
        "forecast": {
            "forecastday": [
                {
                    "date": "2023-11-14",
                    "date_epoch": 1699920000,
                    "day": {
                        "maxtemp_c": 24.0, "mintemp_c": 16.0, "avgtemp_c": 20.0,
                        "maxwind_kph": 18.0, "totalprecip_mm": 0.0,
                        "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 }
                    },
                    "hour": []
                },
                {
                    "date_epoch": 1700006400,
                    "day": {
                        "maxtemp_c": 20.0, "mintemp_c": 14.0, "avgtemp_c": 17.0,
                        "maxwind_kph": 36.0, "totalprecip_mm": 1.2,
                        "condition": { "text": "Patchy rain possible" }
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn maps_each_day_to_a_forecast() {
        let report = parse_forecast(SAMPLE).expect("should parse");

        assert_eq!(report.provider, ProviderId::WeatherApi);
        assert_eq!(report.location_name, "New York, United States of America");
        assert_eq!(report.forecasts.len(), 2);

        let first = &report.forecasts[0];
        assert_eq!(first.timestamp, 1_699_920_000);
        assert_eq!(first.temperature.day, 20.0);
        assert_eq!(first.temperature.max, 24.0);
        assert!((first.wind_speed - 5.0).abs() < 1e-9);
        assert_eq!(first.weather_conditions[0].description, "Sunny");
    }

    #[test]
    fn converts_kph_to_meters_per_second() {
        let report = parse_forecast(SAMPLE).expect("should parse");
        let second = &report.forecasts[1];
        assert!((second.wind_speed - 10.0).abs() < 1e-9);
        assert_eq!(second.precipitation, 1.2);
        assert_eq!(second.weather_conditions[0].icon, "");
    }

    #[test]
    fn empty_forecast_is_an_error() {
        let body = r#"{
            "location": { "name": "X", "country": "Y" },
            "forecast": { "forecastday": [] }
        }"#;
        let err = parse_forecast(body).unwrap_err();
        assert!(matches!(err, FetchError::Empty { provider } if provider == "weatherapi"));
    }

    #[test]
    fn error_payload_is_a_decode_error() {
        let body = r#"{ "error": { "code": 2006, "message": "API key is invalid." } }"#;
        let err = parse_forecast(body).unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }

    #[tokio::test]
    async fn requests_three_days_by_coordinates() {
        let (base_url, request_line) = serve_once("200 OK", SAMPLE.to_string()).await;
        let provider = WeatherApiProvider::with_base_url("K".into(), base_url);

        let report = provider.fetch_forecast(&new_york()).await.expect("should fetch");

        assert_eq!(
            request_line.await.expect("server task"),
            "GET /v1/forecast.json?key=K&q=40.7128%2C-74.006&days=3 HTTP/1.1"
        );
        assert_eq!(report.forecasts.len(), 2);
    }

    #[tokio::test]
    async fn server_error_maps_to_status() {
        let (base_url, _request_line) =
            serve_once("500 Internal Server Error", "upstream down".to_string()).await;
        let provider = WeatherApiProvider::with_base_url("K".into(), base_url);

        let err = provider.fetch_forecast(&new_york()).await.unwrap_err();
        match err {
            FetchError::Status {
                provider,
                status,
                body,
            } => {
                assert_eq!(provider, "weatherapi");
                assert_eq!(status, 500);
                assert_eq!(body, "upstream down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

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

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
const PROVIDER: &str = "openweather";

/// 5 day / 3 hour forecast from OpenWeather. Every 3-hour slot becomes one
/// [`DailyForecast`].
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
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
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwRain {
    #[serde(rename = "3h")]
    three_hours: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    rain: Option<OwRain>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_daily(self) -> Result<DailyForecast, FetchError> {
        let precipitation = self.rain.and_then(|r| r.three_hours).unwrap_or(0.0);
        let conditions = self
            .weather
            .into_iter()
            .map(|w| WeatherCondition {
                main: w.main,
                description: w.description,
                icon: w.icon,
            })
            .collect();

        DailyForecast::new(
            self.dt,
            Temperature {
                max: self.main.temp_max,
                min: self.main.temp_min,
                day: self.main.temp,
            },
            self.wind.speed,
            precipitation,
            conditions,
        )
        .map_err(|source| FetchError::InvalidRecord {
            provider: PROVIDER,
            source,
        })
    }
}

fn parse_forecast(body: &str) -> Result<ForecastReport, FetchError> {
    let parsed: OwForecastResponse = serde_json::from_str(body).map_err(|source| {
        FetchError::Decode {
            provider: PROVIDER,
            source,
        }
    })?;

    if parsed.list.is_empty() {
        return Err(FetchError::Empty { provider: PROVIDER });
    }

    let forecasts = parsed
        .list
        .into_iter()
        .map(OwForecastEntry::into_daily)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastReport {
        provider: ProviderId::OpenWeather,
        location_name: format!("{}, {}", parsed.city.name, parsed.city.country),
        forecasts,
    })
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    async fn fetch_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastReport, FetchError> {
        let url = format!("{}/data/2.5/forecast", self.base_url.trim_end_matches('/'));
        let lat = request.coordinates.latitude.to_string();
        let lon = request.coordinates.longitude.to_string();
        debug!(provider = PROVIDER, %lat, %lon, "requesting forecast");

        let req = self.http.get(url).query(&[
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("units", "metric"),
            ("appid", self.api_key.as_str()),
        ]);
        let body = fetch_body(PROVIDER, req).await?;

        let report = parse_forecast(&body)?;
        debug!(provider = PROVIDER, entries = report.forecasts.len(), "forecast mapped");
        Ok(report)
    }
}

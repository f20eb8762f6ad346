//! Terminal and JSON output for scored forecasts.

use bikeday_core::{
    BikeScore, DailyForecast, ForecastSet, ForecastSource, ScoreBreakdown, ScoreTier, Theme,
    calculate_bike_score,
};
use serde::Serialize;

/// How output should look: colour on or off, and the theme's accent.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
    pub theme: Theme,
}

impl Style {
    fn accent(&self) -> u32 {
        match self.theme {
            Theme::Light => 0x1976D2,
            Theme::Dark => 0x90CAF9,
        }
    }

    fn muted(&self) -> u32 {
        match self.theme {
            Theme::Light => 0x616161,
            Theme::Dark => 0xBDBDBD,
        }
    }

    /// Wrap `text` in a 24-bit ANSI foreground colour.
    fn paint(&self, rgb: u32, text: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        let (r, g, b) = ((rgb >> 16) & 0xFF, (rgb >> 8) & 0xFF, rgb & 0xFF);
        format!("\x1b[38;2;{r};{g};{b}m{text}\x1b[0m")
    }
}

pub fn forecast_set(set: &ForecastSet, style: Style) -> String {
    let heading = match &set.source {
        ForecastSource::Live { location_name } => format!("Best Bike Day: {location_name}"),
        ForecastSource::Fallback { reason } => {
            format!("Best Bike Day: sample data (live forecast unavailable: {reason})")
        }
    };

    let mut out = style.paint(style.accent(), &heading);
    out.push('\n');
    for forecast in &set.forecasts {
        out.push_str(&forecast_line(forecast, style));
        out.push('\n');
    }
    out
}

pub fn forecast_line(forecast: &DailyForecast, style: Style) -> String {
    let date = forecast
        .date_time()
        .map(|dt| dt.format("%a, %b %-d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let description = forecast
        .primary_condition()
        .map(|c| capitalize(&c.description))
        .unwrap_or_default();

    let temperature = format!("{}°C", forecast.temperature.day.round() as i64);
    let wind = format!("{} m/s", forecast.wind_speed);
    let rain = if forecast.precipitation > 0.0 {
        format!("{} mm", forecast.precipitation)
    } else {
        String::new()
    };

    let score = calculate_bike_score(forecast);
    format!(
        "{date:<12} {} {temperature:>5} {wind:>9} {rain:>7}  {}",
        style.paint(style.muted(), &format!("{description:<20}")),
        score_badge(score, style),
    )
}

pub fn breakdown(breakdown: &ScoreBreakdown, style: Style) -> String {
    format!(
        "temperature  {:>5.1}\nprecipitation {:>4.1}\nwind         {:>5.1}\nbike score   {}",
        breakdown.temperature,
        breakdown.precipitation,
        breakdown.wind,
        score_badge(breakdown.score, style),
    )
}

fn score_badge(score: BikeScore, style: Style) -> String {
    let tier = score.tier();
    style.paint(tier.color(), &format!("{:>4} {tier}", score.to_string()))
}

#[derive(Serialize)]
struct JsonDay<'a> {
    forecast: &'a DailyForecast,
    score: BikeScore,
    tier: ScoreTier,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    source: &'a ForecastSource,
    days: Vec<JsonDay<'a>>,
}

pub fn json(set: &ForecastSet) -> anyhow::Result<String> {
    let days = set
        .forecasts
        .iter()
        .map(|forecast| {
            let score = calculate_bike_score(forecast);
            JsonDay {
                forecast,
                score,
                tier: score.tier(),
            }
        })
        .collect();

    let report = JsonReport {
        source: &set.source,
        days,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

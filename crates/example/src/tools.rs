//! Tools served by the demo client.

use lodestar::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use thiserror::Error;

/// Longest forecast the service produces.
pub const MAX_FORECAST_DAYS: i64 = 7;

const CONDITIONS: [&str; 4] = ["sunny", "cloudy", "rain", "windy"];

/// Temperature units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToolEnum)]
#[serde(rename_all = "lowercase")]
#[tool_enum(rename_all = "lowercase")]
pub enum Units {
    /// Degrees Celsius.
    Celsius,
    /// Degrees Fahrenheit.
    Fahrenheit,
}

impl Units {
    /// Converts a Celsius reading into these units, rounded to one decimal.
    #[must_use]
    pub fn from_celsius(self, celsius: f64) -> f64 {
        let value = match self {
            Self::Celsius => celsius,
            Self::Fahrenheit => celsius * 9.0 / 5.0 + 32.0,
        };
        (value * 10.0).round() / 10.0
    }
}

/// Errors raised by the weather tools.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The requested forecast length is out of range.
    #[error("forecast length must be between 1 and {MAX_FORECAST_DAYS} days, got {0}")]
    DaysOutOfRange(i64),
    /// The city name is blank.
    #[error("city name is empty")]
    EmptyCity,
}

/// One day of a [`Forecast`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    /// Day offset, starting at 1.
    pub day: i64,
    /// Daytime high.
    pub high: f64,
    /// Overnight low.
    pub low: f64,
    /// Short description of the weather.
    pub conditions: &'static str,
}

/// A multi-day forecast for one city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    /// City the forecast is for.
    pub city: String,
    /// Units of every temperature in `days`.
    pub units: Units,
    /// One entry per forecast day.
    pub days: Vec<DailyForecast>,
}

/// Synthetic weather service.
///
/// Forecasts are derived from the city name, so the same request always
/// yields the same answer. The service counts the forecasts it has served.
#[derive(Debug, Default)]
pub struct WeatherTools {
    requests: AtomicUsize,
}

impl WeatherTools {
    /// Creates a service with a zeroed request counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of forecasts served so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }
}

#[toolset]
impl WeatherTools {
    #[tool]
    /// Get forecast
    /// - Parameter city: City name
    /// - Parameter units: Temperature units
    /// - Parameter days: Number of days to forecast
    async fn forecast(
        &self,
        city: String,
        units: Option<Units>,
        #[default(3)] days: i64,
    ) -> Result<Forecast, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::EmptyCity);
        }
        if !(1..=MAX_FORECAST_DAYS).contains(&days) {
            return Err(WeatherError::DaysOutOfRange(days));
        }

        let served = self.requests.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(city, days, served, "serving forecast");

        let units = units.unwrap_or(Units::Celsius);
        let seed: i64 = city.bytes().map(i64::from).sum();
        let days = (1..=days)
            .map(|day| {
                let low = ((seed + day * 7) % 25) as f64;
                DailyForecast {
                    day,
                    high: units.from_celsius(low + 8.0),
                    low: units.from_celsius(low),
                    conditions: CONDITIONS[((seed + day) % 4) as usize],
                }
            })
            .collect();

        Ok(Forecast {
            city: city.to_string(),
            units,
            days,
        })
    }

    #[tool]
    /// Number of forecasts served since startup.
    async fn request_count(&self) -> usize {
        self.requests()
    }
}

#[tool]
/// Add two integers.
/// - Parameter a: First operand
/// - Parameter b: Second operand
pub async fn add(a: i64, b: i64) -> i64 {
    a.saturating_add(b)
}

#[tool]
/// Greet someone by name.
pub async fn greet(
    /// Who to greet.
    #[default(String::from("World"))]
    name: String,
) -> String {
    format!("Hello, {name}!")
}

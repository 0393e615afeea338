/*
 *  weather.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather data model and the source port the refresh loop polls
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use std::fmt::{self, Display};

/// Temperature scale reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "C", alias = "c", alias = "celsius", alias = "metric")]
    Celsius,
    #[serde(rename = "F", alias = "f", alias = "fahrenheit", alias = "imperial")]
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub fn is_metric(&self) -> bool {
        matches!(self, TemperatureUnit::Celsius)
    }
}

/// A unit tagged reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub value: f64,
    pub unit: TemperatureUnit,
}

impl Temperature {
    pub fn new(value: f64, unit: TemperatureUnit) -> Self {
        Self { value, unit }
    }

    /// Whole degrees, half away from zero (20.5 -> 21, -0.5 -> -1)
    pub fn rounded(&self) -> i64 {
        // -0.4 rounds to -0.0, the integer cast drops the sign
        self.value.round() as i64
    }

    /// Primary reading, "21°C"
    pub fn with_unit(&self) -> String {
        format!("{}{}", self.rounded(), self.unit.symbol())
    }

    /// Secondary reading, "21°"
    pub fn with_degree(&self) -> String {
        format!("{}°", self.rounded())
    }
}

/// Current conditions, produced fresh every poll
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSnapshot {
    pub observed_at: NaiveDateTime,
    pub temperature: Temperature,
    pub feels_like: Temperature,
    /// Relative humidity, 0-100
    pub humidity: u8,
    /// 0-100
    pub precipitation_probability: Option<u8>,
    pub condition_code: i32,
}

/// One day of the multi-day forecast
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub min: Option<Temperature>,
    pub max: Option<Temperature>,
    pub condition_code: i32,
    pub precipitation_probability: Option<u8>,
}

impl DailyForecastEntry {
    /// "min°/max°", None when either end is missing
    pub fn min_max_label(&self) -> Option<String> {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => Some(format!("{}/{}", lo.with_degree(), hi.with_degree())),
            _ => None,
        }
    }
}

/// Ordinal pollen index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PollenCategory {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl PollenCategory {
    /// Label key for the localization tables
    pub fn key(&self) -> &'static str {
        match self {
            PollenCategory::Low => "low",
            PollenCategory::Moderate => "moderate",
            PollenCategory::High => "high",
            PollenCategory::VeryHigh => "very_high",
        }
    }

    /// Provider ordinal, 1 = low ... 5 = extreme
    pub fn from_ordinal(value: i64) -> Option<Self> {
        match value {
            1 => Some(PollenCategory::Low),
            2 => Some(PollenCategory::Moderate),
            3 => Some(PollenCategory::High),
            4 | 5 => Some(PollenCategory::VeryHigh),
            _ => None,
        }
    }

    /// Provider free text ("Low", "Very High", "Extreme")
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "low" => Some(PollenCategory::Low),
            "moderate" => Some(PollenCategory::Moderate),
            "high" => Some(PollenCategory::High),
            "very high" | "very_high" | "extreme" => Some(PollenCategory::VeryHigh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollenReading {
    pub category: PollenCategory,
}

/// Everything one FETCHING phase produced; any part may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherFrame {
    pub current: Option<ConditionSnapshot>,
    pub forecast: Option<Vec<DailyForecastEntry>>,
    pub pollen: Option<PollenReading>,
}

impl WeatherFrame {
    /// Neither current conditions nor a non-empty forecast
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.forecast.as_ref().is_none_or(|f| f.is_empty())
    }
}

// Custom error type for weather API operations.
#[derive(Debug)]
pub enum WeatherApiError {
    HttpRequestError(reqwest::Error),
    HttpStatus(u16, String),
    DeserializationError(JsonError),
    ApiKeyError(String),
    InvalidInput(String),
    MissingData(String),
}

impl Display for WeatherApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherApiError::HttpRequestError(e) => write!(f, "HTTP request error: {}", e),
            WeatherApiError::HttpStatus(code, body) => write!(f, "HTTP status {}: {}", code, body),
            WeatherApiError::DeserializationError(e) => write!(f, "JSON deserialization error: {}", e),
            WeatherApiError::ApiKeyError(msg) => write!(f, "API key required: {}", msg),
            WeatherApiError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            WeatherApiError::MissingData(msg) => write!(f, "Missing weather data: {}", msg),
        }
    }
}

impl std::error::Error for WeatherApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WeatherApiError::HttpRequestError(e) => Some(e),
            WeatherApiError::DeserializationError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherApiError {
    fn from(err: reqwest::Error) -> Self {
        WeatherApiError::HttpRequestError(err)
    }
}

impl From<JsonError> for WeatherApiError {
    fn from(err: JsonError) -> Self {
        WeatherApiError::DeserializationError(err)
    }
}

/// Provider port, each query may fail on its own
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn current(&self) -> Result<ConditionSnapshot, WeatherApiError>;

    /// Up to `days` entries, chronological
    async fn forecast(&self, days: u8) -> Result<Vec<DailyForecastEntry>, WeatherApiError>;

    async fn pollen(&self) -> Result<PollenReading, WeatherApiError>;
}

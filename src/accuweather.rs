/*
 *  accuweather.rs
 *
 *  LyMonS - worth the squeeze
 *  (c) 2020-26 Stuart Hunter
 *
 *  AccuWeather client: current conditions, daily forecast, pollen index
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
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use flate2::read::GzDecoder;
use log::{debug, info, warn};
use reqwest::{header, Client};
use serde::Deserialize;
use std::io::Read;
use std::time::Duration;

use crate::translate::Locale;
use crate::weather::{
    ConditionSnapshot, DailyForecastEntry, PollenCategory, PollenReading, Temperature,
    TemperatureUnit, WeatherApiError, WeatherSource,
};

pub const DEFAULT_BASE_URL: &str = "http://dataservice.accuweather.com";

/// Daily forecast lengths the API offers
const FORECAST_ENDPOINTS: [u8; 4] = [1, 5, 10, 15];

/// Index group 65 is the combined pollen forecast
const POLLEN_GROUP: u32 = 65;

#[derive(Debug, Clone)]
pub struct AccuWeatherConfig {
    pub api_key: String,
    pub location_key: String,
    pub base_url: String,
    pub locale: Locale,
    pub unit: TemperatureUnit,
    pub timeout_secs: u64,
}

/// HTTP adapter for the AccuWeather data service
#[derive(Debug, Clone)]
pub struct AccuWeatherClient {
    client: Client,
    config: AccuWeatherConfig,
}

impl AccuWeatherClient {
    pub fn new(config: AccuWeatherConfig) -> Result<Self, WeatherApiError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        if config.api_key.trim().is_empty() {
            return Err(WeatherApiError::ApiKeyError("no key specified".to_string()));
        }
        if config.location_key.trim().is_empty() {
            return Err(WeatherApiError::InvalidInput("no location key specified".to_string()));
        }

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Accept-Encoding", header::HeaderValue::from_static("gzip"));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.timeout_secs.clamp(1, 10)))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Smallest supported forecast length covering `days`
    pub fn forecast_endpoint_days(days: u8) -> u8 {
        FORECAST_ENDPOINTS
            .iter()
            .copied()
            .find(|&n| n >= days)
            .unwrap_or(FORECAST_ENDPOINTS[FORECAST_ENDPOINTS.len() - 1])
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// GET with query, body decoded from gzip when the server compressed it
    async fn fetch(&self, url: &str, extra: &[(&str, String)]) -> Result<String, WeatherApiError> {
        let mut params = vec![
            ("apikey", self.config.api_key.clone()),
            ("language", self.config.locale.code().to_string()),
        ];
        params.extend(extra.iter().map(|(k, v)| (*k, v.clone())));

        let response = self.client.get(url).query(&params).send().await?;
        let status = response.status();
        let raw = response.bytes().await?;

        // Try to decode as gzip first, fall back to plain text if it fails
        let plain = {
            let mut decoder = GzDecoder::new(&raw[..]);
            let mut decoded = String::new();
            match decoder.read_to_string(&mut decoded) {
                Ok(_) => decoded,
                Err(_) => String::from_utf8_lossy(&raw).to_string(),
            }
        };

        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(WeatherApiError::HttpStatus(status.as_u16(), plain));
        }
        Ok(plain)
    }

    fn pick(&self, metric: &Measure, imperial: &Measure) -> Temperature {
        match self.config.unit {
            TemperatureUnit::Celsius => Temperature::new(metric.value, TemperatureUnit::Celsius),
            TemperatureUnit::Fahrenheit => Temperature::new(imperial.value, TemperatureUnit::Fahrenheit),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Measure {
    #[serde(rename = "Value")]
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DualMeasure {
    metric: Measure,
    imperial: Measure,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CurrentConditionsDto {
    local_observation_date_time: String,
    weather_icon: Option<i32>,
    temperature: DualMeasure,
    real_feel_temperature: Option<DualMeasure>,
    relative_humidity: Option<f64>,
    precipitation_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ForecastResponseDto {
    daily_forecasts: Vec<DailyForecastDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DailyForecastDto {
    date: String,
    temperature: MinMaxDto,
    day: Option<DayPartDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MinMaxDto {
    minimum: Option<Measure>,
    maximum: Option<Measure>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DayPartDto {
    icon: Option<i32>,
    precipitation_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct IndexDto {
    category: Option<String>,
    category_value: Option<i64>,
}

fn parse_local(stamp: &str) -> Result<NaiveDateTime, WeatherApiError> {
    DateTime::parse_from_rfc3339(stamp)
        .map(|dt| dt.naive_local())
        .map_err(|e| WeatherApiError::InvalidInput(format!("bad timestamp {}: {}", stamp, e)))
}

fn parse_date(stamp: &str) -> Result<NaiveDate, WeatherApiError> {
    parse_local(stamp).map(|dt| dt.date())
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

#[async_trait]
impl WeatherSource for AccuWeatherClient {
    async fn current(&self) -> Result<ConditionSnapshot, WeatherApiError> {
        let url = self.url(&format!("currentconditions/v1/{}", self.config.location_key));
        let body = self.fetch(&url, &[("details", "true".to_string())]).await?;
        let mut list: Vec<CurrentConditionsDto> = serde_json::from_str(&body)?;
        if list.is_empty() {
            return Err(WeatherApiError::MissingData("empty current conditions".to_string()));
        }
        let dto = list.swap_remove(0);

        let temperature = self.pick(&dto.temperature.metric, &dto.temperature.imperial);
        let feels_like = dto
            .real_feel_temperature
            .as_ref()
            .map(|t| self.pick(&t.metric, &t.imperial))
            .unwrap_or(temperature);

        let snapshot = ConditionSnapshot {
            observed_at: parse_local(&dto.local_observation_date_time)?,
            temperature,
            feels_like,
            humidity: dto.relative_humidity.map(percent).unwrap_or(0),
            precipitation_probability: dto.precipitation_probability.map(percent),
            condition_code: dto.weather_icon.unwrap_or(0),
        };
        debug!("current conditions: {:?}", snapshot);
        Ok(snapshot)
    }

    async fn forecast(&self, days: u8) -> Result<Vec<DailyForecastEntry>, WeatherApiError> {
        if days == 0 {
            return Ok(Vec::new());
        }
        let endpoint = Self::forecast_endpoint_days(days);
        let url = self.url(&format!("forecasts/v1/daily/{}day/{}", endpoint, self.config.location_key));
        let extra = [
            ("details", "true".to_string()),
            ("metric", self.config.unit.is_metric().to_string()),
        ];
        let body = self.fetch(&url, &extra).await?;
        let response: ForecastResponseDto = serde_json::from_str(&body)?;

        let unit = self.config.unit;
        let entries = response
            .daily_forecasts
            .into_iter()
            .take(days as usize)
            .map(|d| {
                Ok(DailyForecastEntry {
                    date: parse_date(&d.date)?,
                    min: d.temperature.minimum.map(|m| Temperature::new(m.value, unit)),
                    max: d.temperature.maximum.map(|m| Temperature::new(m.value, unit)),
                    condition_code: d.day.as_ref().and_then(|p| p.icon).unwrap_or(0),
                    precipitation_probability: d.day.and_then(|p| p.precipitation_probability).map(percent),
                })
            })
            .collect::<Result<Vec<_>, WeatherApiError>>()?;

        info!("forecast: {} of {} requested days", entries.len(), days);
        Ok(entries)
    }

    async fn pollen(&self) -> Result<PollenReading, WeatherApiError> {
        let url = self.url(&format!(
            "indices/v1/daily/1day/{}/groups/{}",
            self.config.location_key, POLLEN_GROUP
        ));
        let body = self.fetch(&url, &[]).await?;
        let list: Vec<IndexDto> = serde_json::from_str(&body)?;
        let first = list
            .first()
            .ok_or_else(|| WeatherApiError::MissingData("empty pollen index".to_string()))?;

        first
            .category_value
            .and_then(PollenCategory::from_ordinal)
            .or_else(|| first.category.as_deref().and_then(PollenCategory::from_label))
            .map(|category| PollenReading { category })
            .ok_or_else(|| WeatherApiError::MissingData(format!("unrecognised pollen category {:?}", first.category)))
    }
}

/*
 *  weather.rs
 *
 *  wxpaper - ink it in
 *  (c) 2020-26 Stuart Hunter
 *
 *  Weather summary record and the OpenWeatherMap current-conditions client
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

use std::fmt::Write as _;
use std::io::Read;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{OPENWEATHER_API_KEY_ENV, OPENWEATHER_URL, PLACEHOLDER};
use crate::deutils::{deserialize_optional_number, deserialize_optional_string};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_RETRIES: u8 = 3;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenWeather returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid weather JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OpenWeather API key not provided, set OPENWEATHER_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("no city given for the weather lookup")]
    MissingCity,

    #[error("reading weather input: {0}")]
    Io(#[from] std::io::Error),

    #[error("no weather JSON provided")]
    EmptyInput,
}

/// Place the record describes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub country: Option<String>,
}

/// Flat current-conditions record consumed by the renderer
///
/// `location.city` is required. Every other field may be absent, null or
/// of the wrong type and is then treated as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    pub location: Location,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub temperature_c: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub feels_like_c: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub humidity_pct: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub pressure_hpa: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub wind_m_s: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub conditions: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub icon: Option<String>,
}

impl WeatherSummary {
    pub fn from_json_str(json: &str) -> Result<Self, WeatherError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a record from any reader, e.g. stdin or a file
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, WeatherError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(WeatherError::EmptyInput);
        }
        Self::from_json_str(raw)
    }

    pub fn to_json_pretty(&self) -> Result<String, WeatherError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Multi-line human readable summary
    pub fn format_text(&self) -> String {
        let mut out = String::new();
        let country = self.location.country.as_deref().unwrap_or_default();
        let _ = writeln!(out, "Location: {}, {}", self.location.city, country);
        let _ = writeln!(out, "Temperature: {} °C", one_decimal(self.temperature_c));
        let _ = writeln!(out, "Feels like: {} °C", one_decimal(self.feels_like_c));
        let _ = writeln!(out, "Humidity: {} %", plain(self.humidity_pct));
        let _ = writeln!(out, "Pressure: {} hPa", plain(self.pressure_hpa));
        let _ = writeln!(out, "Wind: {} m/s", plain(self.wind_m_s));
        let _ = writeln!(out, "Conditions: {}", self.conditions.as_deref().unwrap_or_default());
        let _ = write!(out, "Icon: {}", self.icon.as_deref().unwrap_or_default());
        out
    }
}

fn one_decimal(v: Option<f64>) -> String {
    v.map(|v| format!("{:.1}", v)).unwrap_or_else(|| PLACEHOLDER.to_string())
}

fn plain(v: Option<f64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| PLACEHOLDER.to_string())
}

// OpenWeatherMap data/2.5/weather response, only the fields we use

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentConditions {
    pub name: String,
    #[serde(default)]
    pub sys: OwmSys,
    pub main: OwmMain,
    #[serde(default)]
    pub wind: OwmWind,
    #[serde(default)]
    pub weather: Vec<OwmWeather>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmSys {
    pub country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwmWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwmWeather {
    pub description: String,
    pub icon: String,
}

impl From<CurrentConditions> for WeatherSummary {
    fn from(c: CurrentConditions) -> Self {
        let first = c.weather.into_iter().next();
        WeatherSummary {
            location: Location { city: c.name, country: c.sys.country },
            temperature_c: c.main.temp,
            feels_like_c: c.main.feels_like,
            humidity_pct: c.main.humidity,
            pressure_hpa: c.main.pressure,
            wind_m_s: c.wind.speed,
            conditions: first.as_ref().map(|w| w.description.clone()),
            icon: first.map(|w| w.icon),
        }
    }
}

/// Explicit key first, then the environment
pub fn resolve_api_key(explicit: Option<&str>) -> Result<String, WeatherError> {
    pick_api_key(explicit, std::env::var(OPENWEATHER_API_KEY_ENV).ok())
}

fn pick_api_key(explicit: Option<&str>, env: Option<String>) -> Result<String, WeatherError> {
    explicit
        .map(str::to_string)
        .or(env)
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or(WeatherError::MissingApiKey)
}

/// Client for the OpenWeatherMap current weather endpoint
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>, units: impl Into<String>) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("wxpaper/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: OPENWEATHER_URL.to_string(),
            api_key: api_key.into(),
            units: units.into(),
        })
    }

    /// Client used only for icon downloads, which need no key
    pub fn for_downloads() -> Result<Self, WeatherError> {
        Self::new(String::new(), "metric")
    }

    /// Current conditions for `city` and optional country code
    pub async fn current(
        &self,
        city: &str,
        country: Option<&str>,
    ) -> Result<CurrentConditions, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::MissingCity);
        }
        let q = match country.map(str::trim).filter(|c| !c.is_empty()) {
            Some(cc) => format!("{},{}", city, cc),
            None => city.to_string(),
        };
        info!("Fetching weather for {}", q);
        let params = [
            ("q", q.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", self.units.as_str()),
        ];
        let body = self.get_with_retries(&self.base_url, Some(&params[..])).await?;
        let conditions: CurrentConditions = serde_json::from_slice(&body)?;
        debug!("OpenWeather: {} {:?}", conditions.name, conditions.main);
        Ok(conditions)
    }

    pub async fn summary(&self, city: &str, country: Option<&str>) -> Result<WeatherSummary, WeatherError> {
        self.current(city, country).await.map(WeatherSummary::from)
    }

    /// Fetch raw bytes, used for icon downloads
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, WeatherError> {
        self.get_with_retries(url, None).await
    }

    async fn get_with_retries(
        &self,
        url: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<Vec<u8>, WeatherError> {
        let mut retries = 0;
        loop {
            let mut request = self.client.get(url);
            if let Some(params) = params {
                request = request.query(params);
            }
            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let raw = response.bytes().await?;
                    if !status.is_success() {
                        return Err(WeatherError::Status {
                            status,
                            body: String::from_utf8_lossy(&raw).trim().to_string(),
                        });
                    }
                    return Ok(raw.to_vec());
                }
                Err(e) => {
                    retries += 1;
                    if retries >= MAX_RETRIES || !(e.is_connect() || e.is_timeout()) {
                        return Err(e.into());
                    }
                    warn!("request to {} failed ({}), retrying", url, e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }
}

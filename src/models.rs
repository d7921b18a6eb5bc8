//! Data models for trip weather resolution
//!
//! This module contains the catalog types (cities and their seasonal
//! profiles), the internal weather types shared by both forecast
//! producers, and the external provider response types.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The four calendar seasons used for seasonal synthesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonName {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl SeasonName {
    /// Season for a calendar date (northern-hemisphere month mapping)
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            3..=5 => SeasonName::Spring,
            6..=8 => SeasonName::Summer,
            9..=11 => SeasonName::Fall,
            _ => SeasonName::Winter,
        }
    }

    /// Lowercase label as used in the catalog and user-facing notes
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            SeasonName::Spring => "spring",
            SeasonName::Summer => "summer",
            SeasonName::Fall => "fall",
            SeasonName::Winter => "winter",
        }
    }
}

impl fmt::Display for SeasonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Closed weather condition vocabulary shared by both forecast producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    Sunny,
    #[serde(rename = "Partly Cloudy")]
    PartlyCloudy,
    Cloudy,
    Rainy,
    Snowy,
}

impl Condition {
    /// Fold a provider condition string into the closed vocabulary.
    ///
    /// Total: unknown strings map to `PartlyCloudy`.
    #[must_use]
    pub fn from_provider(label: &str) -> Self {
        match label {
            "Clear" => Condition::Sunny,
            "Clouds" | "Mist" | "Fog" | "Haze" | "Smoke" => Condition::Cloudy,
            "Rain" | "Drizzle" | "Thunderstorm" => Condition::Rainy,
            "Snow" => Condition::Snowy,
            _ => Condition::PartlyCloudy,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Condition::Sunny => "Sunny",
            Condition::PartlyCloudy => "Partly Cloudy",
            Condition::Cloudy => "Cloudy",
            Condition::Rainy => "Rainy",
            Condition::Snowy => "Snowy",
        };
        write!(f, "{label}")
    }
}

/// A single-instant weather observation or estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointWeather {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Condition label
    pub condition: Condition,
    /// Humidity percentage (0-100)
    pub humidity: u32,
    /// Wind speed in km/h
    pub wind_speed: f64,
}

/// One calendar day's weather summary
///
/// Produced by live aggregation or by seasonal synthesis; the resolver
/// concatenates both without special-casing. Invariant: `high_temp >=
/// low_temp`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyForecast {
    /// ISO calendar date in the destination's local time
    pub date: NaiveDate,
    /// Daily high in Celsius
    pub high_temp: f64,
    /// Daily low in Celsius
    pub low_temp: f64,
    /// Condition label
    pub condition: Condition,
    /// Humidity percentage (0-100)
    pub humidity: u32,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Precipitation accumulation in mm (0 when unknown)
    pub precipitation: f64,
}

/// The provider's atomic forecast unit, normalized for aggregation.
///
/// Ephemeral: consumed by the aggregator and discarded.
#[derive(Debug, Clone)]
pub struct RawForecastSample {
    /// Sample instant as unix seconds (UTC)
    pub timestamp: i64,
    /// Temperature in Celsius
    pub temperature: f64,
    /// Humidity percentage (0-100)
    pub humidity: u32,
    /// Wind speed in km/h
    pub wind_speed: f64,
    /// Provider condition string, not yet folded into `Condition`
    pub condition: String,
    /// Rain volume over the 3-hour interval in mm
    pub rain_3h: Option<f64>,
    /// Snow volume over the 3-hour interval in mm
    pub snow_3h: Option<f64>,
    /// Probability of precipitation (0.0-1.0)
    pub pop: Option<f64>,
}

/// Geographic coordinates of a destination
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Seasonal weather profile for a destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Season {
    /// Representative months, e.g. ["December", "January", "February"]
    pub months: Vec<String>,
    /// Average temperature in Celsius
    pub avg_temp: f64,
    /// Representative activity tags
    pub activities: Vec<String>,
}

/// A destination in the city catalog
///
/// Immutable once loaded. `attractions` and `neighborhoods` are
/// collaborator data carried through the catalog but unused by the
/// resolution core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub province: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub timezone: String,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub description: String,
    pub seasons: HashMap<SeasonName, Season>,
    #[serde(default)]
    pub attractions: Vec<String>,
    #[serde(default)]
    pub neighborhoods: Vec<String>,
}

impl City {
    /// Seasonal profile for a season, if the catalog has one
    #[must_use]
    pub fn season(&self, name: SeasonName) -> Option<&Season> {
        self.seasons.get(&name)
    }
}

/// OpenWeatherMap-style provider response structures
pub mod openweather {
    use serde::Deserialize;
    use std::collections::HashMap;

    /// 5-day/3-hour forecast response
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub list: Vec<ForecastItem>,
        pub city: CityInfo,
    }

    /// One 3-hour forecast period
    #[derive(Debug, Deserialize)]
    pub struct ForecastItem {
        pub dt: i64,
        pub main: MainReadings,
        #[serde(default)]
        pub weather: Vec<WeatherTag>,
        #[serde(default)]
        pub wind: Option<WindReadings>,
        #[serde(default)]
        pub pop: Option<f64>,
        #[serde(default)]
        pub rain: Option<HashMap<String, f64>>,
        #[serde(default)]
        pub snow: Option<HashMap<String, f64>>,
    }

    /// Temperature and humidity block
    #[derive(Debug, Deserialize)]
    pub struct MainReadings {
        pub temp: f64,
        pub humidity: u32,
    }

    /// Condition tag block
    #[derive(Debug, Deserialize)]
    pub struct WeatherTag {
        pub main: String,
        #[serde(default)]
        pub description: String,
    }

    /// Wind block; speed in m/s under metric units
    #[derive(Debug, Deserialize)]
    pub struct WindReadings {
        pub speed: f64,
    }

    /// Queried location info, including its UTC offset in seconds
    #[derive(Debug, Deserialize)]
    pub struct CityInfo {
        pub name: String,
        #[serde(default)]
        pub country: String,
        pub timezone: i32,
    }

    /// Current-conditions response
    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub main: MainReadings,
        #[serde(default)]
        pub weather: Vec<WeatherTag>,
        #[serde(default)]
        pub wind: Option<WindReadings>,
    }
}

/// Convert m/s (provider metric units) to km/h
fn ms_to_kmh(speed: f64) -> f64 {
    speed * 3.6
}

impl From<&openweather::ForecastItem> for RawForecastSample {
    fn from(item: &openweather::ForecastItem) -> Self {
        Self {
            timestamp: item.dt,
            temperature: item.main.temp,
            humidity: item.main.humidity,
            wind_speed: ms_to_kmh(item.wind.as_ref().map(|w| w.speed).unwrap_or(0.0)),
            condition: item
                .weather
                .first()
                .map(|w| w.main.clone())
                .unwrap_or_default(),
            rain_3h: item.rain.as_ref().and_then(|r| r.get("3h").copied()),
            snow_3h: item.snow.as_ref().and_then(|s| s.get("3h").copied()),
            pop: item.pop,
        }
    }
}

impl From<&openweather::CurrentResponse> for PointWeather {
    fn from(current: &openweather::CurrentResponse) -> Self {
        Self {
            temperature: current.main.temp,
            condition: Condition::from_provider(
                current
                    .weather
                    .first()
                    .map(|w| w.main.as_str())
                    .unwrap_or(""),
            ),
            humidity: current.main.humidity,
            wind_speed: ms_to_kmh(current.wind.as_ref().map(|w| w.speed).unwrap_or(0.0)),
        }
    }
}

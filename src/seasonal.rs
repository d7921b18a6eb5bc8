//! Seasonal Synthesis Model
//!
//! Produces a single day's or point-in-time weather estimate from a
//! city's seasonal average plus bounded randomized variation. The RNG is
//! injected so tests can assert bounds deterministically; condition
//! derivation is a fixed total table and is never randomized.

use crate::models::{Condition, DailyForecast, PointWeather, Season, SeasonName};
use chrono::NaiveDate;
use rand::rngs::{StdRng, ThreadRng};
use rand::{RngExt, SeedableRng};
use std::ops::Range;

/// Bound of the uniform perturbation applied to a point estimate, in °C
const POINT_VARIATION: f64 = 5.0;

/// Bound of the symmetric high/low spread around a point estimate, in °C
const SPREAD_VARIATION: f64 = 4.0;

/// Derive a condition from season and temperature.
///
/// The table is total: every season covers every temperature, with
/// exactly one fallback band per season. For a fixed temperature the
/// result is always the same label.
#[must_use]
pub fn condition_for(season: SeasonName, temperature: f64) -> Condition {
    match season {
        SeasonName::Summer => {
            if temperature > 25.0 {
                Condition::Sunny
            } else if temperature > 20.0 {
                Condition::PartlyCloudy
            } else {
                Condition::Cloudy
            }
        }
        SeasonName::Spring => {
            if temperature > 15.0 {
                Condition::PartlyCloudy
            } else {
                Condition::Cloudy
            }
        }
        SeasonName::Fall => {
            if temperature > 10.0 {
                Condition::PartlyCloudy
            } else {
                Condition::Cloudy
            }
        }
        SeasonName::Winter => {
            if temperature < 0.0 {
                Condition::Snowy
            } else if temperature < 5.0 {
                Condition::Rainy
            } else {
                Condition::Cloudy
            }
        }
    }
}

/// Humidity band (percent) for a condition
fn humidity_band(condition: Condition) -> Range<u32> {
    match condition {
        Condition::Sunny => 30..60,
        Condition::PartlyCloudy => 50..70,
        Condition::Cloudy => 60..80,
        Condition::Rainy => 70..90,
        Condition::Snowy => 60..80,
    }
}

/// Wind speed band (km/h) for a season
fn wind_band(season: SeasonName) -> Range<f64> {
    match season {
        SeasonName::Winter => 5.0..20.0,
        SeasonName::Spring => 10.0..30.0,
        SeasonName::Summer => 5.0..15.0,
        SeasonName::Fall => 8.0..23.0,
    }
}

/// Seasonal weather synthesizer over an injected random source
#[derive(Debug)]
pub struct SeasonalModel<R> {
    rng: R,
}

impl SeasonalModel<ThreadRng> {
    /// Model backed by the thread-local generator
    #[must_use]
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for SeasonalModel<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl SeasonalModel<StdRng> {
    /// Deterministic model for tests and reproducible runs
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: RngExt> SeasonalModel<R> {
    /// Model over an arbitrary random source
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Synthesize a single-instant estimate for a season.
    ///
    /// Base temperature is the seasonal average, perturbed uniformly in
    /// [-5, +5] °C. Humidity is drawn from the condition's band, wind
    /// from the season's band.
    pub fn synthesize_point(&mut self, season: &Season, name: SeasonName) -> PointWeather {
        let variation = self
            .rng
            .random_range(-POINT_VARIATION..=POINT_VARIATION);
        let temperature = season.avg_temp + variation;

        let condition = condition_for(name, temperature);
        let humidity = self.rng.random_range(humidity_band(condition));
        let wind_speed = self.rng.random_range(wind_band(name));

        PointWeather {
            temperature,
            condition,
            humidity,
            wind_speed,
        }
    }

    /// Synthesize one calendar day's forecast for a season.
    ///
    /// A second independent perturbation bounded to [-4, +4] °C is
    /// applied symmetrically around the point estimate, so `high >= low`
    /// holds by construction. Precipitation is not modeled on the
    /// seasonal path and is always reported as zero.
    pub fn synthesize_day(
        &mut self,
        season: &Season,
        name: SeasonName,
        date: NaiveDate,
    ) -> DailyForecast {
        let point = self.synthesize_point(season, name);
        let spread = self
            .rng
            .random_range(-SPREAD_VARIATION..=SPREAD_VARIATION)
            .abs();

        DailyForecast {
            date,
            high_temp: point.temperature + spread,
            low_temp: point.temperature - spread,
            condition: point.condition,
            humidity: point.humidity,
            wind_speed: point.wind_speed,
            precipitation: 0.0,
        }
    }
}

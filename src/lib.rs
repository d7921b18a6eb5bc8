//! `tripcast` - Trip-weather resolution engine
//!
//! This library produces one weather record per calendar day of a trip,
//! sourced from a live short-range forecast provider or from a
//! statistically-synthesized seasonal model, merged into one continuous
//! series with user-facing advisory notes.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod notes;
pub mod resolver;
pub mod seasonal;

// Re-export core types for public API
pub use aggregate::aggregate_daily;
pub use api::ForecastApiClient;
pub use catalog::CityCatalog;
pub use config::TripcastConfig;
pub use error::TripcastError;
pub use models::{
    City, Condition, DailyForecast, PointWeather, RawForecastSample, Season, SeasonName,
};
pub use notes::advisory_notes;
pub use resolver::{Resolution, WeatherService};
pub use seasonal::SeasonalModel;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TripcastError>;

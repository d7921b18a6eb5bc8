//! Error types and handling for the `tripcast` engine

use thiserror::Error;

/// Main error type for the `tripcast` engine
#[derive(Error, Debug)]
pub enum TripcastError {
    /// Malformed or inverted trip dates; fatal, never falls back
    #[error("Invalid date range: {message}")]
    InvalidRange { message: String },

    /// Destination missing from the city catalog
    #[error("City '{city}' not found in catalog")]
    CityNotFound { city: String },

    /// Catalog gap: the city has no entry for the requested season
    #[error("No seasonal data for {season} in {city}")]
    NoSeasonData { city: String, season: String },

    /// Live provider unreachable or unusable; recoverable via fallback
    #[error("Forecast source unavailable: {message}")]
    SourceUnavailable { message: String },

    /// City catalog failed to load or parse
    #[error("Catalog error: {message}")]
    Catalog { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl TripcastError {
    /// Create a new invalid-range error
    pub fn invalid_range<S: Into<String>>(message: S) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }

    /// Create a new city-not-found error
    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    /// Create a new no-season-data error
    pub fn no_season_data<S: Into<String>, T: Into<String>>(city: S, season: T) -> Self {
        Self::NoSeasonData {
            city: city.into(),
            season: season.into(),
        }
    }

    /// Create a new source-unavailable error
    pub fn source_unavailable<S: Into<String>>(message: S) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    /// Create a new catalog error
    pub fn catalog<S: Into<String>>(message: S) -> Self {
        Self::Catalog {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the resolver may absorb this error by switching sources
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TripcastError::SourceUnavailable { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            TripcastError::InvalidRange { message } => {
                format!("Invalid trip dates: {message}")
            }
            TripcastError::CityNotFound { city } => {
                format!("We don't have data for '{city}'. Please check the destination name.")
            }
            TripcastError::NoSeasonData { city, season } => {
                format!("No {season} weather data is available for {city}.")
            }
            TripcastError::SourceUnavailable { .. } => {
                "Unable to reach the live forecast service. Please try again later.".to_string()
            }
            TripcastError::Catalog { .. } => {
                "The destination catalog could not be loaded.".to_string()
            }
            TripcastError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            TripcastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

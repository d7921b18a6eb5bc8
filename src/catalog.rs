//! City Metadata Store
//!
//! Loads and indexes the static destination catalog. The catalog is
//! read-only reference data: loading is side-effect-free and repeat-safe,
//! and the owning service loads it once and holds it for process lifetime.

use crate::error::TripcastError;
use crate::models::City;
use crate::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// On-disk catalog file layout
#[derive(Debug, Deserialize)]
struct CatalogFile {
    cities: Vec<City>,
}

/// Indexed, immutable destination catalog
#[derive(Debug, Clone)]
pub struct CityCatalog {
    cities: Vec<City>,
}

impl CityCatalog {
    /// Load the catalog from a JSON file.
    ///
    /// # Errors
    /// Returns `Catalog` when the file cannot be parsed; the failure is
    /// fatal to every dependent call and is not retried.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading city catalog from {}", path.display());
        let data = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&data)?;
        info!(
            "Loaded {} cities from {}",
            catalog.cities.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse the catalog from a JSON string
    pub fn from_json(data: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(data)
            .map_err(|e| TripcastError::catalog(format!("failed to parse city catalog: {e}")))?;
        Ok(Self {
            cities: file.cities,
        })
    }

    /// Find a city by name. Case-insensitive, exact-name match only.
    ///
    /// # Errors
    /// Returns `CityNotFound` when no catalog entry matches.
    pub fn find(&self, name: &str) -> Result<&City> {
        self.cities
            .iter()
            .find(|city| city.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| TripcastError::city_not_found(name))
    }

    /// Number of catalog entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

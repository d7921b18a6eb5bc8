//! Forecast resolution
//!
//! Decides, per requested date range, which forecast source applies,
//! invokes the live aggregator and/or the seasonal model, and stitches
//! the results into one contiguous, strictly date-ordered series.

use crate::aggregate::aggregate_daily;
use crate::api::ForecastApiClient;
use crate::catalog::CityCatalog;
use crate::config::TripcastConfig;
use crate::error::TripcastError;
use crate::models::{DailyForecast, PointWeather, RawForecastSample, SeasonName};
use crate::notes::advisory_notes;
use crate::seasonal::SeasonalModel;
use crate::Result;
use chrono::{Duration, NaiveDate, Utc};
use rand::RngExt;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// Forecast horizon of the live provider, in days beyond the trip start
const LIVE_HORIZON_DAYS: i64 = 5;

/// A resolved forecast series
#[derive(Debug, Clone)]
pub struct Resolution {
    /// One entry per calendar day in `[start, end]`, strictly ordered
    pub series: Vec<DailyForecast>,
    /// Whether the series mixes live-sourced and synthesized days
    pub used_hybrid: bool,
}

/// Trip-weather resolution service.
///
/// Owns the read-only city catalog and the provider client; holds no
/// per-request state, so independent requests may run concurrently.
pub struct WeatherService {
    catalog: CityCatalog,
    client: ForecastApiClient,
    config: TripcastConfig,
}

impl WeatherService {
    /// Build a service from configuration, loading the city catalog.
    pub fn new(config: TripcastConfig) -> Result<Self> {
        let catalog = CityCatalog::from_path(&config.catalog.path)?;
        let client = ForecastApiClient::new(&config.weather)?;
        Ok(Self {
            catalog,
            client,
            config,
        })
    }

    /// Build a service from preconstructed parts.
    pub fn with_parts(
        catalog: CityCatalog,
        client: ForecastApiClient,
        config: TripcastConfig,
    ) -> Self {
        Self {
            catalog,
            client,
            config,
        }
    }

    /// Get a daily forecast series for a trip.
    ///
    /// Dates are ISO `YYYY-MM-DD` strings.
    pub async fn get_weather_forecast(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<DailyForecast>> {
        let (start, end) = parse_range(start_date, end_date)?;
        let resolution = self.resolve(city, start, end).await?;
        Ok(resolution.series)
    }

    /// Get a daily forecast series plus advisory notes for a trip.
    pub async fn get_weather_forecast_with_notes(
        &self,
        city: &str,
        start_date: &str,
        end_date: &str,
    ) -> Result<(Vec<DailyForecast>, Vec<String>)> {
        let (start, end) = parse_range(start_date, end_date)?;
        let today = Utc::now().date_naive();
        let resolution = self.resolve_as_of(city, start, end, today).await?;

        let days_until_trip = (start - today).num_days();
        let notes = advisory_notes(city, start, end, days_until_trip, resolution.used_hybrid);

        Ok((resolution.series, notes))
    }

    /// Get current conditions for a city, live-first with seasonal
    /// fallback for "now".
    pub async fn get_weather(&self, city: &str) -> Result<PointWeather> {
        match self.client.fetch_current(city).await {
            Ok(current) => Ok(PointWeather::from(&current)),
            Err(e) if e.is_recoverable() => {
                debug!("Live conditions unavailable for '{}': {}", city, e);
                let today = Utc::now().date_naive();
                self.synthesize_point(city, today)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a forecast series relative to today's date.
    pub async fn resolve(&self, city: &str, start: NaiveDate, end: NaiveDate) -> Result<Resolution> {
        self.resolve_as_of(city, start, end, Utc::now().date_naive())
            .await
    }

    /// Resolve a forecast series relative to an explicit reference date.
    ///
    /// Policy: within the live horizon, attempt the live aggregator and
    /// fill whatever it cannot cover by synthesis; beyond the horizon,
    /// or when the live source is unavailable, synthesize every day.
    /// The returned series is contiguous over `[start, end]`.
    #[instrument(skip(self))]
    pub async fn resolve_as_of(
        &self,
        city: &str,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Result<Resolution> {
        if end < start {
            return Err(TripcastError::invalid_range(format!(
                "end date {end} is before start date {start}"
            )));
        }

        let days_until_trip = (start - today).num_days();
        let mut model = SeasonalModel::new();

        if days_until_trip <= LIVE_HORIZON_DAYS {
            match self.fetch_live(city, start, end).await {
                Ok(live) => {
                    return self.stitch(city, start, end, live, &mut model);
                }
                Err(e) if e.is_recoverable() => {
                    info!(
                        "Live forecast unavailable for '{}', falling back to seasonal synthesis: {}",
                        city, e
                    );
                }
                Err(e) => return Err(e),
            }
        } else {
            debug!(
                "Trip starts in {} days, beyond the {}-day live horizon; skipping live path",
                days_until_trip, LIVE_HORIZON_DAYS
            );
        }

        let series = self.synthesize_range(city, start, end, &mut model)?;
        Ok(Resolution {
            series,
            used_hybrid: false,
        })
    }

    /// Fetch and aggregate the live forecast for the requested window.
    async fn fetch_live(
        &self,
        city: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyForecast>> {
        let response = self.client.fetch_forecast(city).await?;
        let samples: Vec<RawForecastSample> =
            response.list.iter().map(RawForecastSample::from).collect();
        Ok(aggregate_daily(
            &samples,
            response.city.timezone,
            start,
            end,
        ))
    }

    /// Merge a live-sourced prefix with synthesized days into one
    /// contiguous series over `[start, end]`.
    ///
    /// Every date the live aggregation did not cover is synthesized.
    /// The series is hybrid when it mixes both sources; a live response
    /// that covered nothing degrades to a plain seasonal series.
    fn stitch<R: RngExt>(
        &self,
        city: &str,
        start: NaiveDate,
        end: NaiveDate,
        live: Vec<DailyForecast>,
        model: &mut SeasonalModel<R>,
    ) -> Result<Resolution> {
        let mut by_date: BTreeMap<NaiveDate, DailyForecast> =
            live.into_iter().map(|day| (day.date, day)).collect();

        let mut series = Vec::new();
        let mut synthesized = 0usize;
        let mut date = start;
        while date <= end {
            match by_date.remove(&date) {
                Some(day) => series.push(day),
                None => {
                    series.push(self.synthesize_day(city, date, model)?);
                    synthesized += 1;
                }
            }
            date += Duration::days(1);
        }

        if synthesized > 0 {
            warn!(
                "Synthesized {} of {} days to fill live coverage for '{}'",
                synthesized,
                series.len(),
                city
            );
        }

        let used_hybrid = synthesized > 0 && synthesized < series.len();
        Ok(Resolution {
            series,
            used_hybrid,
        })
    }

    /// Synthesize every day in `[start, end]` from seasonal averages.
    fn synthesize_range<R: RngExt>(
        &self,
        city: &str,
        start: NaiveDate,
        end: NaiveDate,
        model: &mut SeasonalModel<R>,
    ) -> Result<Vec<DailyForecast>> {
        let mut series = Vec::new();
        let mut date = start;
        while date <= end {
            series.push(self.synthesize_day(city, date, model)?);
            date += Duration::days(1);
        }
        Ok(series)
    }

    /// Synthesize a single day for a cataloged city.
    fn synthesize_day<R: RngExt>(
        &self,
        city: &str,
        date: NaiveDate,
        model: &mut SeasonalModel<R>,
    ) -> Result<DailyForecast> {
        let entry = self.catalog.find(city)?;
        let season_name = SeasonName::for_date(date);
        let season = entry
            .season(season_name)
            .ok_or_else(|| TripcastError::no_season_data(&entry.name, season_name.label()))?;
        Ok(model.synthesize_day(season, season_name, date))
    }

    /// Synthesize a point-in-time estimate for a cataloged city.
    fn synthesize_point(&self, city: &str, date: NaiveDate) -> Result<PointWeather> {
        let entry = self.catalog.find(city)?;
        let season_name = SeasonName::for_date(date);
        let season = entry
            .season(season_name)
            .ok_or_else(|| TripcastError::no_season_data(&entry.name, season_name.label()))?;
        Ok(SeasonalModel::new().synthesize_point(season, season_name))
    }

    /// Read access to the loaded catalog
    #[must_use]
    pub fn catalog(&self) -> &CityCatalog {
        &self.catalog
    }

    /// Read access to the active configuration
    #[must_use]
    pub fn config(&self) -> &TripcastConfig {
        &self.config
    }
}

/// Parse an ISO date-string pair, rejecting malformed input before any
/// source is consulted.
fn parse_range(start_date: &str, end_date: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date(start_date, "start")?;
    let end = parse_date(end_date, "end")?;
    Ok((start, end))
}

fn parse_date(value: &str, which: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        TripcastError::invalid_range(format!("invalid {which} date '{value}', expected YYYY-MM-DD"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    const TEST_CATALOG: &str = r#"{
        "cities": [
            {
                "name": "Toronto",
                "province": "Ontario",
                "country": "Canada",
                "coordinates": {"lat": 43.6532, "lng": -79.3832},
                "timezone": "America/Toronto",
                "seasons": {
                    "winter": {"months": ["December", "January", "February"], "avg_temp": -4.5, "activities": ["skating"]},
                    "spring": {"months": ["March", "April", "May"], "avg_temp": 9.0, "activities": ["parks"]},
                    "summer": {"months": ["June", "July", "August"], "avg_temp": 22.0, "activities": ["patios"]},
                    "fall": {"months": ["September", "October", "November"], "avg_temp": 11.0, "activities": ["hikes"]}
                }
            },
            {
                "name": "Whitehorse",
                "province": "Yukon",
                "country": "Canada",
                "coordinates": {"lat": 60.7212, "lng": -135.0568},
                "timezone": "America/Whitehorse",
                "seasons": {
                    "summer": {"months": ["June", "July", "August"], "avg_temp": 14.0, "activities": ["midnight sun"]}
                }
            }
        ]
    }"#;

    fn test_service() -> WeatherService {
        let config = TripcastConfig::default();
        let catalog = CityCatalog::from_json(TEST_CATALOG).unwrap();
        let client = ForecastApiClient::new(&config.weather).unwrap();
        WeatherService::with_parts(catalog, client, config)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn live_day(d: NaiveDate, high: f64, low: f64) -> DailyForecast {
        DailyForecast {
            date: d,
            high_temp: high,
            low_temp: low,
            condition: Condition::Sunny,
            humidity: 50,
            wind_speed: 12.0,
            precipitation: 0.4,
        }
    }

    #[test]
    fn test_parse_range_rejects_malformed_dates() {
        assert!(matches!(
            parse_range("2024-13-40", "2024-07-05"),
            Err(TripcastError::InvalidRange { .. })
        ));
        assert!(matches!(
            parse_range("2024-07-01", "July 5th"),
            Err(TripcastError::InvalidRange { .. })
        ));
        assert!(parse_range("2024-07-01", "2024-07-05").is_ok());
    }

    #[tokio::test]
    async fn test_inverted_range_is_rejected_immediately() {
        let service = test_service();
        let result = service
            .resolve_as_of(
                "Toronto",
                date(2024, 7, 10),
                date(2024, 7, 5),
                date(2024, 7, 1),
            )
            .await;
        assert!(matches!(result, Err(TripcastError::InvalidRange { .. })));
    }

    #[tokio::test]
    async fn test_far_trip_synthesizes_full_contiguous_series() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 10);
        let resolution = service
            .resolve_as_of("Toronto", start, end, date(2024, 6, 1))
            .await
            .unwrap();

        assert_eq!(resolution.series.len(), 10);
        assert!(!resolution.used_hybrid);
        let mut expected = start;
        for day in &resolution.series {
            assert_eq!(day.date, expected);
            assert!(day.high_temp >= day.low_temp);
            expected += Duration::days(1);
        }
    }

    #[tokio::test]
    async fn test_near_trip_without_key_falls_back_to_seasonal() {
        let service = test_service();
        let start = date(2024, 7, 2);
        let end = date(2024, 7, 6);
        // Live horizon applies, but the client has no key, so the
        // recoverable failure drops us onto the seasonal path.
        let resolution = service
            .resolve_as_of("Toronto", start, end, date(2024, 7, 1))
            .await
            .unwrap();
        assert_eq!(resolution.series.len(), 5);
        assert!(!resolution.used_hybrid);
    }

    #[tokio::test]
    async fn test_unknown_city_without_live_is_city_not_found() {
        let service = test_service();
        let result = service
            .resolve_as_of(
                "Nowhereville",
                date(2024, 7, 2),
                date(2024, 7, 6),
                date(2024, 7, 1),
            )
            .await;
        assert!(matches!(result, Err(TripcastError::CityNotFound { .. })));
    }

    #[tokio::test]
    async fn test_missing_season_data_propagates() {
        let service = test_service();
        // Whitehorse only has summer data in the test catalog.
        let result = service
            .resolve_as_of(
                "Whitehorse",
                date(2024, 1, 10),
                date(2024, 1, 12),
                date(2023, 12, 1),
            )
            .await;
        assert!(matches!(result, Err(TripcastError::NoSeasonData { .. })));
    }

    #[test]
    fn test_stitch_appends_seasonal_suffix_and_marks_hybrid() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 10);
        let live: Vec<DailyForecast> = (0..6)
            .map(|i| live_day(start + Duration::days(i), 25.0, 18.0))
            .collect();

        let mut model = SeasonalModel::seeded(11);
        let resolution = service
            .stitch("Toronto", start, end, live, &mut model)
            .unwrap();

        assert!(resolution.used_hybrid);
        assert_eq!(resolution.series.len(), 10);
        // Live prefix is passed through untouched.
        assert_eq!(resolution.series[0].high_temp, 25.0);
        assert_eq!(resolution.series[5].high_temp, 25.0);
        // Synthesized suffix reports no precipitation.
        assert_eq!(resolution.series[6].precipitation, 0.0);
        let mut expected = start;
        for day in &resolution.series {
            assert_eq!(day.date, expected);
            expected += Duration::days(1);
        }
    }

    #[test]
    fn test_stitch_fills_interior_gap() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 3);
        // Live coverage is missing the middle day.
        let live = vec![live_day(start, 24.0, 17.0), live_day(end, 26.0, 19.0)];

        let mut model = SeasonalModel::seeded(3);
        let resolution = service
            .stitch("Toronto", start, end, live, &mut model)
            .unwrap();

        assert!(resolution.used_hybrid);
        assert_eq!(resolution.series.len(), 3);
        assert_eq!(resolution.series[1].date, date(2024, 7, 2));
        assert!(resolution.series[1].high_temp >= resolution.series[1].low_temp);
    }

    #[test]
    fn test_stitch_with_empty_live_is_not_hybrid() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 3);

        let mut model = SeasonalModel::seeded(8);
        let resolution = service
            .stitch("Toronto", start, end, Vec::new(), &mut model)
            .unwrap();

        assert!(!resolution.used_hybrid);
        assert_eq!(resolution.series.len(), 3);
    }

    #[test]
    fn test_stitch_with_full_live_coverage_is_not_hybrid() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 4);
        let live: Vec<DailyForecast> = (0..4)
            .map(|i| live_day(start + Duration::days(i), 23.0, 16.0))
            .collect();

        let mut model = SeasonalModel::seeded(21);
        let resolution = service
            .stitch("Toronto", start, end, live, &mut model)
            .unwrap();

        assert!(!resolution.used_hybrid);
        assert_eq!(resolution.series.len(), 4);
    }

    #[test]
    fn test_stitch_unknown_city_with_full_live_coverage_succeeds() {
        let service = test_service();
        let start = date(2024, 7, 1);
        let end = date(2024, 7, 2);
        let live = vec![live_day(start, 30.0, 22.0), live_day(end, 29.0, 21.0)];

        let mut model = SeasonalModel::seeded(4);
        // The city is not in the catalog, but synthesis is never needed.
        let resolution = service
            .stitch("Osaka", start, end, live, &mut model)
            .unwrap();
        assert_eq!(resolution.series.len(), 2);
        assert!(!resolution.used_hybrid);
    }
}

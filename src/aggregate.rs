//! Live forecast aggregation
//!
//! Converts the provider's irregular-interval sample sequence into one
//! summary per destination-local calendar day. Local time is derived
//! from the provider-returned UTC offset for the request, never from a
//! static zone database, so daylight-saving state at the queried instant
//! is respected.

use crate::models::{Condition, DailyForecast, RawForecastSample};
use chrono::{DateTime, Duration, NaiveDate};
use std::collections::BTreeMap;
use tracing::debug;

/// Bucket samples by destination-local date and reduce each bucket to a
/// single daily summary.
///
/// Samples whose local instant falls outside `[start 00:00:00,
/// end 23:59:59]` are discarded. Dates with no surviving samples are
/// absent from the output; filling them is the resolver's job. Samples
/// are sorted by timestamp first so the condition tie-break below is
/// canonical.
#[must_use]
pub fn aggregate_daily(
    samples: &[RawForecastSample],
    utc_offset_secs: i32,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<DailyForecast> {
    let mut ordered: Vec<&RawForecastSample> = samples.iter().collect();
    ordered.sort_by_key(|sample| sample.timestamp);

    let mut buckets: BTreeMap<NaiveDate, Vec<&RawForecastSample>> = BTreeMap::new();
    for sample in ordered {
        let Some(instant) = DateTime::from_timestamp(sample.timestamp, 0) else {
            continue;
        };
        let local = instant + Duration::seconds(i64::from(utc_offset_secs));
        let local_date = local.date_naive();

        if local_date < start || local_date > end {
            continue;
        }

        buckets.entry(local_date).or_default().push(sample);
    }

    debug!(
        "Aggregated {} samples into {} local days",
        samples.len(),
        buckets.len()
    );

    buckets
        .into_iter()
        .map(|(date, group)| reduce_bucket(date, &group))
        .collect()
}

/// Reduce one local date's samples to a daily summary.
///
/// High/low are the raw max/min, never interpolated or smoothed.
/// Humidity is the truncated arithmetic mean, wind the arithmetic mean.
/// Rain and snow interval volumes are summed as equivalent accumulation.
/// The condition is the most frequent label; ties go to the label seen
/// first in timestamp order.
fn reduce_bucket(date: NaiveDate, group: &[&RawForecastSample]) -> DailyForecast {
    let mut high = f64::NEG_INFINITY;
    let mut low = f64::INFINITY;
    let mut humidity_sum: u64 = 0;
    let mut wind_sum = 0.0;
    let mut precipitation = 0.0;
    // (condition, count) pairs in first-seen order
    let mut condition_counts: Vec<(Condition, usize)> = Vec::new();

    for sample in group {
        high = high.max(sample.temperature);
        low = low.min(sample.temperature);
        humidity_sum += u64::from(sample.humidity);
        wind_sum += sample.wind_speed;
        precipitation += sample.rain_3h.unwrap_or(0.0) + sample.snow_3h.unwrap_or(0.0);

        let condition = Condition::from_provider(&sample.condition);
        match condition_counts.iter_mut().find(|(c, _)| *c == condition) {
            Some((_, count)) => *count += 1,
            None => condition_counts.push((condition, 1)),
        }
    }

    let count = group.len().max(1);
    let condition = modal_condition(&condition_counts);

    DailyForecast {
        date,
        high_temp: high,
        low_temp: low,
        condition,
        humidity: (humidity_sum / count as u64) as u32,
        wind_speed: wind_sum / count as f64,
        precipitation,
    }
}

/// Most frequent condition; on a tie the first-seen label wins
fn modal_condition(counts: &[(Condition, usize)]) -> Condition {
    let mut best = (Condition::PartlyCloudy, 0);
    for &(condition, count) in counts {
        if count > best.1 {
            best = (condition, count);
        }
    }
    best.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp: i64, temperature: f64) -> RawForecastSample {
        RawForecastSample {
            timestamp,
            temperature,
            humidity: 60,
            wind_speed: 10.0,
            condition: "Clouds".to_string(),
            rain_3h: None,
            snow_3h: None,
            pop: None,
        }
    }

    // 2024-04-10 00:00:00 UTC
    const DAY_START: i64 = 1712707200;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_high_low_from_raw_extremes() {
        let samples = vec![
            sample(DAY_START + 3 * 3600, 10.0),
            sample(DAY_START + 6 * 3600, 15.0),
            sample(DAY_START + 9 * 3600, 12.0),
        ];
        let days = aggregate_daily(&samples, 0, date(2024, 4, 10), date(2024, 4, 10));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].high_temp, 15.0);
        assert_eq!(days[0].low_temp, 10.0);
    }

    #[test]
    fn test_window_filter_excludes_one_second_past_end() {
        // 23:59:59 local on the end date is in; one second later is out.
        let inside = sample(DAY_START + 24 * 3600 - 1, 10.0);
        let outside = sample(DAY_START + 24 * 3600, 30.0);
        let days = aggregate_daily(
            &[inside, outside],
            0,
            date(2024, 4, 10),
            date(2024, 4, 10),
        );
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].high_temp, 10.0);
    }

    #[test]
    fn test_offset_shifts_samples_into_local_day() {
        // 23:00 UTC on the 9th lands on the 10th at UTC+2.
        let late_evening = sample(DAY_START - 3600, 18.0);
        let days = aggregate_daily(
            &[late_evening],
            7200,
            date(2024, 4, 10),
            date(2024, 4, 10),
        );
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date(2024, 4, 10));
    }

    #[test]
    fn test_humidity_mean_is_truncated() {
        let mut a = sample(DAY_START, 10.0);
        a.humidity = 50;
        let mut b = sample(DAY_START + 3600, 10.0);
        b.humidity = 51;
        let days = aggregate_daily(&[a, b], 0, date(2024, 4, 10), date(2024, 4, 10));
        assert_eq!(days[0].humidity, 50);
    }

    #[test]
    fn test_precipitation_sums_rain_and_snow() {
        let mut a = sample(DAY_START, 1.0);
        a.rain_3h = Some(1.5);
        let mut b = sample(DAY_START + 3600, 0.0);
        b.snow_3h = Some(2.0);
        let mut c = sample(DAY_START + 7200, 0.5);
        c.rain_3h = Some(0.5);
        c.snow_3h = Some(0.25);
        let days = aggregate_daily(&[a, b, c], 0, date(2024, 4, 10), date(2024, 4, 10));
        assert_eq!(days[0].precipitation, 4.25);
    }

    #[test]
    fn test_modal_condition_with_first_seen_tie_break() {
        let mut a = sample(DAY_START, 10.0);
        a.condition = "Rain".to_string();
        let mut b = sample(DAY_START + 3600, 10.0);
        b.condition = "Clear".to_string();
        let mut c = sample(DAY_START + 7200, 10.0);
        c.condition = "Clear".to_string();
        let mut d = sample(DAY_START + 10800, 10.0);
        d.condition = "Rain".to_string();
        // Two Rainy, two Sunny; Rainy was seen first in timestamp order.
        let days = aggregate_daily(&[b, d, a, c], 0, date(2024, 4, 10), date(2024, 4, 10));
        assert_eq!(days[0].condition, Condition::Rainy);
    }

    #[test]
    fn test_days_without_samples_are_absent() {
        let samples = vec![sample(DAY_START, 12.0)];
        let days = aggregate_daily(&samples, 0, date(2024, 4, 10), date(2024, 4, 12));
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].date, date(2024, 4, 10));
    }

    #[test]
    fn test_output_is_date_ordered() {
        let samples = vec![
            sample(DAY_START + 48 * 3600, 14.0),
            sample(DAY_START, 12.0),
            sample(DAY_START + 24 * 3600, 13.0),
        ];
        let days = aggregate_daily(&samples, 0, date(2024, 4, 10), date(2024, 4, 12));
        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 4, 10), date(2024, 4, 11), date(2024, 4, 12)]
        );
    }
}

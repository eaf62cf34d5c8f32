//! Daily forecast aggregation
//!
//! Reduces the three-hourly forecast series to one entry per weekday name.
//! Buckets are keyed by the weekday name alone, not the calendar date, so a
//! series longer than a week folds both Mondays into a single "Monday" entry.
//! The condition shown for a day is the one of the first sample seen for it.

use chrono::{Local, TimeZone};
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::models::{
    Condition, DailyForecast, RawForecastSample, kelvin_to_celsius, round_hundredths,
};

/// Running totals for one weekday
#[derive(Debug)]
struct DayBucket {
    day: String,
    sum_kelvin: f64,
    count: u32,
    condition: Condition,
}

impl DayBucket {
    fn new(day: String, first: &RawForecastSample) -> Self {
        Self {
            day,
            sum_kelvin: 0.0,
            count: 0,
            condition: first.condition.clone(),
        }
    }

    fn add(&mut self, sample: &RawForecastSample) {
        self.sum_kelvin += sample.temperature_kelvin;
        self.count += 1;
    }

    fn finish(self) -> DailyForecast {
        let mean_kelvin = self.sum_kelvin / f64::from(self.count);
        DailyForecast {
            day: self.day,
            temperature_celsius: round_hundredths(kelvin_to_celsius(mean_kelvin)),
            condition: self.condition,
        }
    }
}

/// Aggregate using the host's local calendar
#[must_use]
pub fn aggregate_daily(series: &[RawForecastSample]) -> Vec<DailyForecast> {
    aggregate_daily_in(series, &Local)
}

/// Aggregate with weekday names taken from `tz`.
///
/// Output order is the order in which each weekday name first appears in
/// `series`. An empty series gives an empty result.
#[must_use]
pub fn aggregate_daily_in<Tz: TimeZone>(
    series: &[RawForecastSample],
    tz: &Tz,
) -> Vec<DailyForecast> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<DayBucket> = Vec::new();

    for sample in series {
        let Some(instant) = sample.time() else {
            warn!(
                "Skipping forecast sample with unrepresentable timestamp {}",
                sample.timestamp
            );
            continue;
        };
        let day = instant
            .with_timezone(tz)
            .date_naive()
            .format("%A")
            .to_string();

        let slot = match index.get(&day) {
            Some(&slot) => slot,
            None => {
                buckets.push(DayBucket::new(day.clone(), sample));
                index.insert(day, buckets.len() - 1);
                buckets.len() - 1
            }
        };
        buckets[slot].add(sample);
    }

    debug!(
        "Aggregated {} forecast samples into {} days",
        series.len(),
        buckets.len()
    );

    buckets.into_iter().map(DayBucket::finish).collect()
}

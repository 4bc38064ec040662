//! Temperature history for the chart: a trailing window of readings
//! anchored on the reading closest to now.

use chrono::{Months, NaiveDate};

use crate::types::Temperature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeScale {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl TimeScale {
    pub fn months(self) -> u32 {
        match self {
            TimeScale::OneMonth => 1,
            TimeScale::ThreeMonths => 3,
            TimeScale::SixMonths => 6,
        }
    }

    pub fn from_months(months: u32) -> Option<Self> {
        match months {
            1 => Some(TimeScale::OneMonth),
            3 => Some(TimeScale::ThreeMonths),
            6 => Some(TimeScale::SixMonths),
            _ => None,
        }
    }
}

/// Parallel date and value columns, ready to plot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemperatureSeries {
    pub dates: Vec<String>,
    pub temperatures: Vec<f64>,
}

fn reading_date(reading: &Temperature) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&reading.date, "%Y-%m-%d").ok()
}

/// The reading date nearest to `now`; earlier entries win ties. Falls back
/// to `now` when there are no dated readings.
pub fn anchor_date(readings: &[Temperature], now: NaiveDate) -> NaiveDate {
    readings
        .iter()
        .filter_map(reading_date)
        .min_by_key(|date| (*date - now).num_days().abs())
        .unwrap_or(now)
}

/// Readings dated on or after `anchor - scale`, in stored order. Readings
/// with unparsable dates are dropped.
pub fn temperature_window(
    readings: &[Temperature],
    scale: TimeScale,
    now: NaiveDate,
) -> TemperatureSeries {
    let anchor = anchor_date(readings, now);
    let cutoff = anchor.checked_sub_months(Months::new(scale.months()));

    let mut series = TemperatureSeries::default();
    for reading in readings {
        let Some(date) = reading_date(reading) else {
            continue;
        };
        if cutoff.is_some_and(|cutoff| date < cutoff) {
            continue;
        }
        series.dates.push(reading.date.clone());
        series.temperatures.push(reading.temperature);
    }
    series
}

//! Time handling for GFS model data.
//!
//! The GrADS data server publishes time coordinates as fractional days. Model
//! day `d` is proleptic Gregorian ordinal `d - 1`, so 0001-01-01 00:00 UTC is
//! model day 2.0 and 2017-11-11 00:00 UTC is 736645.0. These helpers convert
//! between that representation, calendar time and POSIX seconds.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Timelike, Utc};

use crate::error::{WindError, WindResult};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Convert a model fractional-day timestamp into calendar time.
///
/// The sub-day part is rounded to the nearest second, which absorbs the
/// precision lost when servers print hourly steps such as `736645.0416667`.
pub fn timestamp_to_datetime(timestamp: f64) -> WindResult<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return Err(WindError::Protocol(format!(
            "Model timestamp is not a number: {}",
            timestamp
        )));
    }

    let integer_day = timestamp.trunc();
    let fractional_day = timestamp - integer_day;

    let ordinal = integer_day as i64 - 1;
    let date = i32::try_from(ordinal)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| {
            WindError::Protocol(format!("Model timestamp out of range: {}", timestamp))
        })?;

    let midnight = Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN));
    let seconds = (fractional_day * SECONDS_PER_DAY).round() as i64;

    Ok(midnight + Duration::seconds(seconds))
}

/// Convert calendar time into a model fractional-day timestamp.
pub fn datetime_to_timestamp(time: &DateTime<Utc>) -> f64 {
    let day = time.date_naive().num_days_from_ce() as f64 + 1.0;
    let seconds = time.num_seconds_from_midnight() as f64
        + time.nanosecond() as f64 / 1_000_000_000.0;
    day + seconds / SECONDS_PER_DAY
}

/// Convert calendar time into whole UTC seconds since the Unix epoch.
pub fn datetime_to_posix(time: &DateTime<Utc>) -> i64 {
    time.timestamp()
}

/// Convert POSIX seconds into calendar time.
pub fn posix_to_datetime(seconds: i64) -> WindResult<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single().ok_or_else(|| {
        WindError::Configuration(format!("POSIX timestamp out of range: {}", seconds))
    })
}

/// An inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Range reaching `past_hours` before and `future_hours` after `target`.
    pub fn around(target: DateTime<Utc>, past_hours: i64, future_hours: i64) -> Self {
        Self {
            start: target - Duration::hours(past_hours),
            end: target + Duration::hours(future_hours),
        }
    }

    pub fn contains(&self, dt: &DateTime<Utc>) -> bool {
        dt >= &self.start && dt <= &self.end
    }
}

/// GFS model run cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynopticCycle {
    /// 00Z run
    Z00,
    /// 06Z run
    Z06,
    /// 12Z run
    Z12,
    /// 18Z run
    Z18,
}

impl SynopticCycle {
    pub fn hour(&self) -> u32 {
        match self {
            SynopticCycle::Z00 => 0,
            SynopticCycle::Z06 => 6,
            SynopticCycle::Z12 => 12,
            SynopticCycle::Z18 => 18,
        }
    }

    /// All four daily cycles, latest first.
    pub fn latest_first() -> &'static [SynopticCycle] {
        &[
            SynopticCycle::Z18,
            SynopticCycle::Z12,
            SynopticCycle::Z06,
            SynopticCycle::Z00,
        ]
    }
}

//! Timestamp helpers.
//!
//! All timestamps in the rrd crates are signed integer seconds since the Unix
//! epoch. Calendar values are converted by rounding their millisecond instant
//! to the nearest second, which keeps the mapping reversible for whole-second
//! instants regardless of the time zone the calendar value carries.

use chrono::{DateTime, TimeZone, Utc};
use std::time::SystemTime;

use crate::error::{Error, Result};

/// Round `timestamp` down to the nearest multiple of `step`.
///
/// `None` when `step` is not positive or the boundary lies below `i64::MIN`.
pub fn normalize(timestamp: i64, step: i64) -> Option<i64> {
    if step <= 0 {
        return None;
    }
    timestamp.checked_sub(timestamp.rem_euclid(step))
}

/// Seconds since the epoch for a calendar value in any time zone.
pub fn timestamp_of<Tz: TimeZone>(datetime: &DateTime<Tz>) -> i64 {
    (datetime.timestamp_millis() + 500).div_euclid(1000)
}

/// Seconds since the epoch for a system clock reading.
pub fn timestamp_of_system_time(time: SystemTime) -> i64 {
    timestamp_of(&DateTime::<Utc>::from(time))
}

/// Calendar value (UTC) for a timestamp in seconds.
pub fn datetime_of(timestamp: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp, 0).ok_or(Error::TimestampOutOfRange { timestamp })
}

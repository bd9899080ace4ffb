//! Interpolation of datasource values from `(timestamp, value)` samples.
//!
//! An [`Interpolator`] owns two parallel, validated sequences and answers
//! point queries with one of three policies. Given the samples
//! `(t, 100)` and `(t + 100, 300)`, a query at `t + 50` returns:
//!
//! - [`InterpolationMethod::Left`]: `100`
//! - [`InterpolationMethod::Right`]: `300`
//! - [`InterpolationMethod::Linear`]: `200` (the default)
//!
//! Queries outside the sampled range return NaN; nothing is extrapolated.
//! NaN samples are unknown values and flow through linear interpolation
//! arithmetically.
//!
//! Lookups start from the segment found by the previous query, which makes a
//! left-to-right scan over the signal linear overall. The cursor is a search
//! hint only: [`scan_value`] computes the same answers from index 0 every time.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::SystemTime;

use rrd_common::time::{timestamp_of, timestamp_of_system_time};

use crate::error::{ValidationError, ValidationResult};

/// A signal that can be sampled at an arbitrary timestamp (seconds).
///
/// Implementations return NaN where the value is unknown.
pub trait Plottable {
    fn value_at(&self, timestamp: i64) -> f64;
}

impl<F> Plottable for F
where
    F: Fn(i64) -> f64,
{
    fn value_at(&self, timestamp: i64) -> f64 {
        self(timestamp)
    }
}

/// Policy for values strictly between two samples.
///
/// Numeric codes are accepted without validation; a code outside the known
/// set becomes [`InterpolationMethod::Unsupported`] and every in-segment
/// query made with it resolves to NaN. Exact sample hits are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Value of the sample at or before the query.
    Left,
    /// Value of the sample after the query.
    Right,
    /// Straight line between the bracketing samples.
    #[default]
    Linear,
    /// Unrecognised method code.
    Unsupported(i32),
}

impl InterpolationMethod {
    pub const LEFT_CODE: i32 = 0;
    pub const RIGHT_CODE: i32 = 1;
    pub const LINEAR_CODE: i32 = 2;

    /// Map a numeric method code, keeping unknown codes as `Unsupported`.
    pub fn from_code(code: i32) -> Self {
        match code {
            Self::LEFT_CODE => InterpolationMethod::Left,
            Self::RIGHT_CODE => InterpolationMethod::Right,
            Self::LINEAR_CODE => InterpolationMethod::Linear,
            other => InterpolationMethod::Unsupported(other),
        }
    }

    pub fn code(self) -> i32 {
        match self {
            InterpolationMethod::Left => Self::LEFT_CODE,
            InterpolationMethod::Right => Self::RIGHT_CODE,
            InterpolationMethod::Linear => Self::LINEAR_CODE,
            InterpolationMethod::Unsupported(code) => code,
        }
    }
}

impl From<i32> for InterpolationMethod {
    fn from(code: i32) -> Self {
        InterpolationMethod::from_code(code)
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterpolationMethod::Left => write!(f, "left"),
            InterpolationMethod::Right => write!(f, "right"),
            InterpolationMethod::Linear => write!(f, "linear"),
            InterpolationMethod::Unsupported(code) => write!(f, "unsupported({})", code),
        }
    }
}

/// Where a query timestamp landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    /// Exactly on sample `i`.
    Exact(usize),
    /// Strictly inside `(timestamps[i], timestamps[i + 1])`.
    Segment(usize),
}

fn locate(timestamps: &[i64], timestamp: i64, start: usize) -> Option<Hit> {
    for (i, &ts) in timestamps.iter().enumerate().skip(start) {
        if ts == timestamp {
            return Some(Hit::Exact(i));
        }
        if let Some(&next) = timestamps.get(i + 1) {
            if ts < timestamp && timestamp < next {
                return Some(Hit::Segment(i));
            }
        }
    }
    None
}

fn resolve_segment(
    method: InterpolationMethod,
    timestamps: &[i64],
    values: &[f64],
    i: usize,
    timestamp: i64,
) -> f64 {
    match method {
        InterpolationMethod::Left => values[i],
        InterpolationMethod::Right => values[i + 1],
        InterpolationMethod::Linear => {
            // Differences in f64: a segment may span more than i64::MAX seconds.
            let span = timestamps[i + 1] as f64 - timestamps[i] as f64;
            let offset = timestamp as f64 - timestamps[i] as f64;
            values[i] + (values[i + 1] - values[i]) / span * offset
        }
        InterpolationMethod::Unsupported(_) => f64::NAN,
    }
}

/// Resolve `timestamp` by scanning from the first sample.
///
/// This is the cursor-free reference for [`Interpolator::value_at`]. The slices
/// are expected to satisfy the interpolator invariants; anything else yields NaN
/// rather than a panic where the lookup cannot proceed.
pub fn scan_value(
    timestamps: &[i64],
    values: &[f64],
    method: InterpolationMethod,
    timestamp: i64,
) -> f64 {
    let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
        return f64::NAN;
    };
    if timestamps.len() != values.len() || timestamp < first || timestamp > last {
        return f64::NAN;
    }
    match locate(timestamps, timestamp, 0) {
        Some(Hit::Exact(i)) => values[i],
        Some(Hit::Segment(i)) => resolve_segment(method, timestamps, values, i, timestamp),
        None => f64::NAN,
    }
}

fn validate(timestamps: &[i64], values: &[f64]) -> ValidationResult<()> {
    if timestamps.len() != values.len() {
        return Err(ValidationError::LengthMismatch {
            timestamps: timestamps.len(),
            values: values.len(),
        });
    }
    if timestamps.len() < 2 {
        return Err(ValidationError::TooFewPoints {
            count: timestamps.len(),
        });
    }

    let mut first_violation = None;
    let mut violations = 0;
    for (i, pair) in timestamps.windows(2).enumerate() {
        if pair[0] >= pair[1] {
            violations += 1;
            first_violation.get_or_insert((i + 1, pair[0], pair[1]));
        }
    }
    match first_violation {
        Some((index, previous, current)) => Err(ValidationError::NotIncreasing {
            index,
            previous,
            current,
            violations,
        }),
        None => Ok(()),
    }
}

/// Point-query interpolator over strictly increasing samples.
#[derive(Debug)]
pub struct Interpolator {
    timestamps: Vec<i64>,
    values: Vec<f64>,
    method: InterpolationMethod,
    last_index_used: AtomicUsize,
}

impl Interpolator {
    /// Build from timestamps in seconds and the values observed at them.
    ///
    /// Fails when fewer than two samples are given, the lengths differ, or any
    /// timestamp is not strictly greater than its predecessor.
    pub fn new(timestamps: Vec<i64>, values: Vec<f64>) -> ValidationResult<Self> {
        validate(&timestamps, &values)?;
        Ok(Self {
            timestamps,
            values,
            method: InterpolationMethod::default(),
            last_index_used: AtomicUsize::new(0),
        })
    }

    /// Build from `(timestamp, value)` pairs.
    pub fn from_points<I>(points: I) -> ValidationResult<Self>
    where
        I: IntoIterator<Item = (i64, f64)>,
    {
        let (timestamps, values) = points.into_iter().unzip();
        Self::new(timestamps, values)
    }

    /// Build from calendar values in any time zone.
    pub fn from_datetimes<Tz: TimeZone>(
        dates: &[DateTime<Tz>],
        values: Vec<f64>,
    ) -> ValidationResult<Self> {
        let timestamps = dates.iter().map(timestamp_of).collect();
        Self::new(timestamps, values)
    }

    /// Build from system clock readings.
    pub fn from_system_times(times: &[SystemTime], values: Vec<f64>) -> ValidationResult<Self> {
        let timestamps = times.iter().copied().map(timestamp_of_system_time).collect();
        Self::new(timestamps, values)
    }

    /// Builder form of [`Interpolator::set_interpolation_method`].
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Select the interpolation policy. No validation is performed.
    pub fn set_interpolation_method(&mut self, method: impl Into<InterpolationMethod>) {
        self.method = method.into();
    }

    pub fn interpolation_method(&self) -> InterpolationMethod {
        self.method
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// First and last sampled timestamps (inclusive).
    pub fn time_range(&self) -> (i64, i64) {
        (self.timestamps[0], self.timestamps[self.timestamps.len() - 1])
    }

    /// Interpolated value at `timestamp`, NaN outside the sampled range.
    pub fn value_at(&self, timestamp: i64) -> f64 {
        let (first, last) = self.time_range();
        if timestamp < first || timestamp > last {
            return f64::NAN;
        }

        let cursor = self.last_index_used.load(Ordering::Relaxed);
        let start = if timestamp < self.timestamps[cursor] {
            // backward read
            0
        } else {
            cursor
        };

        match locate(&self.timestamps, timestamp, start) {
            Some(Hit::Exact(i)) => self.values[i],
            Some(Hit::Segment(i)) => {
                self.last_index_used.store(i, Ordering::Relaxed);
                resolve_segment(self.method, &self.timestamps, &self.values, i, timestamp)
            }
            None => f64::NAN,
        }
    }

    /// Same answer as [`Interpolator::value_at`], scanning from index 0 and
    /// leaving the cursor untouched.
    pub fn value_at_uncached(&self, timestamp: i64) -> f64 {
        scan_value(&self.timestamps, &self.values, self.method, timestamp)
    }

    #[cfg(test)]
    fn cursor(&self) -> usize {
        self.last_index_used.load(Ordering::Relaxed)
    }
}

impl Clone for Interpolator {
    fn clone(&self) -> Self {
        Self {
            timestamps: self.timestamps.clone(),
            values: self.values.clone(),
            method: self.method,
            last_index_used: AtomicUsize::new(self.last_index_used.load(Ordering::Relaxed)),
        }
    }
}

impl Plottable for Interpolator {
    fn value_at(&self, timestamp: i64) -> f64 {
        Interpolator::value_at(self, timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const T0: i64 = 1_000_000;

    fn two_point() -> Interpolator {
        Interpolator::new(vec![T0, T0 + 100], vec![100.0, 300.0]).unwrap()
    }

    fn ramp() -> Interpolator {
        Interpolator::new(
            vec![0, 10, 20, 30, 40],
            vec![0.0, 10.0, 40.0, 40.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn policies_on_a_single_segment() {
        let mut ip = two_point();
        assert_eq!(ip.value_at(T0 + 50), 200.0);

        ip.set_interpolation_method(InterpolationMethod::Left);
        assert_eq!(ip.value_at(T0 + 50), 100.0);

        ip.set_interpolation_method(InterpolationMethod::Right);
        assert_eq!(ip.value_at(T0 + 50), 300.0);
    }

    #[test]
    fn default_method_is_linear() {
        assert_eq!(two_point().interpolation_method(), InterpolationMethod::Linear);
    }

    #[test]
    fn out_of_range_is_nan() {
        let ip = two_point();
        assert!(ip.value_at(T0 - 1).is_nan());
        assert!(ip.value_at(T0 + 101).is_nan());
        assert!(ip.value_at(i64::MIN).is_nan());
        assert!(ip.value_at(i64::MAX).is_nan());
    }

    #[test]
    fn exact_hits_ignore_method() {
        for code in [0, 1, 2, 99] {
            let mut ip = ramp();
            ip.set_interpolation_method(code);
            for (ts, v) in ip.timestamps().to_vec().into_iter().zip(ip.values().to_vec()) {
                assert_eq!(ip.value_at(ts), v, "method {code} at {ts}");
            }
        }
    }

    #[test]
    fn unsupported_method_yields_nan_between_samples() {
        let mut ip = two_point();
        ip.set_interpolation_method(7);
        assert_eq!(ip.interpolation_method(), InterpolationMethod::Unsupported(7));
        assert!(ip.value_at(T0 + 50).is_nan());
        assert_eq!(ip.value_at(T0), 100.0);
    }

    #[test]
    fn linear_propagates_nan_endpoints() {
        let ip = Interpolator::new(vec![0, 10, 20], vec![1.0, f64::NAN, 3.0]).unwrap();
        assert!(ip.value_at(5).is_nan());
        assert!(ip.value_at(15).is_nan());
        assert!(ip.value_at(10).is_nan());
        assert_eq!(ip.value_at(0), 1.0);
    }

    #[test]
    fn left_and_right_pick_known_neighbour_around_nan() {
        let ip = Interpolator::new(vec![0, 10, 20], vec![1.0, f64::NAN, 3.0])
            .unwrap()
            .with_method(InterpolationMethod::Right);
        assert!(ip.value_at(5).is_nan());
        assert_eq!(ip.value_at(15), 3.0);
    }

    #[test]
    fn cursor_follows_forward_scan_and_resets_backward() {
        let ip = ramp();
        assert_eq!(ip.value_at(35), 20.0);
        assert_eq!(ip.cursor(), 3);

        // Backward read restarts the search and still answers correctly.
        assert_eq!(ip.value_at(5), 5.0);
        assert_eq!(ip.cursor(), 0);

        // Exact hits leave the cursor alone.
        assert_eq!(ip.value_at(20), 40.0);
        assert_eq!(ip.cursor(), 0);
    }

    #[test]
    fn cached_and_uncached_agree_on_mixed_order() {
        let ip = ramp();
        let queries = [35, 1, 40, 15, 15, 0, 29, 12, 39, 21];
        for q in queries {
            let a = ip.value_at(q);
            let b = ip.value_at_uncached(q);
            assert!(a == b || (a.is_nan() && b.is_nan()), "query {q}: {a} vs {b}");
        }
    }

    #[test]
    fn rejects_too_few_points() {
        assert_eq!(
            Interpolator::new(vec![1], vec![1.0]).unwrap_err(),
            ValidationError::TooFewPoints { count: 1 }
        );
        assert!(matches!(
            Interpolator::new(vec![], vec![]),
            Err(ValidationError::TooFewPoints { count: 0 })
        ));
    }

    #[test]
    fn rejects_length_mismatch() {
        assert_eq!(
            Interpolator::new(vec![1, 2, 3], vec![1.0, 2.0]).unwrap_err(),
            ValidationError::LengthMismatch {
                timestamps: 3,
                values: 2
            }
        );
    }

    #[test]
    fn rejects_equal_and_decreasing_timestamps() {
        assert!(matches!(
            Interpolator::new(vec![1, 1], vec![0.0, 0.0]),
            Err(ValidationError::NotIncreasing { index: 1, .. })
        ));
        assert!(matches!(
            Interpolator::new(vec![1, 5, 3], vec![0.0; 3]),
            Err(ValidationError::NotIncreasing { index: 2, previous: 5, current: 3, .. })
        ));
    }

    #[test]
    fn validation_counts_every_bad_pair() {
        let err = Interpolator::new(vec![5, 4, 6, 6, 7, 1], vec![0.0; 6]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotIncreasing {
                index: 1,
                previous: 5,
                current: 4,
                violations: 3
            }
        );
    }

    #[test]
    fn from_points_and_datetimes_match_raw_seconds() {
        let raw = two_point();
        let pts = Interpolator::from_points([(T0, 100.0), (T0 + 100, 300.0)]).unwrap();
        assert_eq!(pts.timestamps(), raw.timestamps());

        let dates = [
            DateTime::<Utc>::from_timestamp(T0, 0).unwrap(),
            DateTime::<Utc>::from_timestamp(T0 + 100, 0).unwrap(),
        ];
        let cal = Interpolator::from_datetimes(&dates, vec![100.0, 300.0]).unwrap();
        assert_eq!(cal.timestamps(), raw.timestamps());
        assert_eq!(cal.value_at(T0 + 50), 200.0);
    }

    #[test]
    fn from_system_times_converts_to_seconds() {
        let base = SystemTime::UNIX_EPOCH;
        let times = [
            base + std::time::Duration::from_secs(60),
            base + std::time::Duration::from_secs(120),
        ];
        let ip = Interpolator::from_system_times(&times, vec![0.0, 6.0]).unwrap();
        assert_eq!(ip.timestamps(), &[60, 120]);
        assert_eq!(ip.value_at(90), 3.0);
    }

    #[test]
    fn calendar_duplicates_after_rounding_are_rejected() {
        let a = DateTime::<Utc>::from_timestamp(T0, 0).unwrap();
        let b = a + chrono::Duration::milliseconds(200);
        assert!(matches!(
            Interpolator::from_datetimes(&[a, b], vec![1.0, 2.0]),
            Err(ValidationError::NotIncreasing { .. })
        ));
    }

    #[test]
    fn method_codes_round_trip() {
        for code in [-1, 0, 1, 2, 3] {
            assert_eq!(InterpolationMethod::from_code(code).code(), code);
        }
    }

    #[test]
    fn plottable_is_object_safe() {
        let ip = two_point();
        let constant = |_: i64| 7.0;
        let sources: Vec<&dyn Plottable> = vec![&ip, &constant];
        assert_eq!(sources[0].value_at(T0 + 50), 200.0);
        assert_eq!(sources[1].value_at(0), 7.0);
    }

    #[test]
    fn linear_over_full_i64_span() {
        let mut ip = Interpolator::new(vec![i64::MIN, i64::MAX], vec![0.0, 1.0]).unwrap();
        assert_eq!(ip.value_at(0), 0.5);
        assert_eq!(ip.value_at_uncached(0), 0.5);
        assert!((ip.value_at(i64::MAX - 1) - 1.0).abs() < 1e-12);

        ip.set_interpolation_method(InterpolationMethod::Right);
        assert_eq!(ip.value_at(-1), 1.0);
    }

    #[test]
    fn method_serializes_by_name() {
        assert_eq!(
            serde_json::to_string(&InterpolationMethod::Linear).unwrap(),
            "\"linear\""
        );
        let unsupported = serde_json::to_string(&InterpolationMethod::Unsupported(7)).unwrap();
        assert_eq!(unsupported, r#"{"unsupported":7}"#);
        for method in [
            InterpolationMethod::Left,
            InterpolationMethod::Right,
            InterpolationMethod::Linear,
            InterpolationMethod::Unsupported(-3),
        ] {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(serde_json::from_str::<InterpolationMethod>(&json).unwrap(), method);
        }
    }

    #[test]
    fn scan_value_tolerates_malformed_slices() {
        assert!(scan_value(&[], &[], InterpolationMethod::Linear, 0).is_nan());
        assert!(scan_value(&[0, 1], &[1.0], InterpolationMethod::Linear, 0).is_nan());
    }
}

//! Round-robin signal math.
//!
//! Provides the [`Interpolator`], which answers point queries over a validated
//! set of `(timestamp, value)` samples, and the [`Plottable`] trait that any
//! time-indexed signal source can implement.

pub mod error;
pub mod interpolate;

pub use error::{ValidationError, ValidationResult};
pub use interpolate::{scan_value, InterpolationMethod, Interpolator, Plottable};

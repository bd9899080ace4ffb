//! Error types for interpolator construction.

use thiserror::Error;

/// Result type alias for interpolator construction.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Malformed sample input. Raised only when an interpolator is built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("at least two samples are required, got {count}")]
    TooFewPoints { count: usize },

    #[error("timestamp and value counts differ: {timestamps} timestamps, {values} values")]
    LengthMismatch { timestamps: usize, values: usize },

    #[error(
        "timestamps must be strictly increasing: timestamps[{index}]={current} follows {previous} \
         ({violations} out-of-order pair(s) in total)"
    )]
    NotIncreasing {
        index: usize,
        previous: i64,
        current: i64,
        violations: usize,
    },
}

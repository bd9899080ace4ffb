//! Error types shared by the rrd crates.

use thiserror::Error;

/// Result type alias for common operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the shared value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid data source name '{name}': {reason}")]
    InvalidDsName { name: String, reason: String },

    #[error("timestamp {timestamp} is outside the representable calendar range")]
    TimestampOutOfRange { timestamp: i64 },

    #[error("invalid number text: '{0}'")]
    InvalidNumber(String),
}

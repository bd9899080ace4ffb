//! Round-robin database common types.
//!
//! This crate provides foundational types shared across the rrd crates:
//! - Data-source names with validation
//! - Timestamp conversion and step normalization
//! - Canonical double-to-text formatting used by exports
//! - Common error types

pub mod error;
pub mod format;
pub mod id;
pub mod time;

pub use error::{Error, Result};
pub use format::{format_double, format_double_plain, parse_double};
pub use id::DsName;
pub use time::{datetime_of, normalize, timestamp_of, timestamp_of_system_time};

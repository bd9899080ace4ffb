//! Database header values that archive state derives from.

use serde::{Deserialize, Serialize};

use crate::validate::{ValidationError, ValidationResult};

/// The owning database's timing header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseHeader {
    /// Raw update step in seconds (one primary data point per step).
    pub step: i64,

    /// Timestamp of the last accepted update, seconds since the epoch.
    pub last_update_time: i64,
}

impl DatabaseHeader {
    /// Create a header, rejecting a non-positive step.
    pub fn new(step: i64, last_update_time: i64) -> ValidationResult<Self> {
        let header = Self {
            step,
            last_update_time,
        };
        header.validate()?;
        Ok(header)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.step <= 0 {
            return Err(ValidationError::InvalidValue {
                field: "step".to_string(),
                message: format!("Must be positive, got {}", self.step),
            });
        }
        Ok(())
    }
}

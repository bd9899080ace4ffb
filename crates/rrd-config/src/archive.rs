//! Archive definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validate::{ValidationError, ValidationResult};

/// Consolidation function applied when closing an archive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsolFun {
    Average,
    Min,
    Max,
    Last,
}

impl fmt::Display for ConsolFun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsolFun::Average => write!(f, "AVERAGE"),
            ConsolFun::Min => write!(f, "MIN"),
            ConsolFun::Max => write!(f, "MAX"),
            ConsolFun::Last => write!(f, "LAST"),
        }
    }
}

impl FromStr for ConsolFun {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "AVERAGE" => Ok(ConsolFun::Average),
            "MIN" => Ok(ConsolFun::Min),
            "MAX" => Ok(ConsolFun::Max),
            "LAST" => Ok(ConsolFun::Last),
            _ => Err(ValidationError::InvalidValue {
                field: "consol_fun".to_string(),
                message: format!("unknown consolidation function: {}", s),
            }),
        }
    }
}

/// One retention archive: `rows` consolidated values, each covering `steps`
/// raw database steps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArchiveDef {
    pub consol_fun: ConsolFun,

    /// Fraction of unknown raw steps tolerated before a consolidated value
    /// becomes unknown.
    #[serde(default = "default_xff")]
    pub xff: f64,

    /// Raw steps per consolidated value.
    pub steps: i64,

    /// Number of consolidated values retained.
    pub rows: i64,
}

fn default_xff() -> f64 {
    0.5
}

impl ArchiveDef {
    pub fn new(consol_fun: ConsolFun, xff: f64, steps: i64, rows: i64) -> ValidationResult<Self> {
        let def = Self {
            consol_fun,
            xff,
            steps,
            rows,
        };
        def.validate()?;
        Ok(def)
    }

    /// Archive step length in seconds for a database step, `None` on overflow.
    pub fn arc_step(&self, step: i64) -> Option<i64> {
        self.steps.checked_mul(step)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if !(0.0..1.0).contains(&self.xff) {
            return Err(ValidationError::InvalidValue {
                field: "xff".to_string(),
                message: format!("Must be in [0, 1), got {}", self.xff),
            });
        }
        if self.steps < 1 {
            return Err(ValidationError::InvalidValue {
                field: "steps".to_string(),
                message: format!("Must be at least 1, got {}", self.steps),
            });
        }
        if self.rows < 1 {
            return Err(ValidationError::InvalidValue {
                field: "rows".to_string(),
                message: format!("Must be at least 1, got {}", self.rows),
            });
        }
        Ok(())
    }
}

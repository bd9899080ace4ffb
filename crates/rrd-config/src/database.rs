//! Database definition as loaded from JSON.
//!
//! ```json
//! {
//!   "step": 300,
//!   "last_update_time": 1700000000,
//!   "data_sources": ["in", "out"],
//!   "archives": [
//!     { "consol_fun": "AVERAGE", "xff": 0.5, "steps": 1, "rows": 600 },
//!     { "consol_fun": "MAX", "steps": 6, "rows": 700 }
//!   ]
//! }
//! ```

use rrd_common::DsName;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::archive::ArchiveDef;
use crate::header::DatabaseHeader;
use crate::validate::{validate_database_def, ValidationError, ValidationResult};

/// Complete database definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseDef {
    /// Raw update step in seconds.
    pub step: i64,

    /// Last update timestamp; for a new database, the start time.
    pub last_update_time: i64,

    pub data_sources: Vec<DsName>,

    pub archives: Vec<ArchiveDef>,
}

impl DatabaseDef {
    /// Load and validate a definition from a JSON file.
    pub fn from_file(path: &Path) -> ValidationResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_str(&content)
    }

    /// Parse and validate a definition from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(json: &str) -> ValidationResult<Self> {
        let def: DatabaseDef = serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))?;
        validate_database_def(&def)?;
        Ok(def)
    }

    pub fn to_json(&self) -> ValidationResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Cannot serialize: {}", e)))
    }

    pub fn header(&self) -> DatabaseHeader {
        DatabaseHeader {
            step: self.step,
            last_update_time: self.last_update_time,
        }
    }

    /// Position of a data source in the definition.
    pub fn ds_index(&self, name: &str) -> Option<usize> {
        self.data_sources.iter().position(|ds| ds.as_str() == name)
    }
}

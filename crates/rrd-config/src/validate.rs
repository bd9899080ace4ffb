//! Definition validation errors and semantic validation.

use std::collections::HashSet;
use thiserror::Error;

use crate::database::DatabaseDef;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Definition validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Duplicate {kind}: {name}")]
    Duplicate { kind: String, name: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::Duplicate { .. } => 67,
        }
    }
}

/// Validate a database definition semantically.
pub fn validate_database_def(def: &DatabaseDef) -> ValidationResult<()> {
    def.header().validate()?;

    if def.data_sources.is_empty() {
        return Err(ValidationError::MissingField("data_sources".to_string()));
    }
    if def.archives.is_empty() {
        return Err(ValidationError::MissingField("archives".to_string()));
    }

    let mut names = HashSet::new();
    for ds in &def.data_sources {
        if !names.insert(ds.as_str()) {
            return Err(ValidationError::Duplicate {
                kind: "data source".to_string(),
                name: ds.to_string(),
            });
        }
    }

    let mut archives = HashSet::new();
    for (i, arc) in def.archives.iter().enumerate() {
        arc.validate().map_err(|e| match e {
            ValidationError::InvalidValue { field, message } => ValidationError::InvalidValue {
                field: format!("archives[{}].{}", i, field),
                message,
            },
            other => other,
        })?;
        if arc.arc_step(def.step).is_none() {
            return Err(ValidationError::InvalidValue {
                field: format!("archives[{}].steps", i),
                message: format!(
                    "{} steps of {}s overflow the archive step",
                    arc.steps, def.step
                ),
            });
        }
        if !archives.insert((arc.consol_fun, arc.steps)) {
            return Err(ValidationError::Duplicate {
                kind: "archive".to_string(),
                name: format!("{}:{}", arc.consol_fun, arc.steps),
            });
        }
    }

    Ok(())
}

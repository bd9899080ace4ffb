//! Data-source identity.
//!
//! A data source is addressed by a short ASCII name that appears verbatim in
//! dumps and exports, so the character set is restricted to what every
//! consumer can round-trip without escaping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Maximum data-source name length in characters.
pub const MAX_DS_NAME_LEN: usize = 19;

/// Validated data-source name: 1..=19 characters of `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DsName(String);

impl DsName {
    /// Parse and validate a data-source name.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidDsName {
                name,
                reason: "name is empty".to_string(),
            });
        }
        if name.len() > MAX_DS_NAME_LEN {
            return Err(Error::InvalidDsName {
                reason: format!(
                    "name is {} characters, maximum is {}",
                    name.len(),
                    MAX_DS_NAME_LEN
                ),
                name,
            });
        }
        if let Some(bad) = name
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_'))
        {
            return Err(Error::InvalidDsName {
                reason: format!("character '{}' is not allowed", bad),
                name,
            });
        }
        Ok(DsName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DsName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DsName::new(s)
    }
}

impl TryFrom<String> for DsName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        DsName::new(value)
    }
}

impl From<DsName> for String {
    fn from(name: DsName) -> Self {
        name.0
    }
}

impl AsRef<str> for DsName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

//! Round-robin database definitions.
//!
//! This crate provides:
//! - The database header (`step`, `last_update_time`)
//! - Archive definitions (consolidation function, xff, steps, rows)
//! - A JSON-loadable database definition tying them to data-source names
//! - Semantic validation with stable error codes

pub mod archive;
pub mod database;
pub mod header;
pub mod validate;

pub use archive::{ArchiveDef, ConsolFun};
pub use database::DatabaseDef;
pub use header::DatabaseHeader;
pub use validate::{ValidationError, ValidationResult};

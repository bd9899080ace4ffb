//! Error types for archive state and its storage.

use thiserror::Error;

/// Result type alias for archive state operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for persistent cell reads and writes.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Failure reading or writing a persistent cell.
///
/// Accessors hand these back unchanged; nothing is retried and no default
/// value is substituted.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error from the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Read past the end of an in-memory backing.
    #[error("read of {len} bytes at offset {offset} exceeds backing size {size}")]
    OutOfBounds { offset: u64, len: usize, size: u64 },

    /// Another holder of the store panicked mid-operation.
    #[error("storage lock poisoned")]
    Poisoned,

    /// Stored bits decode to a value outside the field's domain.
    #[error("invalid persisted value: {0}")]
    InvalidValue(String),
}

/// Errors raised while building or addressing archive state.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("invalid archive timing: step={step}, arc_step={arc_step}")]
    InvalidTiming { step: i64, arc_step: i64 },

    #[error("configuration error: {0}")]
    Config(#[from] rrd_config::ValidationError),

    #[error("unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

//! Persistent scalar cells.
//!
//! Archive state never holds raw values; it holds handles to fixed-size cells
//! inside a shared [`RrdStore`]. Cells are 8-byte big-endian slots handed out
//! in order by an [`RrdAllocator`], so allocating the same cells in the same
//! order against a reopened store binds them to the same bytes.
//!
//! # Layout
//!
//! ```text
//! offset 0   8        16       24
//!        | f64    | i64    | f64    | ...
//!          cell 0   cell 1   cell 2
//! ```

pub mod backing;
pub mod scalar;

pub use backing::{FileBacking, MemoryBacking};
pub use scalar::{PersistentDouble, PersistentLong};

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::{StorageError, StorageResult};

/// Size of every scalar slot in bytes.
pub const SLOT_SIZE: u64 = 8;

/// A durable cell holding one scalar.
pub trait PersistentScalar {
    type Value: Copy;

    fn read(&self) -> StorageResult<Self::Value>;

    fn write(&mut self, value: Self::Value) -> StorageResult<()>;
}

/// Byte-addressable storage behind an [`RrdStore`].
pub trait RrdBacking: Send + fmt::Debug {
    /// Fill `buf` from `offset`.
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> StorageResult<()>;

    /// Write `data` at `offset`, extending the backing if needed.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Current size in bytes.
    fn size(&mut self) -> StorageResult<u64>;

    /// Flush written bytes to durable storage.
    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }
}

/// Cloneable handle to one shared backing.
///
/// Every cell allocated from the same store shares its backing; clones are
/// cheap and refer to the same bytes.
#[derive(Debug, Clone)]
pub struct RrdStore {
    backing: Arc<Mutex<Box<dyn RrdBacking>>>,
}

impl RrdStore {
    pub fn new(backing: impl RrdBacking + 'static) -> Self {
        Self {
            backing: Arc::new(Mutex::new(Box::new(backing))),
        }
    }

    /// Store held entirely in memory; contents are lost on drop.
    pub fn in_memory() -> Self {
        Self::new(MemoryBacking::new())
    }

    /// Create (or truncate) a file-backed store.
    pub fn create_file(path: &Path) -> StorageResult<Self> {
        let backing = FileBacking::create(path)?;
        info!(path = %path.display(), "Created store file");
        Ok(Self::new(backing))
    }

    /// Open an existing file-backed store.
    pub fn open_file(path: &Path) -> StorageResult<Self> {
        let mut backing = FileBacking::open(path)?;
        info!(path = %path.display(), bytes = backing.size()?, "Opened store file");
        Ok(Self::new(backing))
    }

    fn with_backing<T>(
        &self,
        f: impl FnOnce(&mut dyn RrdBacking) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut guard = self.backing.lock().map_err(|_| StorageError::Poisoned)?;
        f(&mut **guard)
    }

    pub fn read_at(&self, offset: u64, buf: &mut [u8]) -> StorageResult<()> {
        self.with_backing(|b| b.read_at(offset, buf))
    }

    pub fn write_at(&self, offset: u64, data: &[u8]) -> StorageResult<()> {
        self.with_backing(|b| b.write_at(offset, data))
    }

    pub fn size(&self) -> StorageResult<u64> {
        self.with_backing(|b| b.size())
    }

    pub fn sync(&self) -> StorageResult<()> {
        self.with_backing(|b| b.sync())
    }
}

/// Sequential offset allocator.
#[derive(Debug, Clone, Default)]
pub struct RrdAllocator {
    next: u64,
}

impl RrdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start allocating at `offset`, e.g. after a fixed file header.
    pub fn starting_at(offset: u64) -> Self {
        Self { next: offset }
    }

    /// Reserve `size` bytes and return their offset.
    pub fn allocate(&mut self, size: u64) -> u64 {
        let offset = self.next;
        self.next += size;
        offset
    }

    /// Offset the next allocation will receive.
    pub fn position(&self) -> u64 {
        self.next
    }
}

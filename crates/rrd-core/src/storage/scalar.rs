//! Fixed-offset f64 and i64 cells.

use tracing::trace;

use super::{PersistentScalar, RrdAllocator, RrdStore, SLOT_SIZE};
use crate::error::StorageResult;

fn read_slot(store: &RrdStore, offset: u64) -> StorageResult<[u8; 8]> {
    let mut buf = [0u8; SLOT_SIZE as usize];
    store.read_at(offset, &mut buf)?;
    Ok(buf)
}

/// A persisted `f64`.
#[derive(Debug, Clone)]
pub struct PersistentDouble {
    store: RrdStore,
    offset: u64,
}

impl PersistentDouble {
    /// Allocate the next slot from `allocator`. Nothing is written.
    pub fn new(store: &RrdStore, allocator: &mut RrdAllocator) -> Self {
        Self::at(store, allocator.allocate(SLOT_SIZE))
    }

    /// Bind to a known offset.
    pub fn at(store: &RrdStore, offset: u64) -> Self {
        Self {
            store: store.clone(),
            offset,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl PersistentScalar for PersistentDouble {
    type Value = f64;

    fn read(&self) -> StorageResult<f64> {
        let value = f64::from_be_bytes(read_slot(&self.store, self.offset)?);
        trace!(offset = self.offset, value, "Read double cell");
        Ok(value)
    }

    fn write(&mut self, value: f64) -> StorageResult<()> {
        trace!(offset = self.offset, value, "Write double cell");
        self.store.write_at(self.offset, &value.to_be_bytes())
    }
}

/// A persisted `i64`.
#[derive(Debug, Clone)]
pub struct PersistentLong {
    store: RrdStore,
    offset: u64,
}

impl PersistentLong {
    /// Allocate the next slot from `allocator`. Nothing is written.
    pub fn new(store: &RrdStore, allocator: &mut RrdAllocator) -> Self {
        Self::at(store, allocator.allocate(SLOT_SIZE))
    }

    pub fn at(store: &RrdStore, offset: u64) -> Self {
        Self {
            store: store.clone(),
            offset,
        }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

impl PersistentScalar for PersistentLong {
    type Value = i64;

    fn read(&self) -> StorageResult<i64> {
        let value = i64::from_be_bytes(read_slot(&self.store, self.offset)?);
        trace!(offset = self.offset, value, "Read long cell");
        Ok(value)
    }

    fn write(&mut self, value: i64) -> StorageResult<()> {
        trace!(offset = self.offset, value, "Write long cell");
        self.store.write_at(self.offset, &value.to_be_bytes())
    }
}

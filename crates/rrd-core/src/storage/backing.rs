//! Concrete backings: an in-memory buffer and a plain file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use super::RrdBacking;
use crate::error::{StorageError, StorageResult};

/// Growable in-memory buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryBacking {
    bytes: Vec<u8>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing bytes, e.g. a snapshot of another store.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RrdBacking for MemoryBacking {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> StorageResult<()> {
        let len = buf.len();
        let src = usize::try_from(offset)
            .ok()
            .and_then(|start| self.bytes.get(start..start.checked_add(len)?))
            .ok_or_else(|| StorageError::OutOfBounds {
                offset,
                len,
                size: self.bytes.len() as u64,
            })?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        let start = usize::try_from(offset).map_err(|_| {
            StorageError::InvalidValue(format!("offset {} exceeds address space", offset))
        })?;
        let end = start.checked_add(data.len()).ok_or_else(|| {
            StorageError::InvalidValue(format!("write at offset {} overflows", offset))
        })?;
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.bytes[start..end].copy_from_slice(data);
        Ok(())
    }

    fn size(&mut self) -> StorageResult<u64> {
        Ok(self.bytes.len() as u64)
    }
}

/// A store file addressed by absolute offsets.
#[derive(Debug)]
pub struct FileBacking {
    file: File,
    path: PathBuf,
}

impl FileBacking {
    /// Create a new file, truncating any existing one.
    pub fn create(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing file for reading and writing.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RrdBacking for FileBacking {
    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> StorageResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(buf).map_err(|e| {
            warn!(path = %self.path.display(), offset, len = buf.len(), error = %e, "Store read failed");
            StorageError::Io(e)
        })
    }

    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(data)?;
        Ok(())
    }

    fn size(&mut self) -> StorageResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.file.sync_data()?;
        Ok(())
    }
}

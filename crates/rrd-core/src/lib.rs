//! Round-robin archive consolidation state.
//!
//! This crate provides:
//! - Persistent f64/i64 cells over a shared memory or file store
//! - Per-data-source archive state (accumulated value, unknown step count)
//! - Export of state as RRDTool-style XML or JSON nodes
//! - Logging setup for host programs

pub mod arc_state;
pub mod archive_states;
pub mod error;
pub mod export;
pub mod logging;
pub mod storage;

pub use arc_state::{initial_unknown_steps, ArcState, ArcStateSnapshot, OwningArchive};
pub use archive_states::ArchiveStates;
pub use error::{Error, Result, StorageError, StorageResult};
pub use export::{ExportNode, NodeContent};
pub use storage::{
    FileBacking, MemoryBacking, PersistentDouble, PersistentLong, PersistentScalar, RrdAllocator,
    RrdBacking, RrdStore,
};

//! Per-data-source consolidation state of one archive.
//!
//! Each state owns two persistent cells: the partially consolidated value and
//! the number of unknown primary steps folded into it so far. A fresh state
//! starts with an unknown accumulator and as many unknown steps as separate the
//! archive-step boundary at or before the last update from the database-step
//! boundary at or before it:
//!
//! ```text
//! nan_steps = (normalize(lut, step) - normalize(lut, arc_step)) / step
//! ```

use rrd_common::{format_double, format_double_plain, normalize, DsName};
use rrd_config::DatabaseHeader;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result, StorageError, StorageResult};
use crate::export::ExportNode;
use crate::storage::{PersistentDouble, PersistentLong, PersistentScalar, RrdAllocator, RrdStore};

/// The archive a state belongs to.
pub trait OwningArchive {
    fn header(&self) -> &DatabaseHeader;

    /// Seconds covered by one consolidated row.
    fn arc_step(&self) -> i64;
}

/// Unknown steps a fresh state is seeded with.
pub fn initial_unknown_steps(step: i64, arc_step: i64, last_update_time: i64) -> Result<u64> {
    let invalid = Error::InvalidTiming { step, arc_step };
    if step <= 0 || arc_step <= 0 || arc_step % step != 0 {
        return Err(invalid);
    }
    let (Some(step_boundary), Some(arc_boundary)) = (
        normalize(last_update_time, step),
        normalize(last_update_time, arc_step),
    ) else {
        return Err(invalid);
    };
    // arc_step is a multiple of step, so the arc boundary never lies after the step boundary.
    Ok(((step_boundary - arc_boundary) / step).unsigned_abs())
}

/// Plain copy of a state's values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcStateSnapshot {
    pub accumulated_value: f64,
    pub unknown_step_count: u64,
}

#[derive(Debug, Clone)]
pub struct ArcState<D = PersistentDouble, L = PersistentLong> {
    accum: D,
    nan_steps: L,
}

impl ArcState {
    /// Allocate two cells and seed them for `parent`.
    ///
    /// Timing is checked before anything is allocated or written.
    pub fn create(
        store: &RrdStore,
        allocator: &mut RrdAllocator,
        parent: &impl OwningArchive,
    ) -> Result<Self> {
        let header = parent.header();
        let arc_step = parent.arc_step();
        let steps = initial_unknown_steps(header.step, arc_step, header.last_update_time)?;
        let accum = PersistentDouble::new(store, allocator);
        let nan_steps = PersistentLong::new(store, allocator);
        Self::seed(accum, nan_steps, header, arc_step, steps)
    }

    /// Allocate the same two cells as [`ArcState::create`] without writing.
    pub fn open(store: &RrdStore, allocator: &mut RrdAllocator) -> Self {
        let accum = PersistentDouble::new(store, allocator);
        let nan_steps = PersistentLong::new(store, allocator);
        Self::bind(accum, nan_steps)
    }
}

impl<D, L> ArcState<D, L>
where
    D: PersistentScalar<Value = f64>,
    L: PersistentScalar<Value = i64>,
{
    /// Seed fresh cells for `parent`.
    pub fn initialize(accum: D, nan_steps: L, parent: &impl OwningArchive) -> Result<Self> {
        let header = parent.header();
        let arc_step = parent.arc_step();
        let steps = initial_unknown_steps(header.step, arc_step, header.last_update_time)?;
        Self::seed(accum, nan_steps, header, arc_step, steps)
    }

    /// Write the unknown step count, then a NaN accumulator.
    fn seed(
        accum: D,
        mut nan_steps: L,
        header: &DatabaseHeader,
        arc_step: i64,
        steps: u64,
    ) -> Result<Self> {
        nan_steps.write(to_stored(steps)?)?;
        let mut state = Self { accum, nan_steps };
        state.accum.write(f64::NAN)?;

        debug!(
            step = header.step,
            arc_step,
            last_update_time = header.last_update_time,
            nan_steps = steps,
            "Seeded archive state"
        );
        Ok(state)
    }

    /// Wrap cells that already hold a state. Reads nothing.
    pub fn bind(accum: D, nan_steps: L) -> Self {
        Self { accum, nan_steps }
    }

    pub fn accumulated_value(&self) -> StorageResult<f64> {
        self.accum.read()
    }

    pub fn set_accumulated_value(&mut self, value: f64) -> StorageResult<()> {
        self.accum.write(value)
    }

    pub fn unknown_step_count(&self) -> StorageResult<u64> {
        let raw = self.nan_steps.read()?;
        u64::try_from(raw)
            .map_err(|_| StorageError::InvalidValue(format!("negative unknown step count {}", raw)))
    }

    pub fn set_unknown_step_count(&mut self, count: u64) -> StorageResult<()> {
        self.nan_steps.write(to_stored(count)?)
    }

    pub fn snapshot(&self) -> StorageResult<ArcStateSnapshot> {
        Ok(ArcStateSnapshot {
            accumulated_value: self.accumulated_value()?,
            unknown_step_count: self.unknown_step_count()?,
        })
    }

    /// `ds` node labelled with `ds_name`, holding the value and unknown count.
    pub fn export(&self, ds_name: &DsName) -> StorageResult<ExportNode> {
        let snap = self.snapshot()?;
        Ok(ExportNode::parent(
            "ds",
            vec![
                ExportNode::text("value", format_double(snap.accumulated_value)),
                ExportNode::text("unknown_datapoints", snap.unknown_step_count.to_string()),
            ],
        )
        .with_label(ds_name.clone()))
    }

    /// One-line diagnostic form.
    pub fn dump(&self) -> StorageResult<String> {
        let snap = self.snapshot()?;
        Ok(format!(
            "accumValue:{} nanSteps:{}",
            format_double_plain(snap.accumulated_value),
            snap.unknown_step_count
        ))
    }

    pub fn into_cells(self) -> (D, L) {
        (self.accum, self.nan_steps)
    }
}

fn to_stored(count: u64) -> StorageResult<i64> {
    i64::try_from(count)
        .map_err(|_| StorageError::InvalidValue(format!("unknown step count {} too large", count)))
}

//! All consolidation states of one archive, one per data source.
//!
//! Cells are laid out archive by archive, and within an archive data source by
//! data source, each state taking an accumulator cell then an unknown-step
//! cell. [`ArchiveStates::open_all`] walks the same order, so a reopened store
//! binds every state to the bytes it was created with.

use rrd_common::DsName;
use rrd_config::{ArchiveDef, DatabaseDef, DatabaseHeader};
use tracing::{debug, info};

use crate::arc_state::{ArcState, OwningArchive};
use crate::error::{Error, Result, StorageResult};
use crate::export::ExportNode;
use crate::storage::{RrdAllocator, RrdStore};

#[derive(Debug, Clone)]
pub struct ArchiveStates {
    header: DatabaseHeader,
    def: ArchiveDef,
    states: Vec<(DsName, ArcState)>,
}

impl ArchiveStates {
    /// Allocate and seed a fresh state for every data source.
    pub fn create(
        store: &RrdStore,
        allocator: &mut RrdAllocator,
        header: DatabaseHeader,
        def: ArchiveDef,
        data_sources: &[DsName],
    ) -> Result<Self> {
        header.validate()?;
        def.validate()?;
        if def.arc_step(header.step).is_none() {
            return Err(Error::InvalidTiming {
                step: header.step,
                arc_step: def.steps.saturating_mul(header.step),
            });
        }
        let mut archive = Self {
            header,
            def,
            states: Vec::with_capacity(data_sources.len()),
        };
        for ds in data_sources {
            let state = ArcState::create(store, allocator, &archive)?;
            archive.states.push((ds.clone(), state));
        }
        debug!(
            consol_fun = %archive.def.consol_fun,
            arc_step = archive.arc_step(),
            data_sources = archive.states.len(),
            "Created archive states"
        );
        Ok(archive)
    }

    /// Rebind states previously created with the same layout.
    pub fn open(
        store: &RrdStore,
        allocator: &mut RrdAllocator,
        header: DatabaseHeader,
        def: ArchiveDef,
        data_sources: &[DsName],
    ) -> Self {
        let states = data_sources
            .iter()
            .map(|ds| (ds.clone(), ArcState::open(store, allocator)))
            .collect();
        Self {
            header,
            def,
            states,
        }
    }

    /// Seed states for every archive of a database definition.
    pub fn create_all(
        store: &RrdStore,
        allocator: &mut RrdAllocator,
        db: &DatabaseDef,
    ) -> Result<Vec<Self>> {
        let archives = db
            .archives
            .iter()
            .map(|def| Self::create(store, allocator, db.header(), *def, &db.data_sources))
            .collect::<Result<Vec<_>>>()?;
        info!(
            archives = archives.len(),
            data_sources = db.data_sources.len(),
            bytes = allocator.position(),
            "Initialized consolidation state"
        );
        Ok(archives)
    }

    /// Rebind the states [`ArchiveStates::create_all`] laid out for `db`.
    pub fn open_all(store: &RrdStore, allocator: &mut RrdAllocator, db: &DatabaseDef) -> Vec<Self> {
        db.archives
            .iter()
            .map(|def| Self::open(store, allocator, db.header(), *def, &db.data_sources))
            .collect()
    }

    pub fn def(&self) -> &ArchiveDef {
        &self.def
    }

    pub fn state(&self, ds: &str) -> Result<&ArcState> {
        self.states
            .iter()
            .find(|(name, _)| name.as_str() == ds)
            .map(|(_, state)| state)
            .ok_or_else(|| Error::UnknownDataSource(ds.to_string()))
    }

    pub fn state_mut(&mut self, ds: &str) -> Result<&mut ArcState> {
        self.states
            .iter_mut()
            .find(|(name, _)| name.as_str() == ds)
            .map(|(_, state)| state)
            .ok_or_else(|| Error::UnknownDataSource(ds.to_string()))
    }

    /// States in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&DsName, &ArcState)> {
        self.states.iter().map(|(name, state)| (name, state))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// `cdp_prep` node holding one `ds` node per data source.
    pub fn export(&self) -> StorageResult<ExportNode> {
        let children = self
            .states
            .iter()
            .map(|(name, state)| state.export(name))
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(ExportNode::parent("cdp_prep", children))
    }

    /// Pretty JSON rendering of [`ArchiveStates::export`].
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export()?.to_json())?)
    }

    /// One `name accumValue:.. nanSteps:..` line per data source.
    pub fn dump(&self) -> StorageResult<String> {
        let lines = self
            .states
            .iter()
            .map(|(name, state)| state.dump().map(|line| format!("{} {}", name, line)))
            .collect::<StorageResult<Vec<_>>>()?;
        Ok(lines.join("\n"))
    }
}

impl OwningArchive for ArchiveStates {
    fn header(&self) -> &DatabaseHeader {
        &self.header
    }

    /// Zero when the archive step overflows; seeding rejects it.
    fn arc_step(&self) -> i64 {
        self.def.arc_step(self.header.step).unwrap_or(0)
    }
}

//! Disk snapshots
//!
//! Snapshots are global resources. A snapshot handle obtained through
//! [`Disk::snapshot`] also remembers its source disk, which is what makes
//! [`Snapshot::create`] possible.

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::disk::Disk;
use super::list::Created;
use crate::compute::Compute;
use crate::error::{Error, Result};
use serde_json::Value;

/// Who a snapshot handle was obtained from
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOwner {
    /// From [`Disk::snapshot`]; the snapshot can be created from the disk
    DiskScoped(Disk),
    /// From [`Compute::snapshot`] or a project-wide list
    ProjectScoped(Compute),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    core: ResourceCore,
    owner: SnapshotOwner,
}

impl Snapshot {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute.clone(), Scope::Global, "snapshots", name),
            owner: SnapshotOwner::ProjectScoped(compute),
        }
    }

    pub(crate) fn for_disk(disk: Disk, name: &str) -> Self {
        Self {
            core: ResourceCore::new(disk.core().compute().clone(), Scope::Global, "snapshots", name),
            owner: SnapshotOwner::DiskScoped(disk),
        }
    }

    pub fn owner(&self) -> &SnapshotOwner {
        &self.owner
    }

    /// Source disk, for disk-scoped handles
    pub fn disk(&self) -> Option<&Disk> {
        match &self.owner {
            SnapshotOwner::DiskScoped(disk) => Some(disk),
            SnapshotOwner::ProjectScoped(_) => None,
        }
    }

    /// Create this snapshot from its source disk
    ///
    /// Only disk-scoped handles can create; project-scoped handles fail with
    /// [`Error::InvalidArgument`] before any request is sent.
    pub async fn create(&self, config: Value) -> Result<Created<Snapshot>> {
        match &self.owner {
            SnapshotOwner::DiskScoped(disk) => disk.create_snapshot(self.name(), config).await,
            SnapshotOwner::ProjectScoped(_) => Err(Error::invalid(format!(
                "snapshot {} has no source disk; obtain it through Disk::snapshot to create it",
                self.name()
            ))),
        }
    }
}

impl ServiceObject for Snapshot {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Snapshot {}
impl GetMetadata for Snapshot {}
impl Get for Snapshot {}
impl Delete for Snapshot {}

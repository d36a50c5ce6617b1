//! Persistent disks

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::list::Created;
use super::snapshot::Snapshot;
use super::zone::Zone;
use crate::compute::create_body;
use crate::error::Result;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    core: ResourceCore,
}

impl Disk {
    pub(crate) fn new(zone: &Zone, name: &str) -> Self {
        Self {
            core: ResourceCore::new(
                zone.core().compute().clone(),
                Scope::Zone(zone.name().to_string()),
                "disks",
                name,
            ),
        }
    }

    pub fn zone_name(&self) -> &str {
        match self.core.scope() {
            Scope::Zone(zone) => zone,
            _ => "",
        }
    }

    /// Handle for a snapshot taken from this disk
    pub fn snapshot(&self, name: &str) -> Snapshot {
        Snapshot::for_disk(self.clone(), name)
    }

    /// Snapshot this disk
    ///
    /// POSTs `{name, ...config}` to `disks/<disk>/createSnapshot`; the
    /// returned operation is zonal.
    pub async fn create_snapshot(&self, name: &str, config: Value) -> Result<Created<Snapshot>> {
        let body = create_body(name, config)?;
        let response = self
            .core
            .post_action("createSnapshot", Some(Value::Object(body)))
            .await?;

        Ok(Created {
            resource: self.snapshot(name),
            operation: self.core.operation(response.clone()),
            response,
        })
    }
}

impl ServiceObject for Disk {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Disk {}
impl GetMetadata for Disk {}
impl Get for Disk {}
impl Delete for Disk {}

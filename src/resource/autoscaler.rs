//! Zonal autoscalers

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::zone::Zone;

#[derive(Debug, Clone, PartialEq)]
pub struct Autoscaler {
    core: ResourceCore,
}

impl Autoscaler {
    pub(crate) fn new(zone: &Zone, name: &str) -> Self {
        Self {
            core: ResourceCore::new(
                zone.core().compute().clone(),
                Scope::Zone(zone.name().to_string()),
                "autoscalers",
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
}

impl ServiceObject for Autoscaler {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Autoscaler {}
impl GetMetadata for Autoscaler {}
impl Get for Autoscaler {}
impl Delete for Autoscaler {}

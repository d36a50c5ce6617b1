//! Regional static IP addresses

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::region::Region;

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    core: ResourceCore,
}

impl Address {
    pub(crate) fn new(region: &Region, name: &str) -> Self {
        Self {
            core: ResourceCore::new(
                region.core().compute().clone(),
                Scope::Region(region.name().to_string()),
                "addresses",
                name,
            ),
        }
    }

    /// Name of the region holding this address
    pub fn region_name(&self) -> &str {
        match self.core.scope() {
            Scope::Region(region) => region,
            _ => "",
        }
    }
}

impl ServiceObject for Address {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Address {}
impl GetMetadata for Address {}
impl Get for Address {}
impl Delete for Address {}

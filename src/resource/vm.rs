//! Virtual machine instances

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::operation::Operation;
use super::zone::Zone;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Vm {
    core: ResourceCore,
}

impl Vm {
    pub(crate) fn new(zone: &Zone, name: &str) -> Self {
        Self {
            core: ResourceCore::new(
                zone.core().compute().clone(),
                Scope::Zone(zone.name().to_string()),
                "instances",
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

    pub async fn start(&self) -> Result<Operation> {
        self.action("start").await
    }

    pub async fn stop(&self) -> Result<Operation> {
        self.action("stop").await
    }

    pub async fn reset(&self) -> Result<Operation> {
        self.action("reset").await
    }

    async fn action(&self, action: &str) -> Result<Operation> {
        tracing::info!("{} instance {}", action, self.name());
        let response = self.core.post_action(action, None).await?;
        Ok(self.core.operation(response))
    }
}

impl ServiceObject for Vm {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Vm {}
impl GetMetadata for Vm {}
impl Get for Vm {}
impl Delete for Vm {}

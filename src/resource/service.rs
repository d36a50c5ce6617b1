//! Backend services

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use crate::compute::Compute;
use crate::error::Result;
use serde_json::{json, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Service {
    core: ResourceCore,
}

impl Service {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, Scope::Global, "backendServices", name),
        }
    }

    /// Health of the backends in `group` (an instance group URL)
    pub async fn get_health(&self, group: &str) -> Result<Value> {
        self.core
            .post_action("getHealth", Some(json!({ "group": group })))
            .await
    }
}

impl ServiceObject for Service {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Service {}
impl GetMetadata for Service {}
impl Get for Service {}
impl Delete for Service {}

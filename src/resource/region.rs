//! Regions

use super::address::Address;
use super::core::{Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::list::{flat_items, Created, ListPage};
use super::operation::Operation;
use crate::compute::{create_body, Compute};
use crate::error::Result;
use crate::query::Query;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    core: ResourceCore,
}

impl Region {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, Scope::Project, "regions", name),
        }
    }

    fn scope(&self) -> Scope {
        Scope::Region(self.name().to_string())
    }

    pub fn address(&self, name: &str) -> Address {
        Address::new(self, name)
    }

    pub fn operation(&self, name: &str) -> Operation {
        Operation::new(self.core.compute().clone(), self.scope(), name)
    }

    pub async fn get_addresses(&self, query: Option<&Query>) -> Result<ListPage<Address>> {
        let path = self.scope().collection_path("addresses");
        self.core
            .compute()
            .list(&path, query, |response| {
                flat_items(response, |name, record| self.address(name).with_metadata(record))
            })
            .await
    }

    /// Reserve a static address in this region
    pub async fn create_address(&self, name: &str, config: Value) -> Result<Created<Address>> {
        let body = create_body(name, config)?;
        let path = self.scope().collection_path("addresses");
        let response = self.core.compute().insert(&path, body).await?;

        Ok(Created {
            resource: self.address(name),
            operation: Operation::from_response(self.core.compute(), self.scope(), response.clone()),
            response,
        })
    }
}

impl ServiceObject for Region {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Region {}
impl GetMetadata for Region {}
impl Get for Region {}

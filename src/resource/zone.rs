//! Zones
//!
//! A zone handle is the parent of zonal resources: disks, instances,
//! autoscalers and zonal operations.

use super::autoscaler::Autoscaler;
use super::core::{Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::disk::Disk;
use super::list::{flat_items, Created, ListPage};
use super::operation::Operation;
use super::vm::Vm;
use crate::compute::{create_body, Compute};
use crate::error::Result;
use crate::query::Query;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    core: ResourceCore,
}

impl Zone {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, Scope::Project, "zones", name),
        }
    }

    fn scope(&self) -> Scope {
        Scope::Zone(self.name().to_string())
    }

    fn compute(&self) -> &Compute {
        self.core.compute()
    }

    pub fn disk(&self, name: &str) -> Disk {
        Disk::new(self, name)
    }

    pub fn vm(&self, name: &str) -> Vm {
        Vm::new(self, name)
    }

    pub fn autoscaler(&self, name: &str) -> Autoscaler {
        Autoscaler::new(self, name)
    }

    pub fn operation(&self, name: &str) -> Operation {
        Operation::new(self.compute().clone(), self.scope(), name)
    }

    pub async fn get_disks(&self, query: Option<&Query>) -> Result<ListPage<Disk>> {
        let path = self.scope().collection_path("disks");
        self.compute()
            .list(&path, query, |response| {
                flat_items(response, |name, record| self.disk(name).with_metadata(record))
            })
            .await
    }

    pub async fn get_vms(&self, query: Option<&Query>) -> Result<ListPage<Vm>> {
        let path = self.scope().collection_path("instances");
        self.compute()
            .list(&path, query, |response| {
                flat_items(response, |name, record| self.vm(name).with_metadata(record))
            })
            .await
    }

    pub async fn get_autoscalers(&self, query: Option<&Query>) -> Result<ListPage<Autoscaler>> {
        let path = self.scope().collection_path("autoscalers");
        self.compute()
            .list(&path, query, |response| {
                flat_items(response, |name, record| {
                    self.autoscaler(name).with_metadata(record)
                })
            })
            .await
    }

    /// Create a disk in this zone
    pub async fn create_disk(&self, name: &str, config: Value) -> Result<Created<Disk>> {
        let body = create_body(name, config)?;
        let path = self.scope().collection_path("disks");
        let response = self.compute().insert(&path, body).await?;

        Ok(Created {
            resource: self.disk(name),
            operation: self.operation_for(response.clone()),
            response,
        })
    }

    /// Create an instance in this zone
    ///
    /// A bare `machineType` such as `n1-standard-1` is expanded to
    /// `zones/<zone>/machineTypes/n1-standard-1`.
    pub async fn create_vm(&self, name: &str, config: Value) -> Result<Created<Vm>> {
        let mut body = create_body(name, config)?;
        let expanded = match body.get("machineType") {
            Some(Value::String(machine_type)) if !machine_type.contains('/') => Some(format!(
                "zones/{}/machineTypes/{}",
                self.name(),
                machine_type
            )),
            _ => None,
        };
        if let Some(machine_type) = expanded {
            body.insert("machineType".to_string(), Value::String(machine_type));
        }

        let path = self.scope().collection_path("instances");
        let response = self.compute().insert(&path, body).await?;

        Ok(Created {
            resource: self.vm(name),
            operation: self.operation_for(response.clone()),
            response,
        })
    }

    fn operation_for(&self, response: Value) -> Operation {
        Operation::from_response(self.compute(), self.scope(), response)
    }
}

impl ServiceObject for Zone {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Zone {}
impl GetMetadata for Zone {}
impl Get for Zone {}

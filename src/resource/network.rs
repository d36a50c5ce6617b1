//! VPC networks

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use super::firewall::Firewall;
use super::list::{Created, ListPage};
use crate::compute::Compute;
use crate::error::Result;
use crate::query::Query;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    core: ResourceCore,
}

impl Network {
    pub(crate) fn new(compute: Compute, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, Scope::Global, "networks", name),
        }
    }

    /// Project-relative reference used by other resources' `network` field
    pub fn reference(&self) -> String {
        format!("global/networks/{}", self.name())
    }

    /// Create a firewall rule attached to this network
    pub async fn create_firewall(&self, name: &str, config: Value) -> Result<Created<Firewall>> {
        let config = match config {
            Value::Object(mut map) => {
                map.insert("network".to_string(), Value::String(self.reference()));
                Value::Object(map)
            }
            other => other,
        };
        self.core.compute().create_firewall(name, config).await
    }

    /// Firewall rules attached to this network
    ///
    /// Adds a `network eq <url>` filter; any filter already in `query` is
    /// replaced in the request but left untouched in the caller's query.
    pub async fn get_firewalls(&self, query: Option<&Query>) -> Result<ListPage<Firewall>> {
        let filter = format!("network eq .*/{}$", self.reference());
        let query = query.cloned().unwrap_or_default().with("filter", filter);
        self.core.compute().get_firewalls(Some(&query)).await
    }
}

impl ServiceObject for Network {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Network {}
impl GetMetadata for Network {}
impl Get for Network {}
impl Delete for Network {}

/// Rewrite network shorthand fields into API fields
pub(crate) fn normalize_network_config(mut config: Map<String, Value>) -> Map<String, Value> {
    if let Some(range) = config.remove("range") {
        config.insert("IPv4Range".to_string(), range);
    }

    if let Some(gateway) = config.remove("gateway") {
        config.insert("gatewayIPv4".to_string(), gateway);
    }

    config
}

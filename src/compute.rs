//! Compute Engine facade
//!
//! [`Compute`] is the project-scoped entry point. It owns the transport and
//! hands out resource handles, list pages and create results.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::gcp::auth::get_default_project;
use crate::gcp::{ApiRequest, Credentials, HttpTransport, Transport, DEFAULT_BASE_URL};
use crate::query::Query;
use crate::resource::list::{aggregated_items, flat_items, next_query, LocationScope};
use crate::resource::{
    normalize_firewall_config, normalize_network_config, Address, Autoscaler, Created, Disk,
    Firewall, ListPage, Network, Operation, Region, Scope, ServiceObject, Service, Snapshot, Vm,
    Zone,
};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Project-scoped Compute Engine client
///
/// Cloning is cheap; clones share the transport.
#[derive(Clone)]
pub struct Compute {
    project_id: String,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for Compute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compute")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

/// Same project, same transport
impl PartialEq for Compute {
    fn eq(&self, other: &Self) -> bool {
        self.project_id == other.project_id && Arc::ptr_eq(&self.transport, &other.transport)
    }
}

/// Builder for [`Compute`]
#[derive(Default)]
pub struct ComputeBuilder {
    project_id: Option<String>,
    base_url: Option<String>,
    credentials: Option<Credentials>,
    transport: Option<Arc<dyn Transport>>,
}

impl ComputeBuilder {
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// API root, defaults to [`DEFAULT_BASE_URL`]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Authenticate with a fixed access token instead of ADC
    pub fn access_token(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::from_access_token(token))
    }

    /// Use a custom transport; base URL and credentials are then ignored
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client
    ///
    /// Without an explicit project id the environment and gcloud
    /// configuration are consulted. Without credentials, Application
    /// Default Credentials are loaded.
    pub async fn build(self) -> Result<Compute> {
        let project_id = self
            .project_id
            .filter(|p| !p.is_empty())
            .or_else(get_default_project)
            .ok_or_else(|| {
                Error::invalid("no project configured; set GOOGLE_CLOUD_PROJECT or pass a project id")
            })?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let credentials = match self.credentials {
                    Some(credentials) => credentials,
                    None => Credentials::application_default().await?,
                };
                let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
                Arc::new(HttpTransport::new(base_url, &project_id, credentials)?)
            }
        };

        tracing::debug!("Compute client ready for project {}", project_id);
        Ok(Compute {
            project_id,
            transport,
        })
    }
}

/// Validate create arguments and return the config as a map
///
/// Fails before any I/O when `name` is empty or `config` is not an object.
pub(crate) fn require_create_args(name: &str, config: Value) -> Result<Map<String, Value>> {
    if name.is_empty() {
        return Err(Error::invalid("a name is required"));
    }
    match config {
        Value::Object(map) => Ok(map),
        Value::Null => Err(Error::invalid("a configuration object is required")),
        other => Err(Error::invalid(format!(
            "configuration must be a JSON object, got {}",
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// `{name, ...config}`; `name` wins over a `name` key in `config`
pub(crate) fn with_name(name: &str, config: Map<String, Value>) -> Map<String, Value> {
    let mut body = Map::new();
    body.insert("name".to_string(), Value::String(name.to_string()));
    for (key, value) in config {
        if key != "name" {
            body.insert(key, value);
        }
    }
    body
}

/// Validated create body without kind-specific rewrites
pub(crate) fn create_body(name: &str, config: Value) -> Result<Map<String, Value>> {
    Ok(with_name(name, require_create_args(name, config)?))
}

impl Compute {
    pub fn builder() -> ComputeBuilder {
        ComputeBuilder::default()
    }

    /// Client for `project_id` using Application Default Credentials
    pub async fn new(project_id: &str) -> Result<Self> {
        Self::builder().project_id(project_id).build().await
    }

    /// Client from a loaded [`Config`]
    pub async fn from_config(config: &Config) -> Result<Self> {
        let mut builder = Self::builder().project_id(config.effective_project());
        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder.build().await
    }

    /// Client over an existing transport
    pub fn with_transport(project_id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            project_id: project_id.into(),
            transport,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Send a raw request through the transport
    pub async fn send(&self, request: ApiRequest) -> Result<Value> {
        self.transport.send(request).await
    }

    /// GET one page of `path` and normalize its items
    ///
    /// `query` is sent as-is and never modified; `None` sends no
    /// parameters. The continuation query is a copy carrying `pageToken`.
    pub async fn list<T>(
        &self,
        path: &str,
        query: Option<&Query>,
        normalize: impl FnOnce(&Value) -> Vec<T>,
    ) -> Result<ListPage<T>> {
        let query = query.cloned().unwrap_or_default();
        let response = self
            .send(ApiRequest::get(path).with_query(query.clone()))
            .await?;

        let items = normalize(&response);
        let next_query = next_query(&query, &response);
        tracing::debug!(
            "listed {} items from {} (more: {})",
            items.len(),
            path,
            next_query.is_some()
        );

        Ok(ListPage {
            items,
            next_query,
            response,
        })
    }

    /// POST a create body to a collection, returning the raw response
    pub(crate) async fn insert(&self, path: &str, body: Map<String, Value>) -> Result<Value> {
        tracing::info!(
            "creating {} in {}",
            body.get("name").and_then(|v| v.as_str()).unwrap_or_default(),
            path
        );
        self.send(ApiRequest::post(path).with_body(Value::Object(body)))
            .await
    }

    fn global_operation(&self, response: Value) -> Operation {
        Operation::from_response(self, Scope::Global, response)
    }

    // =========================================================================
    // Handles
    // =========================================================================

    pub fn firewall(&self, name: &str) -> Firewall {
        Firewall::new(self.clone(), name)
    }

    pub fn network(&self, name: &str) -> Network {
        Network::new(self.clone(), name)
    }

    /// Backend service handle
    pub fn service(&self, name: &str) -> Service {
        Service::new(self.clone(), name)
    }

    /// Global operation handle
    pub fn operation(&self, name: &str) -> Operation {
        Operation::new(self.clone(), Scope::Global, name)
    }

    pub fn region(&self, name: &str) -> Region {
        Region::new(self.clone(), name)
    }

    pub fn snapshot(&self, name: &str) -> Snapshot {
        Snapshot::new(self.clone(), name)
    }

    pub fn zone(&self, name: &str) -> Zone {
        Zone::new(self.clone(), name)
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create a firewall rule
    ///
    /// Accepts the `protocols`, `ranges` and `tags` shorthands next to the
    /// regular API fields.
    ///
    /// ```ignore
    /// let created = compute
    ///     .create_firewall("allow-web", json!({
    ///         "protocols": { "tcp": [80, 443] },
    ///         "ranges": "0.0.0.0/0",
    ///     }))
    ///     .await?;
    /// ```
    pub async fn create_firewall(&self, name: &str, config: Value) -> Result<Created<Firewall>> {
        let config = require_create_args(name, config)?;
        let body = with_name(name, normalize_firewall_config(config));
        let response = self.insert("/global/firewalls", body).await?;

        Ok(Created {
            resource: self.firewall(name),
            operation: self.global_operation(response.clone()),
            response,
        })
    }

    /// Create a network; accepts `range` and `gateway` shorthands
    pub async fn create_network(&self, name: &str, config: Value) -> Result<Created<Network>> {
        let config = require_create_args(name, config)?;
        let body = with_name(name, normalize_network_config(config));
        let response = self.insert("/global/networks", body).await?;

        Ok(Created {
            resource: self.network(name),
            operation: self.global_operation(response.clone()),
            response,
        })
    }

    /// Create a backend service
    pub async fn create_service(&self, name: &str, config: Value) -> Result<Created<Service>> {
        let body = create_body(name, config)?;
        let response = self.insert("/global/backendServices", body).await?;

        Ok(Created {
            resource: self.service(name),
            operation: self.global_operation(response.clone()),
            response,
        })
    }

    // =========================================================================
    // Aggregated lists
    // =========================================================================

    /// Addresses across all regions
    pub async fn get_addresses(&self, query: Option<&Query>) -> Result<ListPage<Address>> {
        self.list("/aggregated/addresses", query, |response| {
            aggregated_items(
                response,
                LocationScope::Regions,
                "addresses",
                |region| self.region(region),
                |region, name, record| region.address(name).with_metadata(record),
            )
        })
        .await
    }

    /// Autoscalers across all zones
    ///
    /// Regional autoscalers (grouped under `regions/`) are not returned.
    pub async fn get_autoscalers(&self, query: Option<&Query>) -> Result<ListPage<Autoscaler>> {
        self.list("/aggregated/autoscalers", query, |response| {
            aggregated_items(
                response,
                LocationScope::Zones,
                "autoscalers",
                |zone| self.zone(zone),
                |zone, name, record| zone.autoscaler(name).with_metadata(record),
            )
        })
        .await
    }

    /// Disks across all zones
    pub async fn get_disks(&self, query: Option<&Query>) -> Result<ListPage<Disk>> {
        self.list("/aggregated/disks", query, |response| {
            aggregated_items(
                response,
                LocationScope::Zones,
                "disks",
                |zone| self.zone(zone),
                |zone, name, record| zone.disk(name).with_metadata(record),
            )
        })
        .await
    }

    /// Instances across all zones
    pub async fn get_vms(&self, query: Option<&Query>) -> Result<ListPage<Vm>> {
        self.list("/aggregated/instances", query, |response| {
            aggregated_items(
                response,
                LocationScope::Zones,
                "instances",
                |zone| self.zone(zone),
                |zone, name, record| zone.vm(name).with_metadata(record),
            )
        })
        .await
    }

    // =========================================================================
    // Flat lists
    // =========================================================================

    pub async fn get_firewalls(&self, query: Option<&Query>) -> Result<ListPage<Firewall>> {
        self.list("/global/firewalls", query, |response| {
            flat_items(response, |name, record| self.firewall(name).with_metadata(record))
        })
        .await
    }

    pub async fn get_networks(&self, query: Option<&Query>) -> Result<ListPage<Network>> {
        self.list("/global/networks", query, |response| {
            flat_items(response, |name, record| self.network(name).with_metadata(record))
        })
        .await
    }

    /// Backend services
    pub async fn get_services(&self, query: Option<&Query>) -> Result<ListPage<Service>> {
        self.list("/global/backendServices", query, |response| {
            flat_items(response, |name, record| self.service(name).with_metadata(record))
        })
        .await
    }

    /// Global operations
    pub async fn get_operations(&self, query: Option<&Query>) -> Result<ListPage<Operation>> {
        self.list("/global/operations", query, |response| {
            flat_items(response, |name, record| self.operation(name).with_metadata(record))
        })
        .await
    }

    pub async fn get_regions(&self, query: Option<&Query>) -> Result<ListPage<Region>> {
        self.list("/regions", query, |response| {
            flat_items(response, |name, record| self.region(name).with_metadata(record))
        })
        .await
    }

    pub async fn get_snapshots(&self, query: Option<&Query>) -> Result<ListPage<Snapshot>> {
        self.list("/global/snapshots", query, |response| {
            flat_items(response, |name, record| self.snapshot(name).with_metadata(record))
        })
        .await
    }

    pub async fn get_zones(&self, query: Option<&Query>) -> Result<ListPage<Zone>> {
        self.list("/zones", query, |response| {
            flat_items(response, |name, record| self.zone(name).with_metadata(record))
        })
        .await
    }
}

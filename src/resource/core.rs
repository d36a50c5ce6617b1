//! Shared handle plumbing
//!
//! Every resource handle embeds a [`ResourceCore`] (facade, scope, name,
//! cached metadata) and opts into the capability traits it supports:
//! [`Exists`], [`GetMetadata`], [`Get`] and [`Delete`]. The traits carry the
//! shared default implementations; a handle overrides one only when its API
//! behaves differently.

use super::operation::Operation;
use crate::compute::Compute;
use crate::error::Result;
use crate::gcp::ApiRequest;
use serde_json::Value;

/// Where a resource lives inside a project
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Directly under the project (zones, regions)
    Project,
    /// Under `global/`
    Global,
    Zone(String),
    Region(String),
}

impl Scope {
    /// Path prefix relative to the project, without trailing slash
    pub fn prefix(&self) -> String {
        match self {
            Scope::Project => String::new(),
            Scope::Global => "/global".to_string(),
            Scope::Zone(zone) => format!("/zones/{}", zone),
            Scope::Region(region) => format!("/regions/{}", region),
        }
    }

    /// Scope of the operations started against resources in this scope
    pub fn operation_scope(&self) -> Scope {
        match self {
            Scope::Project | Scope::Global => Scope::Global,
            other => other.clone(),
        }
    }

    /// Path of `collection` in this scope, e.g. `/zones/us-central1-a/disks`
    pub fn collection_path(&self, collection: &str) -> String {
        format!("{}/{}", self.prefix(), collection)
    }
}

/// Identity and generic REST verbs shared by every handle
#[derive(Clone)]
pub struct ResourceCore {
    compute: Compute,
    scope: Scope,
    collection: &'static str,
    name: String,
    metadata: Option<Value>,
}

impl std::fmt::Debug for ResourceCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCore")
            .field("project", &self.compute.project_id())
            .field("path", &self.path())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Handles are equal when they address the same resource through the same
/// facade. Cached metadata is ignored.
impl PartialEq for ResourceCore {
    fn eq(&self, other: &Self) -> bool {
        self.compute == other.compute
            && self.scope == other.scope
            && self.collection == other.collection
            && self.name == other.name
    }
}

impl ResourceCore {
    pub fn new(compute: Compute, scope: Scope, collection: &'static str, name: &str) -> Self {
        Self {
            compute,
            scope,
            collection,
            name: name.to_string(),
            metadata: None,
        }
    }

    pub fn compute(&self) -> &Compute {
        &self.compute
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn set_metadata(&mut self, metadata: Value) {
        self.metadata = Some(metadata);
    }

    /// Path of this resource relative to the project
    pub fn path(&self) -> String {
        format!("{}/{}", self.scope.collection_path(self.collection), self.name)
    }

    /// GET the resource; a 404 means it does not exist
    pub async fn exists(&self) -> Result<bool> {
        match self.compute.send(ApiRequest::get(self.path())).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// GET the resource and cache the response as metadata
    pub async fn get_metadata(&mut self) -> Result<Value> {
        let response = self.compute.send(ApiRequest::get(self.path())).await?;
        self.metadata = Some(response.clone());
        Ok(response)
    }

    /// DELETE the resource, returning the raw response
    pub async fn delete(&self) -> Result<Value> {
        self.compute.send(ApiRequest::delete(self.path())).await
    }

    /// POST to `<path>/<action>`, e.g. `instances/vm-1/start`
    pub async fn post_action(&self, action: &str, body: Option<Value>) -> Result<Value> {
        let mut request = ApiRequest::post(format!("{}/{}", self.path(), action));
        if let Some(body) = body {
            request = request.with_body(body);
        }
        self.compute.send(request).await
    }

    /// Operation handle for a raw mutation response
    pub fn operation(&self, response: Value) -> Operation {
        Operation::from_response(&self.compute, self.scope.operation_scope(), response)
    }
}

/// A handle onto one named Compute Engine resource
pub trait ServiceObject {
    fn core(&self) -> &ResourceCore;

    fn core_mut(&mut self) -> &mut ResourceCore;

    fn name(&self) -> &str {
        self.core().name()
    }

    /// Last metadata seen for this resource, from a list or a get
    fn metadata(&self) -> Option<&Value> {
        self.core().metadata()
    }

    fn with_metadata(mut self, metadata: Value) -> Self
    where
        Self: Sized,
    {
        self.core_mut().set_metadata(metadata);
        self
    }
}

#[allow(async_fn_in_trait)]
pub trait Exists: ServiceObject {
    async fn exists(&self) -> Result<bool> {
        self.core().exists().await
    }
}

#[allow(async_fn_in_trait)]
pub trait GetMetadata: ServiceObject {
    async fn get_metadata(&mut self) -> Result<Value> {
        self.core_mut().get_metadata().await
    }
}

#[allow(async_fn_in_trait)]
pub trait Get: GetMetadata + Clone {
    /// Fetch the resource and return a handle carrying fresh metadata
    async fn get(&self) -> Result<Self> {
        let mut handle = self.clone();
        handle.get_metadata().await?;
        Ok(handle)
    }
}

#[allow(async_fn_in_trait)]
pub trait Delete: ServiceObject {
    /// Delete the resource. The returned operation's metadata is the raw
    /// API response.
    async fn delete(&self) -> Result<Operation> {
        let response = self.core().delete().await?;
        Ok(self.core().operation(response))
    }
}

//! Operation handles
//!
//! Every mutation (create, delete, start, ...) answers with an operation
//! record. The handle keeps that record as metadata and can poll it until
//! the API reports `DONE`.

use super::core::{Delete, Exists, Get, GetMetadata, ResourceCore, Scope, ServiceObject};
use crate::compute::Compute;
use crate::error::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Status reported by a finished operation
pub const STATUS_DONE: &str = "DONE";

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    core: ResourceCore,
}

impl Operation {
    pub(crate) fn new(compute: Compute, scope: Scope, name: &str) -> Self {
        Self {
            core: ResourceCore::new(compute, scope, "operations", name),
        }
    }

    /// Build a handle from a raw mutation response
    ///
    /// The operation name comes from `response.name`. Zonal and regional
    /// operations name their location in `zone` / `region`; otherwise
    /// `fallback` is used.
    pub(crate) fn from_response(compute: &Compute, fallback: Scope, response: Value) -> Self {
        let name = response
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        let scope = scope_from_record(&response).unwrap_or(fallback);

        Self::new(compute.clone(), scope, &name).with_metadata(response)
    }

    pub fn scope(&self) -> &Scope {
        self.core.scope()
    }

    /// `status` field of the last metadata seen
    pub fn status(&self) -> Option<&str> {
        self.metadata()
            .and_then(|m| m.get("status"))
            .and_then(|v| v.as_str())
    }

    pub fn is_done(&self) -> bool {
        self.status() == Some(STATUS_DONE)
    }

    /// Poll until the operation is `DONE`, sleeping `interval` between polls
    ///
    /// Returns the final operation record. A finished operation carrying an
    /// `error` member resolves to [`Error::Operation`].
    pub async fn wait_for_done(&mut self, interval: Duration) -> Result<Value> {
        loop {
            let metadata = self.get_metadata().await?;
            if metadata.get("status").and_then(|v| v.as_str()) == Some(STATUS_DONE) {
                return Ok(metadata);
            }
            tracing::debug!("operation {} not done yet", self.name());
            tokio::time::sleep(interval).await;
        }
    }
}

/// Location named by a record's `zone` or `region` URL
fn scope_from_record(record: &Value) -> Option<Scope> {
    let last_segment = |key: &str| {
        record
            .get(key)
            .and_then(|v| v.as_str())
            .and_then(|url| url.rsplit('/').next())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    };

    if let Some(zone) = last_segment("zone") {
        return Some(Scope::Zone(zone));
    }
    last_segment("region").map(Scope::Region)
}

/// Join `error.errors[].message` into one line
fn operation_error_message(error: &Value) -> String {
    let messages: Vec<&str> = error
        .get("errors")
        .and_then(|v| v.as_array())
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if messages.is_empty() {
        "unknown error".to_string()
    } else {
        messages.join("; ")
    }
}

impl ServiceObject for Operation {
    fn core(&self) -> &ResourceCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ResourceCore {
        &mut self.core
    }
}

impl Exists for Operation {}

impl GetMetadata for Operation {
    async fn get_metadata(&mut self) -> Result<Value> {
        let response = self.core.get_metadata().await?;
        if let Some(error) = response.get("error") {
            return Err(Error::Operation {
                name: self.core.name().to_string(),
                message: operation_error_message(error),
                response,
            });
        }
        Ok(response)
    }
}

impl Get for Operation {}
impl Delete for Operation {}

//! Transport abstraction
//!
//! Everything the client sends goes through a [`Transport`]: a request
//! descriptor scoped to the project base URL in, decoded JSON out.

use crate::error::Result;
use crate::query::Query;
use futures::future::BoxFuture;
use reqwest::Method;
use serde_json::Value;

/// A single request against the Compute Engine API
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the project, e.g. `/global/firewalls`
    pub path: String,
    pub body: Option<Value>,
    pub query: Query,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Query::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }
}

/// Sends [`ApiRequest`]s and decodes the response
///
/// Implementations resolve exactly once per request. An empty success body
/// decodes to `Value::Null`.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, Result<Value>>;
}

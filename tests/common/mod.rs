//! Shared test helpers
//!
//! [`StubTransport`] records every request and answers from a queue of
//! canned responses, so facade behavior can be checked without a server.

#![allow(dead_code)]

use futures::future::BoxFuture;
use gcompute::gcp::{ApiRequest, Transport};
use gcompute::{Compute, Error};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const PROJECT: &str = "test-project";

#[derive(Default)]
pub struct StubTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<gcompute::Result<Value>>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful response
    pub fn respond(&self, body: Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// Queue an API error carrying `body` as the raw response
    pub fn fail(&self, status: u16, body: Value) {
        self.responses.lock().unwrap().push_back(Err(Error::Api {
            status,
            message: "stubbed failure".to_string(),
            response: Some(body),
        }));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was sent")
    }
}

impl Transport for StubTransport {
    fn send(&self, request: ApiRequest) -> BoxFuture<'_, gcompute::Result<Value>> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(json!({})));
        Box::pin(async move { response })
    }
}

pub fn compute(stub: &Arc<StubTransport>) -> Compute {
    Compute::with_transport(PROJECT, stub.clone())
}

/// Typical insert response for a global operation
pub fn operation_response(name: &str) -> Value {
    json!({
        "kind": "compute#operation",
        "name": name,
        "status": "PENDING",
        "operationType": "insert"
    })
}

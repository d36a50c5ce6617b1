//! Resource handle verbs: exists/get/get_metadata/delete and friends

mod common;

use common::{compute, operation_response, StubTransport};
use gcompute::resource::{
    Delete, Exists, Get, GetMetadata, Scope, ServiceObject, SnapshotOwner,
};
use gcompute::Error;
use reqwest::Method;
use serde_json::json;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

#[test]
fn test_factories_return_equal_but_distinct_handles() {
    let stub = StubTransport::new();
    let compute = compute(&stub);

    let a = compute.firewall("fw");
    let b = compute.firewall("fw");
    assert_eq!(a, b);
    assert_ne!(compute.firewall("fw"), compute.firewall("other"));
    assert_eq!(compute.zone("z").disk("d"), compute.zone("z").disk("d"));
    assert_ne!(compute.zone("z1").disk("d"), compute.zone("z2").disk("d"));
    assert!(stub.requests().is_empty());
}

#[test]
fn test_handles_from_different_clients_differ() {
    let first = compute(&StubTransport::new());
    let second = compute(&StubTransport::new());
    assert_ne!(first.network("default"), second.network("default"));
}

#[tokio::test]
async fn test_exists() {
    let stub = StubTransport::new();
    stub.respond(json!({ "name": "fw" }));
    stub.fail(404, json!({ "error": { "code": 404 } }));
    stub.fail(500, json!({ "error": { "code": 500 } }));

    let firewall = compute(&stub).firewall("fw");
    assert!(assert_ok!(firewall.exists().await));
    assert!(!assert_ok!(firewall.exists().await));
    let err = assert_err!(firewall.exists().await);
    assert_eq!(err.status(), Some(500));

    assert_eq!(stub.last_request().path, "/global/firewalls/fw");
}

#[tokio::test]
async fn test_get_metadata_caches_response() {
    let stub = StubTransport::new();
    let record = json!({ "name": "default", "IPv4Range": "10.240.0.0/16" });
    stub.respond(record.clone());

    let mut network = compute(&stub).network("default");
    assert!(network.metadata().is_none());

    let metadata = network.get_metadata().await.unwrap();
    assert_eq!(metadata, record);
    assert_eq!(network.metadata(), Some(&record));
    assert_eq!(stub.last_request().path, "/global/networks/default");
}

#[tokio::test]
async fn test_get_returns_fresh_handle() {
    let stub = StubTransport::new();
    stub.respond(json!({ "name": "us-central1-a", "status": "UP" }));

    let zone = compute(&stub).zone("us-central1-a");
    let fetched = zone.get().await.unwrap();

    assert_eq!(fetched, zone);
    assert!(zone.metadata().is_none());
    assert_eq!(fetched.metadata().unwrap()["status"], "UP");
    assert_eq!(stub.last_request().path, "/zones/us-central1-a");
}

#[tokio::test]
async fn test_snapshot_delete_wraps_operation() {
    let stub = StubTransport::new();
    let response = operation_response("op-delete");
    stub.respond(response.clone());

    let compute = compute(&stub);
    let operation = compute.snapshot("nightly").delete().await.unwrap();

    let request = stub.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/global/snapshots/nightly");

    assert_eq!(operation, compute.operation("op-delete"));
    assert_eq!(operation.metadata(), Some(&response));
}

#[tokio::test]
async fn test_snapshot_delete_error() {
    let stub = StubTransport::new();
    let body = json!({ "error": { "code": 404, "message": "not found" } });
    stub.fail(404, body.clone());

    let err = assert_err!(compute(&stub).snapshot("gone").delete().await);
    assert!(err.is_not_found());
    assert_eq!(err.response(), Some(&body));
}

#[tokio::test]
async fn test_disk_delete_returns_zonal_operation() {
    let stub = StubTransport::new();
    stub.respond(operation_response("op-disk"));

    let compute = compute(&stub);
    let zone = compute.zone("us-east1-b");
    let operation = zone.disk("data").delete().await.unwrap();

    assert_eq!(stub.last_request().path, "/zones/us-east1-b/disks/data");
    assert_eq!(operation, zone.operation("op-disk"));
}

#[tokio::test]
async fn test_disk_scoped_snapshot_can_be_created() {
    let stub = StubTransport::new();
    stub.respond(operation_response("op-snap"));

    let compute = compute(&stub);
    let disk = compute.zone("us-central1-a").disk("data");
    let snapshot = disk.snapshot("data-snap");
    assert!(matches!(snapshot.owner(), SnapshotOwner::DiskScoped(d) if *d == disk));

    let created = snapshot.create(json!({ "description": "nightly" })).await.unwrap();

    let request = stub.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(
        request.path,
        "/zones/us-central1-a/disks/data/createSnapshot"
    );
    assert_eq!(
        request.body.unwrap(),
        json!({ "name": "data-snap", "description": "nightly" })
    );
    assert_eq!(created.resource.name(), "data-snap");
    assert_eq!(created.resource.disk(), Some(&disk));
    assert_eq!(
        created.operation.scope(),
        &Scope::Zone("us-central1-a".to_string())
    );
}

#[tokio::test]
async fn test_project_snapshot_cannot_be_created() {
    let stub = StubTransport::new();
    let snapshot = compute(&stub).snapshot("orphan");

    assert!(snapshot.disk().is_none());
    let err = assert_err!(snapshot.create(json!({})).await);
    assert!(matches!(err, Error::InvalidArgument(_)));
    assert!(stub.requests().is_empty());
}

#[tokio::test]
async fn test_vm_actions() {
    let stub = StubTransport::new();
    stub.respond(operation_response("op-start"));
    stub.respond(operation_response("op-stop"));
    stub.respond(operation_response("op-reset"));

    let compute = compute(&stub);
    let vm = compute.zone("us-central1-a").vm("web-1");

    assert_eq!(vm.start().await.unwrap().name(), "op-start");
    assert_eq!(vm.stop().await.unwrap().name(), "op-stop");
    assert_eq!(vm.reset().await.unwrap().name(), "op-reset");

    let requests = stub.requests();
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "/zones/us-central1-a/instances/web-1/start",
            "/zones/us-central1-a/instances/web-1/stop",
            "/zones/us-central1-a/instances/web-1/reset",
        ]
    );
    assert!(requests.iter().all(|r| r.method == Method::POST));
}

#[tokio::test]
async fn test_service_get_health() {
    let stub = StubTransport::new();
    stub.respond(json!({ "healthStatus": [{ "healthState": "HEALTHY" }] }));

    let health = compute(&stub)
        .service("backend")
        .get_health("zones/us-central1-a/instanceGroups/ig-1")
        .await
        .unwrap();

    assert_eq!(health["healthStatus"][0]["healthState"], "HEALTHY");
    let request = stub.last_request();
    assert_eq!(request.path, "/global/backendServices/backend/getHealth");
    assert_eq!(
        request.body.unwrap(),
        json!({ "group": "zones/us-central1-a/instanceGroups/ig-1" })
    );
}

#[tokio::test]
async fn test_operation_error_member_surfaces() {
    let stub = StubTransport::new();
    let record = json!({
        "name": "op-1",
        "status": "DONE",
        "error": { "errors": [{ "code": "QUOTA_EXCEEDED", "message": "Quota exceeded" }] }
    });
    stub.respond(record.clone());

    let mut operation = compute(&stub).operation("op-1");
    let err = assert_err!(operation.get_metadata().await);

    match err {
        Error::Operation { name, message, response } => {
            assert_eq!(name, "op-1");
            assert_eq!(message, "Quota exceeded");
            assert_eq!(response, record);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_for_done_polls_until_done() {
    let stub = StubTransport::new();
    stub.respond(json!({ "name": "op-1", "status": "PENDING" }));
    stub.respond(json!({ "name": "op-1", "status": "RUNNING" }));
    stub.respond(json!({ "name": "op-1", "status": "DONE" }));

    let compute = compute(&stub);
    let mut operation = compute.zone("us-central1-a").operation("op-1");
    let done = operation
        .wait_for_done(Duration::from_millis(1))
        .await
        .unwrap();

    assert_eq!(done["status"], "DONE");
    assert!(operation.is_done());
    assert_eq!(stub.requests().len(), 3);
    assert_eq!(
        stub.last_request().path,
        "/zones/us-central1-a/operations/op-1"
    );
}

#[tokio::test]
async fn test_operation_delete() {
    let stub = StubTransport::new();
    stub.respond(serde_json::Value::Null);

    let compute = compute(&stub);
    compute.operation("op-old").delete().await.unwrap();
    compute
        .region("us-central1")
        .operation("op-regional")
        .delete()
        .await
        .unwrap();

    let requests = stub.requests();
    assert!(requests.iter().all(|r| r.method == Method::DELETE));
    assert_eq!(requests[0].path, "/global/operations/op-old");
    assert_eq!(requests[1].path, "/regions/us-central1/operations/op-regional");
}

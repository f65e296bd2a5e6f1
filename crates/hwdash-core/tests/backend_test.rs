#![allow(clippy::unwrap_used, clippy::float_cmp)]
// Backend facade against a mocked inventory + metrics pair.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hwdash_core::metrics::parse_storage_graph_data;
use hwdash_core::{Backend, BackendConfig, CoreError, DeviceType, EntityId};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Backend) {
    let server = MockServer::start().await;
    let config = BackendConfig::new(
        Url::parse(&format!("{}/cdim/api/v1", server.uri())).unwrap(),
        Url::parse(&format!("{}/api/v1", server.uri())).unwrap(),
    );
    (server, Backend::new(&config).unwrap())
}

fn resource_json(id: &str, ty: &str, switch: &str, nodes: &[&str]) -> serde_json::Value {
    json!({
        "device": {
            "deviceID": id,
            "type": ty,
            "status": { "state": "Enabled", "health": "OK" },
            "capacityMiB": 1024,
            "driveCapacityBytes": 4000,
            "deviceSwitchInfo": switch
        },
        "nodeIDs": nodes,
        "resourceGroupIDs": [],
        "annotation": { "available": true },
        "detected": true
    })
}

async fn mount_resources(server: &MockServer, resources: Vec<serde_json::Value>) {
    Mock::given(method("GET"))
        .and(path("/cdim/api/v1/resources"))
        .and(query_param("detail", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": resources.len(),
            "resources": resources
        })))
        .mount(server)
        .await;
}

// ── Inventory ───────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_device_types_are_dropped() {
    let (server, backend) = setup().await;
    mount_resources(
        &server,
        vec![
            resource_json("cpu-1", "CPU", "", &["node-1"]),
            resource_json("x-1", "quantum", "", &[]),
        ],
    )
    .await;

    let resources = backend.resources().await.unwrap();
    assert_eq!(resources.len(), 1);
    assert_eq!(resources[0].device_type(), DeviceType::Cpu);
}

#[tokio::test]
async fn switches_are_derived_from_resources() {
    let (server, backend) = setup().await;
    mount_resources(
        &server,
        vec![
            resource_json("mem-1", "memory", "CXL11", &["node-1"]),
            resource_json("mem-2", "memory", "CXL11", &[]),
            resource_json("cpu-1", "CPU", "", &["node-1"]),
        ],
    )
    .await;

    let switches = backend.cxl_switches().await.unwrap();
    assert_eq!(switches.len(), 1);
    assert_eq!(switches[0].id.as_str(), "CXL11");
    assert_eq!(switches[0].allocated_devices, 1);
    assert_eq!(switches[0].unallocated_devices, 1);
}

#[tokio::test]
async fn missing_group_maps_to_not_found() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/cdim/api/v1/resource-groups/g-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": "E40400",
            "message": "not found"
        })))
        .mount(&server)
        .await;

    let err = backend
        .resource_group(&EntityId::from("g-404"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }), "{err:?}");
    assert_eq!(err.to_string(), "Resource group not found: g-404");
}

#[tokio::test]
async fn membership_update_sends_group_ids() {
    let (server, backend) = setup().await;
    Mock::given(method("PUT"))
        .and(path("/cdim/api/v1/resources/gpu-1/resource-groups"))
        .and(body_json(json!({ "resourceGroupIDs": ["g-1", "g-2"] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(resource_json(
            "gpu-1",
            "GPU",
            "",
            &["node-1"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let updated = backend
        .set_resource_groups(
            &EntityId::from("gpu-1"),
            &[EntityId::from("g-1"), EntityId::from("g-2")],
        )
        .await
        .unwrap();
    assert_eq!(updated.id().as_str(), "gpu-1");
}

// ── Fetch handles ───────────────────────────────────────────────────

#[tokio::test]
async fn resource_group_fetch_keeps_data_after_failure() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/cdim/api/v1/resource-groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "resourceGroups": [{ "id": "g-1", "name": "default", "description": "" }]
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let fetch = backend.resource_group_fetch();
    fetch.revalidate().await;
    assert_eq!(fetch.data().unwrap()[0].name, "default");

    Mock::given(method("GET"))
        .and(path("/cdim/api/v1/resource-groups"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    fetch.revalidate().await;
    assert!(fetch.error().is_some());
    assert_eq!(fetch.data().unwrap()[0].name, "default");
    assert!(!fetch.is_validating());
}

// ── Metrics ─────────────────────────────────────────────────────────

#[tokio::test]
async fn storage_usage_feeds_the_storage_parser() {
    let (server, backend) = setup().await;
    mount_resources(
        &server,
        vec![
            resource_json("disk-1", "storage", "", &["node-1"]),
            resource_json("disk-2", "storage", "", &[]),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [{
                    "metric": { "data_label": "storageUsed" },
                    "value": [1_714_564_800.0, "1500"]
                }]
            }
        })))
        .mount(&server)
        .await;

    let (resources, usage) = tokio::join!(backend.resources(), backend.query_storage_usage());
    let resources = resources.unwrap();
    let usage = usage.unwrap();

    let view = parse_storage_graph_data(Some(resources.as_slice()), Some(&usage));
    assert_eq!(view.used, Some(1500.0));
    assert_eq!(view.allocated, Some(4000));
    assert_eq!(view.overall, Some(8000));
}

#[tokio::test]
async fn graph_query_hits_range_endpoint() {
    let (server, backend) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .and(query_param("step", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": { "resultType": "matrix", "result": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let device = hwdash_core::Device {
        device_id: EntityId::from("gpu-1"),
        device_type: DeviceType::Gpu,
        health: hwdash_core::DeviceHealth::Ok,
        state: hwdash_core::DeviceState::Enabled,
        capacity_mib: None,
        drive_capacity_bytes: None,
        cxl_switch_id: None,
        power_state: None,
    };
    let response = backend
        .query_graph(&device, Duration::from_secs(3600))
        .await
        .unwrap();
    assert!(response.data.result.is_empty());
}

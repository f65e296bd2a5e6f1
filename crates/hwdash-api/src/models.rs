// Wire types for the inventory REST backend and the metrics backend.
//
// Field names follow the backend's JSON exactly; `hwdash-core` converts
// these into canonical domain types. Count and array fields default to
// zero/empty when the backend omits them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Inventory ───────────────────────────────────────────────────────

/// `status` object attached to every device.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiDeviceStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub health: Option<String>,
}

/// The hardware description nested inside a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDevice {
    #[serde(rename = "deviceID")]
    pub device_id: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub status: ApiDeviceStatus,
    #[serde(rename = "capacityMiB", default)]
    pub capacity_mib: Option<u64>,
    #[serde(default)]
    pub drive_capacity_bytes: Option<u64>,
    #[serde(default)]
    pub device_switch_info: Option<String>,
    #[serde(default)]
    pub power_state: Option<String>,
    /// Fields the dashboard does not interpret (links, constraints, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiAnnotation {
    #[serde(default)]
    pub available: bool,
}

/// One entry of `GET /resources?detail=true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResource {
    pub device: ApiDevice,
    #[serde(rename = "resourceGroupIDs", default)]
    pub resource_group_ids: Vec<String>,
    #[serde(rename = "nodeIDs", default)]
    pub node_ids: Vec<String>,
    #[serde(default)]
    pub annotation: ApiAnnotation,
    #[serde(default)]
    pub detected: bool,
}

/// One entry of `GET /nodes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiNode {
    pub id: String,
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}

/// One entry of `GET /resource-groups`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub nodes: Vec<ApiNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub resources: Vec<ApiResource>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupList {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub resource_groups: Vec<ApiResourceGroup>,
}

/// Body of `POST /resource-groups` and `PUT /resource-groups/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceGroupRequest {
    pub name: String,
    pub description: String,
}

/// Body of `PUT /resources/{id}/resource-groups`.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipRequest {
    #[serde(rename = "resourceGroupIDs")]
    pub resource_group_ids: Vec<String>,
}

// ── Metrics ─────────────────────────────────────────────────────────

/// One `[timestamp, "value"]` pair as emitted by the metrics backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample(pub f64, pub String);

impl Sample {
    pub fn timestamp(&self) -> f64 {
        self.0
    }

    /// Parsed sample value; `None` if the backend sent a non-numeric string.
    pub fn value(&self) -> Option<f64> {
        self.1.parse().ok()
    }
}

/// One series of a query result: its label set plus either a single
/// sample (`/query`) or a sample list (`/query_range`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    #[serde(default)]
    pub metric: BTreeMap<String, String>,
    #[serde(default)]
    pub value: Option<Sample>,
    #[serde(default)]
    pub values: Vec<Sample>,
}

impl MetricSeries {
    pub fn label(&self, name: &str) -> Option<&str> {
        self.metric.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsData {
    #[serde(default)]
    pub result_type: String,
    #[serde(default)]
    pub result: Vec<MetricSeries>,
}

/// The metrics envelope: `{status, data: {resultType, result}, stats}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub status: String,
    #[serde(default)]
    pub data: MetricsData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MetricsResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

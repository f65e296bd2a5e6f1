// ── API-to-domain type conversions ──
//
// Bridges raw `hwdash_api::models` response types into canonical
// `hwdash_core::model` domain types. Missing counts and arrays arrive as
// zero/empty from the wire layer; unknown enum strings fall back to their
// `Unknown` variants.

use std::str::FromStr;

use tracing::warn;

use hwdash_api::models::{ApiDevice, ApiNode, ApiResource, ApiResourceGroup};

use crate::model::{
    Device, DeviceHealth, DeviceState, DeviceType, EntityId, Node, Resource, ResourceGroup,
};

/// Convert one API resource. Returns `None` (and logs) when the device type
/// is not one the dashboard knows.
pub fn resource_from_api(api: ApiResource) -> Option<Resource> {
    let device = device_from_api(api.device)?;
    Some(Resource {
        device,
        node_ids: api.node_ids.into_iter().map(EntityId::from).collect(),
        resource_group_ids: api
            .resource_group_ids
            .into_iter()
            .map(EntityId::from)
            .collect(),
        available: api.annotation.available,
        detected: api.detected,
    })
}

fn device_from_api(api: ApiDevice) -> Option<Device> {
    let Ok(device_type) = DeviceType::from_str(&api.device_type) else {
        warn!(
            device_id = %api.device_id,
            device_type = %api.device_type,
            "skipping resource with unknown device type"
        );
        return None;
    };

    Some(Device {
        device_id: EntityId::from(api.device_id),
        device_type,
        health: DeviceHealth::from_wire(api.status.health.as_deref()),
        state: DeviceState::from_wire(api.status.state.as_deref()),
        capacity_mib: api.capacity_mib,
        drive_capacity_bytes: api.drive_capacity_bytes,
        cxl_switch_id: api.device_switch_info.filter(|s| !s.is_empty()),
        power_state: api.power_state,
    })
}

/// Convert a list of API resources, dropping unknown device types.
pub fn resources_from_api(api: Vec<ApiResource>) -> Vec<Resource> {
    api.into_iter().filter_map(resource_from_api).collect()
}

impl From<ApiNode> for Node {
    fn from(api: ApiNode) -> Self {
        Self {
            id: EntityId::from(api.id),
            resources: resources_from_api(api.resources),
        }
    }
}

impl From<ApiResourceGroup> for ResourceGroup {
    fn from(api: ApiResourceGroup) -> Self {
        Self {
            id: EntityId::from(api.id),
            name: api.name,
            description: api.description,
            created_at: api.created_at,
            updated_at: api.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api_resource(value: serde_json::Value) -> ApiResource {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn resource_maps_status_and_annotation() {
        let res = resource_from_api(api_resource(json!({
            "device": {
                "deviceID": "mem-1",
                "type": "memory",
                "status": { "state": "Enabled", "health": "Warning" },
                "capacityMiB": 8192,
                "deviceSwitchInfo": "CXL11"
            },
            "nodeIDs": ["node-1"],
            "resourceGroupIDs": ["g-1"],
            "annotation": { "available": true },
            "detected": true
        })))
        .unwrap();

        assert_eq!(res.device.device_type, DeviceType::Memory);
        assert_eq!(res.device.health, DeviceHealth::Warning);
        assert_eq!(res.device.state, DeviceState::Enabled);
        assert_eq!(res.device.capacity_mib, Some(8192));
        assert_eq!(res.device.cxl_switch_id.as_deref(), Some("CXL11"));
        assert_eq!(res.node_ids, vec![EntityId::from("node-1")]);
        assert!(res.available);
    }

    #[test]
    fn empty_switch_info_is_none() {
        let res = resource_from_api(api_resource(json!({
            "device": { "deviceID": "cpu-1", "type": "CPU", "deviceSwitchInfo": "" }
        })))
        .unwrap();
        assert_eq!(res.device.cxl_switch_id, None);
        assert_eq!(res.device.health, DeviceHealth::Unknown);
    }

    #[test]
    fn unknown_device_type_is_skipped() {
        let list = vec![
            api_resource(json!({ "device": { "deviceID": "x", "type": "quantum" } })),
            api_resource(json!({ "device": { "deviceID": "y", "type": "GPU" } })),
        ];
        let resources = resources_from_api(list);
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].id().as_str(), "y");
    }

    #[test]
    fn resource_group_conversion() {
        let api: ApiResourceGroup = serde_json::from_value(json!({
            "id": "g-1",
            "name": "default",
            "createdAt": "2024-01-02T03:04:05Z"
        }))
        .unwrap();
        let group = ResourceGroup::from(api);
        assert_eq!(group.name, "default");
        assert!(group.description.is_empty());
        assert!(group.created_at.is_some());
        assert!(group.updated_at.is_none());
    }
}

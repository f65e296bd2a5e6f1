// ── Resource / device domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::entity_id::EntityId;

/// Hardware category of a device -- wire spelling preserved by `Display`
/// and `FromStr`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum DeviceType {
    #[serde(rename = "CPU")]
    #[strum(serialize = "CPU")]
    Cpu,
    Accelerator,
    #[serde(rename = "DSP")]
    #[strum(serialize = "DSP")]
    Dsp,
    #[serde(rename = "FPGA")]
    #[strum(serialize = "FPGA")]
    Fpga,
    #[serde(rename = "GPU")]
    #[strum(serialize = "GPU")]
    Gpu,
    UnknownProcessor,
    #[serde(rename = "memory")]
    #[strum(serialize = "memory")]
    Memory,
    #[serde(rename = "storage")]
    #[strum(serialize = "storage")]
    Storage,
    #[serde(rename = "networkInterface")]
    #[strum(serialize = "networkInterface")]
    NetworkInterface,
    #[serde(rename = "graphicController")]
    #[strum(serialize = "graphicController")]
    GraphicController,
    #[serde(rename = "virtualMedia")]
    #[strum(serialize = "virtualMedia")]
    VirtualMedia,
}

impl DeviceType {
    pub fn is_processor(self) -> bool {
        matches!(
            self,
            Self::Cpu
                | Self::Accelerator
                | Self::Dsp
                | Self::Fpga
                | Self::Gpu
                | Self::UnknownProcessor
        )
    }

    /// Wire name with the first letter upper-cased (`memory` -> `Memory`).
    /// Used as the per-type key of chart data.
    pub fn capitalized(self) -> String {
        let raw = self.as_ref();
        let mut chars = raw.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// Health rollup reported by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
pub enum DeviceHealth {
    #[serde(rename = "OK")]
    #[strum(serialize = "OK")]
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl DeviceHealth {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("OK") => Self::Ok,
            Some("Warning") => Self::Warning,
            Some("Critical") => Self::Critical,
            _ => Self::Unknown,
        }
    }
}

/// Operational state reported by the backend.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
pub enum DeviceState {
    Enabled,
    Disabled,
    Absent,
    Unknown,
}

impl DeviceState {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("Enabled") => Self::Enabled,
            Some("Disabled") => Self::Disabled,
            Some("Absent") => Self::Absent,
            _ => Self::Unknown,
        }
    }
}

/// Whether a resource is attached to at least one node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
pub enum AllocationStatus {
    Allocated,
    Unallocated,
}

/// Operator annotation: may the resource be used for new compositions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
pub enum Availability {
    Available,
    Unavailable,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, AsRefStr,
)]
pub enum Detection {
    Detected,
    NotDetected,
}

/// Hardware description of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub device_id: EntityId,
    pub device_type: DeviceType,
    pub health: DeviceHealth,
    pub state: DeviceState,
    /// Memory capacity (memory devices only).
    pub capacity_mib: Option<u64>,
    /// Drive capacity (storage devices only).
    pub drive_capacity_bytes: Option<u64>,
    pub cxl_switch_id: Option<String>,
    pub power_state: Option<String>,
}

/// The canonical Resource type: one device plus its attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub device: Device,
    pub node_ids: Vec<EntityId>,
    pub resource_group_ids: Vec<EntityId>,
    pub available: bool,
    pub detected: bool,
}

impl Resource {
    pub fn id(&self) -> &EntityId {
        &self.device.device_id
    }

    pub fn device_type(&self) -> DeviceType {
        self.device.device_type
    }

    pub fn is_allocated(&self) -> bool {
        !self.node_ids.is_empty()
    }

    pub fn allocation(&self) -> AllocationStatus {
        if self.is_allocated() {
            AllocationStatus::Allocated
        } else {
            AllocationStatus::Unallocated
        }
    }

    pub fn availability(&self) -> Availability {
        if self.available {
            Availability::Available
        } else {
            Availability::Unavailable
        }
    }

    pub fn detection(&self) -> Detection {
        if self.detected {
            Detection::Detected
        } else {
            Detection::NotDetected
        }
    }

    /// Build the table row, resolving group ids through `group_name`.
    /// Ids that resolve to `""` are left out.
    pub fn summarize(&self, group_name: impl Fn(&EntityId) -> String) -> ResourceSummary {
        ResourceSummary {
            id: self.id().clone(),
            device_type: self.device.device_type,
            health: self.device.health,
            state: self.device.state,
            cxl_switch_id: self.device.cxl_switch_id.clone().unwrap_or_default(),
            node_ids: self.node_ids.clone(),
            resource_group_names: self
                .resource_group_ids
                .iter()
                .map(group_name)
                .filter(|name| !name.is_empty())
                .collect(),
            allocation: self.allocation(),
            availability: self.availability(),
            detection: self.detection(),
        }
    }
}

/// Flattened, filterable view of a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: EntityId,
    pub device_type: DeviceType,
    pub health: DeviceHealth,
    pub state: DeviceState,
    pub cxl_switch_id: String,
    pub node_ids: Vec<EntityId>,
    pub resource_group_names: Vec<String>,
    pub allocation: AllocationStatus,
    pub availability: Availability,
    pub detection: Detection,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn resource(id: &str, device_type: DeviceType) -> Resource {
        Resource {
            device: Device {
                device_id: EntityId::from(id),
                device_type,
                health: DeviceHealth::Ok,
                state: DeviceState::Enabled,
                capacity_mib: None,
                drive_capacity_bytes: None,
                cxl_switch_id: None,
                power_state: None,
            },
            node_ids: Vec::new(),
            resource_group_ids: Vec::new(),
            available: true,
            detected: true,
        }
    }

    pub(crate) fn attached(mut resource: Resource, node: &str) -> Resource {
        resource.node_ids.push(EntityId::from(node));
        resource
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::{attached, resource};
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn device_type_round_trips_wire_names() {
        for ty in DeviceType::iter() {
            assert_eq!(DeviceType::from_str(&ty.to_string()).unwrap(), ty);
        }
        assert_eq!(DeviceType::from_str("networkInterface").unwrap(), DeviceType::NetworkInterface);
        assert!(DeviceType::from_str("cpu").is_err());
    }

    #[test]
    fn capitalized_labels() {
        assert_eq!(DeviceType::Cpu.capitalized(), "CPU");
        assert_eq!(DeviceType::Memory.capitalized(), "Memory");
        assert_eq!(DeviceType::NetworkInterface.capitalized(), "NetworkInterface");
        assert_eq!(DeviceType::UnknownProcessor.capitalized(), "UnknownProcessor");
    }

    #[test]
    fn processor_flag() {
        assert!(DeviceType::Fpga.is_processor());
        assert!(!DeviceType::Memory.is_processor());
    }

    #[test]
    fn health_and_state_fall_back_to_unknown() {
        assert_eq!(DeviceHealth::from_wire(Some("OK")), DeviceHealth::Ok);
        assert_eq!(DeviceHealth::from_wire(Some("Degraded")), DeviceHealth::Unknown);
        assert_eq!(DeviceState::from_wire(None), DeviceState::Unknown);
    }

    #[test]
    fn derived_statuses() {
        let free = resource("cpu-1", DeviceType::Cpu);
        assert_eq!(free.allocation(), AllocationStatus::Unallocated);
        let used = attached(free, "node-1");
        assert_eq!(used.allocation(), AllocationStatus::Allocated);
        assert_eq!(used.availability(), Availability::Available);
        assert_eq!(used.detection(), Detection::Detected);
    }

    #[test]
    fn summarize_drops_unresolved_groups() {
        let mut res = resource("cpu-1", DeviceType::Cpu);
        res.resource_group_ids = vec![EntityId::from("g-1"), EntityId::from("g-x")];
        let summary = res.summarize(|id| {
            if id.as_str() == "g-1" {
                "default".to_owned()
            } else {
                String::new()
            }
        });
        assert_eq!(summary.resource_group_names, vec!["default"]);
    }
}

// ── Node domain types ──

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::resource::{DeviceType, Resource};

/// A compute node and the resources currently composed into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: EntityId,
    pub resources: Vec<Resource>,
}

/// Per-node counts and capacities shown in the node list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    pub id: EntityId,
    pub cpu: u64,
    pub accelerator: u64,
    pub dsp: u64,
    pub fpga: u64,
    pub gpu: u64,
    pub unknown_processor: u64,
    /// Total memory capacity across memory resources.
    pub memory_mib: u64,
    /// Total drive capacity across storage resources.
    pub storage_bytes: u64,
    pub network_interface: u64,
}

impl Node {
    pub fn count_of(&self, device_type: DeviceType) -> u64 {
        let count = self
            .resources
            .iter()
            .filter(|r| r.device_type() == device_type)
            .count();
        u64::try_from(count).unwrap_or(u64::MAX)
    }

    pub fn summary(&self) -> NodeSummary {
        let sum_of = |ty: DeviceType, field: fn(&Resource) -> Option<u64>| -> u64 {
            self.resources
                .iter()
                .filter(|r| r.device_type() == ty)
                .filter_map(field)
                .sum()
        };

        NodeSummary {
            id: self.id.clone(),
            cpu: self.count_of(DeviceType::Cpu),
            accelerator: self.count_of(DeviceType::Accelerator),
            dsp: self.count_of(DeviceType::Dsp),
            fpga: self.count_of(DeviceType::Fpga),
            gpu: self.count_of(DeviceType::Gpu),
            unknown_processor: self.count_of(DeviceType::UnknownProcessor),
            memory_mib: sum_of(DeviceType::Memory, |r| r.device.capacity_mib),
            storage_bytes: sum_of(DeviceType::Storage, |r| r.device.drive_capacity_bytes),
            network_interface: self.count_of(DeviceType::NetworkInterface),
        }
    }
}

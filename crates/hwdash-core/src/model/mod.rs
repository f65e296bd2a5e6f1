// ── Domain model ──
//
// Canonical inventory types consumed by the filter engines and metric
// parsers. All records are immutable snapshots of one fetch.

pub mod cxl_switch;
pub mod entity_id;
pub mod node;
pub mod resource;
pub mod resource_group;

pub use cxl_switch::{CxlSwitch, cxl_switches};
pub use entity_id::EntityId;
pub use node::{Node, NodeSummary};
pub use resource::{
    AllocationStatus, Availability, Detection, Device, DeviceHealth, DeviceState, DeviceType,
    Resource, ResourceSummary,
};
pub use resource_group::ResourceGroup;

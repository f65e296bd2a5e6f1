// ── CXL switch domain types ──
//
// The backend has no switch endpoint; switches are derived from the
// `deviceSwitchInfo` of each resource.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::entity_id::EntityId;
use super::resource::{DeviceType, Resource};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CxlSwitch {
    pub id: EntityId,
    pub devices: u64,
    pub allocated_devices: u64,
    pub unallocated_devices: u64,
    pub device_types: Vec<DeviceType>,
}

/// Group resources by CXL switch, ordered by switch id.
///
/// Resources without a switch id (or with an empty one) are not attached to
/// any switch and are skipped.
pub fn cxl_switches(resources: &[Resource]) -> Vec<CxlSwitch> {
    let mut by_switch: BTreeMap<&str, (CxlSwitch, BTreeSet<DeviceType>)> = BTreeMap::new();

    for resource in resources {
        let Some(switch_id) = resource
            .device
            .cxl_switch_id
            .as_deref()
            .filter(|id| !id.is_empty())
        else {
            continue;
        };

        let (entry, types) = by_switch.entry(switch_id).or_insert_with(|| {
            (
                CxlSwitch {
                    id: EntityId::from(switch_id),
                    ..CxlSwitch::default()
                },
                BTreeSet::new(),
            )
        });
        entry.devices += 1;
        if resource.is_allocated() {
            entry.allocated_devices += 1;
        } else {
            entry.unallocated_devices += 1;
        }
        types.insert(resource.device_type());
    }

    by_switch
        .into_values()
        .map(|(mut switch, types)| {
            switch.device_types = types.into_iter().collect();
            switch
        })
        .collect()
}

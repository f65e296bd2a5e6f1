// ── Resource list filter ──

use serde::{Deserialize, Serialize};

use super::predicate::{categorical_match, is_all_string_included};
use super::{FieldKind, FilterSchema, ListFilter, SelectOptions, enum_options};
use crate::model::{
    AllocationStatus, Availability, Detection, DeviceHealth, DeviceState, DeviceType, EntityId,
    ResourceSummary,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceField {
    Id,
    DeviceType,
    Health,
    State,
    CxlSwitch,
    Node,
    Group,
    Allocation,
    Availability,
    Detection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
    pub id: String,
    pub device_type: Vec<DeviceType>,
    pub health: Vec<DeviceHealth>,
    pub state: Vec<DeviceState>,
    pub cxl_switch: String,
    /// Matched against all attached node ids.
    pub node: String,
    /// Matched against all resolved group names.
    pub group: String,
    pub allocation: Vec<AllocationStatus>,
    pub availability: Vec<Availability>,
    pub detection: Vec<Detection>,
}

pub struct ResourceFilter;

pub type ResourceListFilter = ListFilter<ResourceFilter>;

impl FilterSchema for ResourceFilter {
    type Record = ResourceSummary;
    type Query = ResourceQuery;
    type Field = ResourceField;

    const NAME: &'static str = "resources";

    fn kind(field: ResourceField) -> FieldKind {
        match field {
            ResourceField::Id
            | ResourceField::CxlSwitch
            | ResourceField::Node
            | ResourceField::Group => FieldKind::Text,
            ResourceField::DeviceType
            | ResourceField::Health
            | ResourceField::State
            | ResourceField::Allocation
            | ResourceField::Availability
            | ResourceField::Detection => FieldKind::Categorical,
        }
    }

    fn matches(q: &ResourceQuery, res: &ResourceSummary) -> bool {
        is_all_string_included(res.id.as_str(), &q.id)
            && categorical_match(&res.device_type, &q.device_type)
            && categorical_match(&res.health, &q.health)
            && categorical_match(&res.state, &q.state)
            && is_all_string_included(&res.cxl_switch_id, &q.cxl_switch)
            && (q.node.is_empty() || is_all_string_included(&joined(&res.node_ids), &q.node))
            && (q.group.is_empty()
                || is_all_string_included(&res.resource_group_names.join(" "), &q.group))
            && categorical_match(&res.allocation, &q.allocation)
            && categorical_match(&res.availability, &q.availability)
            && categorical_match(&res.detection, &q.detection)
    }

    fn select_options() -> SelectOptions<ResourceField> {
        SelectOptions::new()
            .with(
                ResourceField::DeviceType,
                enum_options::<DeviceType>(|t| t.capitalized()),
            )
            .with(ResourceField::Health, enum_options::<DeviceHealth>(ToString::to_string))
            .with(ResourceField::State, enum_options::<DeviceState>(ToString::to_string))
            .with(
                ResourceField::Allocation,
                enum_options::<AllocationStatus>(ToString::to_string),
            )
            .with(
                ResourceField::Availability,
                enum_options::<Availability>(ToString::to_string),
            )
            .with(
                ResourceField::Detection,
                enum_options::<Detection>(|d| match d {
                    Detection::Detected => "Detected".to_owned(),
                    Detection::NotDetected => "Not Detected".to_owned(),
                }),
            )
    }
}

fn joined(ids: &[EntityId]) -> String {
    ids.iter()
        .map(EntityId::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ListFilter<ResourceFilter> {
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.update(ResourceField::Id, move |q| q.id.clone_from(&id));
    }

    pub fn set_device_type(&mut self, selected: Vec<DeviceType>) {
        self.update(ResourceField::DeviceType, move |q| {
            q.device_type.clone_from(&selected);
        });
    }

    pub fn set_health(&mut self, selected: Vec<DeviceHealth>) {
        self.update(ResourceField::Health, move |q| q.health.clone_from(&selected));
    }

    pub fn set_state(&mut self, selected: Vec<DeviceState>) {
        self.update(ResourceField::State, move |q| q.state.clone_from(&selected));
    }

    pub fn set_cxl_switch(&mut self, switch: impl Into<String>) {
        let switch = switch.into();
        self.update(ResourceField::CxlSwitch, move |q| {
            q.cxl_switch.clone_from(&switch);
        });
    }

    pub fn set_node(&mut self, node: impl Into<String>) {
        let node = node.into();
        self.update(ResourceField::Node, move |q| q.node.clone_from(&node));
    }

    pub fn set_group(&mut self, group: impl Into<String>) {
        let group = group.into();
        self.update(ResourceField::Group, move |q| q.group.clone_from(&group));
    }

    pub fn set_allocation(&mut self, selected: Vec<AllocationStatus>) {
        self.update(ResourceField::Allocation, move |q| {
            q.allocation.clone_from(&selected);
        });
    }

    pub fn set_availability(&mut self, selected: Vec<Availability>) {
        self.update(ResourceField::Availability, move |q| {
            q.availability.clone_from(&selected);
        });
    }

    pub fn set_detection(&mut self, selected: Vec<Detection>) {
        self.update(ResourceField::Detection, move |q| {
            q.detection.clone_from(&selected);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DebounceTiming, records_from};
    use crate::model::resource::fixtures::{attached, resource};
    use crate::model::Resource;

    fn summary(res: &Resource) -> ResourceSummary {
        res.summarize(|id| match id.as_str() {
            "g-1" => "default".to_owned(),
            "g-2" => "gpu-pool".to_owned(),
            _ => String::new(),
        })
    }

    fn rows() -> Vec<ResourceSummary> {
        let mut gpu = attached(resource("gpu-1", DeviceType::Gpu), "node-7");
        gpu.resource_group_ids = vec![EntityId::from("g-2")];
        gpu.device.cxl_switch_id = Some("CXL11".to_owned());

        let mut mem = resource("mem-1", DeviceType::Memory);
        mem.resource_group_ids = vec![EntityId::from("g-1")];
        mem.device.health = DeviceHealth::Critical;
        mem.detected = false;

        let cpu = attached(attached(resource("cpu-1", DeviceType::Cpu), "node-1"), "node-2");

        [gpu, mem, cpu].iter().map(summary).collect()
    }

    fn ids(filter: &mut ResourceListFilter) -> Vec<String> {
        filter.filtered().iter().map(|r| r.id.to_string()).collect()
    }

    #[test]
    fn categorical_fields_apply_immediately() {
        let mut filter = ResourceListFilter::new(records_from(rows()), DebounceTiming::default());
        filter.set_device_type(vec![DeviceType::Memory, DeviceType::Cpu]);
        assert_eq!(ids(&mut filter), vec!["mem-1", "cpu-1"]);

        filter.set_allocation(vec![AllocationStatus::Unallocated]);
        assert_eq!(ids(&mut filter), vec!["mem-1"]);
    }

    #[test]
    fn node_text_matches_any_attached_node() {
        let mut filter = ResourceListFilter::new(records_from(rows()), DebounceTiming::immediate());
        filter.set_node("node-2");
        assert_eq!(ids(&mut filter), vec!["cpu-1"]);

        filter.set_node("node");
        assert_eq!(ids(&mut filter), vec!["gpu-1", "cpu-1"]);
    }

    #[test]
    fn group_text_matches_resolved_names() {
        let mut filter = ResourceListFilter::new(records_from(rows()), DebounceTiming::immediate());
        filter.set_group("default");
        assert_eq!(ids(&mut filter), vec!["mem-1"]);
    }

    #[test]
    fn status_and_switch_fields() {
        let mut filter = ResourceListFilter::new(records_from(rows()), DebounceTiming::immediate());
        filter.set_health(vec![DeviceHealth::Critical]);
        filter.set_detection(vec![Detection::NotDetected]);
        assert_eq!(ids(&mut filter), vec!["mem-1"]);

        let mut filter = ResourceListFilter::new(records_from(rows()), DebounceTiming::immediate());
        filter.set_cxl_switch("cxl11");
        filter.set_availability(vec![Availability::Available]);
        filter.set_state(vec![DeviceState::Enabled]);
        assert_eq!(ids(&mut filter), vec!["gpu-1"]);
    }

    #[test]
    fn health_options_use_wire_values() {
        let options = ResourceFilter::select_options();
        let health: Vec<_> = options
            .get(ResourceField::Health)
            .iter()
            .map(|o| o.value.as_str())
            .collect();
        assert_eq!(health, vec!["OK", "Warning", "Critical", "Unknown"]);
        assert_eq!(options.get(ResourceField::Detection)[1].label, "Not Detected");
    }
}

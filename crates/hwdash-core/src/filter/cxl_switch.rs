// ── CXL switch list filter ──

use serde::{Deserialize, Serialize};

use super::predicate::{NumericBucket, is_all_string_included, numeric_bucket_match};
use super::{FieldKind, FilterSchema, ListFilter, SelectOptions, enum_options, numeric_options};
use crate::model::{CxlSwitch, DeviceType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CxlSwitchField {
    Id,
    Allocated,
    Unallocated,
    DeviceType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CxlSwitchQuery {
    pub id: String,
    pub allocated: Vec<NumericBucket>,
    pub unallocated: Vec<NumericBucket>,
    /// Matches switches carrying any of the selected types.
    pub device_type: Vec<DeviceType>,
}

pub struct CxlSwitchFilter;

pub type CxlSwitchListFilter = ListFilter<CxlSwitchFilter>;

impl FilterSchema for CxlSwitchFilter {
    type Record = CxlSwitch;
    type Query = CxlSwitchQuery;
    type Field = CxlSwitchField;

    const NAME: &'static str = "cxl_switches";

    fn kind(field: CxlSwitchField) -> FieldKind {
        match field {
            CxlSwitchField::Id => FieldKind::Text,
            CxlSwitchField::Allocated | CxlSwitchField::Unallocated => FieldKind::Numeric,
            CxlSwitchField::DeviceType => FieldKind::Categorical,
        }
    }

    fn matches(q: &CxlSwitchQuery, switch: &CxlSwitch) -> bool {
        is_all_string_included(switch.id.as_str(), &q.id)
            && numeric_bucket_match(switch.allocated_devices, &q.allocated)
            && numeric_bucket_match(switch.unallocated_devices, &q.unallocated)
            && (q.device_type.is_empty()
                || switch.device_types.iter().any(|t| q.device_type.contains(t)))
    }

    fn select_options() -> SelectOptions<CxlSwitchField> {
        SelectOptions::new()
            .with(CxlSwitchField::Allocated, numeric_options())
            .with(CxlSwitchField::Unallocated, numeric_options())
            .with(
                CxlSwitchField::DeviceType,
                enum_options::<DeviceType>(|t| t.capitalized()),
            )
    }
}

impl ListFilter<CxlSwitchFilter> {
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.update(CxlSwitchField::Id, move |q| q.id.clone_from(&id));
    }

    pub fn set_allocated(&mut self, selected: Vec<NumericBucket>) {
        self.update(CxlSwitchField::Allocated, move |q| {
            q.allocated.clone_from(&selected);
        });
    }

    pub fn set_unallocated(&mut self, selected: Vec<NumericBucket>) {
        self.update(CxlSwitchField::Unallocated, move |q| {
            q.unallocated.clone_from(&selected);
        });
    }

    pub fn set_device_type(&mut self, selected: Vec<DeviceType>) {
        self.update(CxlSwitchField::DeviceType, move |q| {
            q.device_type.clone_from(&selected);
        });
    }
}

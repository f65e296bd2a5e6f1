// ── Resource group list filter ──

use serde::{Deserialize, Serialize};

use super::predicate::{DateRange, is_all_string_included, is_date_in_range};
use super::{FieldKind, FilterSchema, ListFilter, SelectOptions};
use crate::model::ResourceGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceGroupField {
    Id,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceGroupQuery {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateRange,
    pub updated_at: DateRange,
}

pub struct ResourceGroupFilter;

pub type ResourceGroupListFilter = ListFilter<ResourceGroupFilter>;

impl FilterSchema for ResourceGroupFilter {
    type Record = ResourceGroup;
    type Query = ResourceGroupQuery;
    type Field = ResourceGroupField;

    const NAME: &'static str = "resource_groups";

    fn kind(field: ResourceGroupField) -> FieldKind {
        match field {
            ResourceGroupField::Id | ResourceGroupField::Name | ResourceGroupField::Description => {
                FieldKind::Text
            }
            ResourceGroupField::CreatedAt | ResourceGroupField::UpdatedAt => FieldKind::DateRange,
        }
    }

    fn matches(q: &ResourceGroupQuery, group: &ResourceGroup) -> bool {
        is_all_string_included(group.id.as_str(), &q.id)
            && is_all_string_included(&group.name, &q.name)
            && is_all_string_included(&group.description, &q.description)
            && is_date_in_range(group.created_at, &q.created_at)
            && is_date_in_range(group.updated_at, &q.updated_at)
    }

    fn select_options() -> SelectOptions<ResourceGroupField> {
        SelectOptions::new()
    }
}

impl ListFilter<ResourceGroupFilter> {
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.update(ResourceGroupField::Id, move |q| q.id.clone_from(&id));
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.update(ResourceGroupField::Name, move |q| q.name.clone_from(&name));
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        let description = description.into();
        self.update(ResourceGroupField::Description, move |q| {
            q.description.clone_from(&description);
        });
    }

    pub fn set_created_at(&mut self, range: DateRange) {
        self.update(ResourceGroupField::CreatedAt, move |q| q.created_at = range);
    }

    pub fn set_updated_at(&mut self, range: DateRange) {
        self.update(ResourceGroupField::UpdatedAt, move |q| q.updated_at = range);
    }
}

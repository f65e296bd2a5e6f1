// ── Node list filter ──

use serde::{Deserialize, Serialize};

use super::predicate::{NumericBucket, is_all_string_included, numeric_bucket_match};
use super::{FieldKind, FilterSchema, ListFilter, SelectOptions, numeric_options};
use crate::model::NodeSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeField {
    Id,
    Cpu,
    Accelerator,
    Dsp,
    Fpga,
    Gpu,
    UnknownProcessor,
    Memory,
    Storage,
    NetworkInterface,
}

/// Query over the node list. Every numeric column filters as a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeQuery {
    pub id: String,
    pub cpu: Vec<NumericBucket>,
    pub accelerator: Vec<NumericBucket>,
    pub dsp: Vec<NumericBucket>,
    pub fpga: Vec<NumericBucket>,
    pub gpu: Vec<NumericBucket>,
    pub unknown_processor: Vec<NumericBucket>,
    pub memory: Vec<NumericBucket>,
    pub storage: Vec<NumericBucket>,
    pub network_interface: Vec<NumericBucket>,
}

pub struct NodeFilter;

pub type NodeListFilter = ListFilter<NodeFilter>;

impl FilterSchema for NodeFilter {
    type Record = NodeSummary;
    type Query = NodeQuery;
    type Field = NodeField;

    const NAME: &'static str = "nodes";

    fn kind(field: NodeField) -> FieldKind {
        match field {
            NodeField::Id => FieldKind::Text,
            _ => FieldKind::Numeric,
        }
    }

    fn matches(q: &NodeQuery, node: &NodeSummary) -> bool {
        is_all_string_included(node.id.as_str(), &q.id)
            && numeric_bucket_match(node.cpu, &q.cpu)
            && numeric_bucket_match(node.accelerator, &q.accelerator)
            && numeric_bucket_match(node.dsp, &q.dsp)
            && numeric_bucket_match(node.fpga, &q.fpga)
            && numeric_bucket_match(node.gpu, &q.gpu)
            && numeric_bucket_match(node.unknown_processor, &q.unknown_processor)
            && numeric_bucket_match(node.memory_mib, &q.memory)
            && numeric_bucket_match(node.storage_bytes, &q.storage)
            && numeric_bucket_match(node.network_interface, &q.network_interface)
    }

    fn select_options() -> SelectOptions<NodeField> {
        [
            NodeField::Cpu,
            NodeField::Accelerator,
            NodeField::Dsp,
            NodeField::Fpga,
            NodeField::Gpu,
            NodeField::UnknownProcessor,
            NodeField::Memory,
            NodeField::Storage,
            NodeField::NetworkInterface,
        ]
        .into_iter()
        .fold(SelectOptions::new(), |options, field| {
            options.with(field, numeric_options())
        })
    }
}

impl ListFilter<NodeFilter> {
    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.update(NodeField::Id, move |q| q.id.clone_from(&id));
    }

    pub fn set_cpu(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Cpu, selected, |q| &mut q.cpu);
    }

    pub fn set_accelerator(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Accelerator, selected, |q| &mut q.accelerator);
    }

    pub fn set_dsp(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Dsp, selected, |q| &mut q.dsp);
    }

    pub fn set_fpga(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Fpga, selected, |q| &mut q.fpga);
    }

    pub fn set_gpu(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Gpu, selected, |q| &mut q.gpu);
    }

    pub fn set_unknown_processor(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::UnknownProcessor, selected, |q| {
            &mut q.unknown_processor
        });
    }

    pub fn set_memory(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Memory, selected, |q| &mut q.memory);
    }

    pub fn set_storage(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::Storage, selected, |q| &mut q.storage);
    }

    pub fn set_network_interface(&mut self, selected: Vec<NumericBucket>) {
        self.set_buckets(NodeField::NetworkInterface, selected, |q| {
            &mut q.network_interface
        });
    }

    fn set_buckets(
        &mut self,
        field: NodeField,
        selected: Vec<NumericBucket>,
        slot: fn(&mut NodeQuery) -> &mut Vec<NumericBucket>,
    ) {
        self.update(field, move |q| slot(q).clone_from(&selected));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{DebounceTiming, records_from};
    use crate::model::EntityId;

    fn row(id: &str) -> NodeSummary {
        NodeSummary {
            id: EntityId::from(id),
            ..NodeSummary::default()
        }
    }

    #[test]
    fn missing_counts_match_not_exist() {
        let q = NodeQuery {
            gpu: vec![NumericBucket::NotExist],
            ..NodeQuery::default()
        };
        assert!(NodeFilter::matches(&q, &row("node-1")));
    }

    #[test]
    fn fields_combine_with_and() {
        let mut gpu_node = row("node-gpu");
        gpu_node.gpu = 2;
        gpu_node.memory_mib = 4096;
        let records = records_from(vec![row("node-a"), gpu_node]);
        let mut filter = NodeListFilter::new(records, DebounceTiming::immediate());

        filter.set_gpu(vec![NumericBucket::Exist]);
        filter.set_memory(vec![NumericBucket::Exist]);
        filter.set_id("gpu");
        assert_eq!(filter.filtered().len(), 1);

        filter.set_id("node-a");
        assert!(filter.filtered().is_empty());
    }

    #[test]
    fn every_numeric_field_offers_both_buckets() {
        let options = NodeFilter::select_options();
        assert_eq!(options.iter().count(), 9);
        let cpu = options.get(NodeField::Cpu);
        assert_eq!(cpu[0].value, "notExist");
        assert_eq!(cpu[0].label, "equal 0");
        assert_eq!(cpu[1].value, "exist");
        assert_eq!(cpu[1].label, "1 or more");
        assert!(options.get(NodeField::Id).is_empty());
    }
}

// ── Derived data ──
//
// Thin derivations over fetch results: group-name lookup, tab selection,
// and the metrics queries whose responses feed `crate::metrics`.

mod graph_query;
mod resource_groups;
mod tab;

pub use graph_query::{
    GraphQuery, build_graph_query, graph_step, histogram_query, storage_usage_query,
};
pub use resource_groups::{ResourceGroupIndex, ResourceGroupLookup};
pub use tab::tab_from_query;

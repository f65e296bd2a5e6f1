// ── Metric parsers ──
//
// Pure functions from metrics-backend responses to chart-shaped data.
// Absent input yields `None`; series that cannot be used are dropped.

mod graph;
mod histogram;
mod series;
mod storage;

pub use graph::{GraphPoint, GraphUnit, GraphViewData, ThroughputUnit, parse_graph_data};
pub use histogram::{
    HISTOGRAM_BUCKETS, HistogramBucket, HistogramViewData, bucket_index, parse_histogram_data,
};
pub use series::{DecodeError, DecodedSeries, parse_metric_series};
pub use storage::{StorageGraphViewData, parse_storage_graph_data};

/// Label names and `data_label` values shared with the query builders.
pub mod labels {
    pub const NAME: &str = "__name__";
    pub const JOB: &str = "job";
    pub const DATA_LABEL: &str = "data_label";

    pub const USAGE: &str = "usage";
    pub const ENERGY: &str = "energy";
    pub const TRANSMIT: &str = "transmit";
    pub const RECEIVE: &str = "receive";
    pub const STORAGE_USED: &str = "storageUsed";
}

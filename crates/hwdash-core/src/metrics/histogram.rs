// ── Usage histogram ──

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use hwdash_api::models::MetricsResponse;

use super::series::parse_metric_series;
use crate::model::{DeviceType, Resource};

/// Bucket labels, in display order.
pub const HISTOGRAM_BUCKETS: [&str; 7] = [
    "0%", "1 - 19%", "20 - 39%", "40 - 59%", "60 - 79%", "80 - 99%", "100%",
];

/// Lower bounds of buckets 2 through 6.
const BUCKET_FLOORS: [f64; 5] = [20.0, 40.0, 60.0, 80.0, 100.0];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramBucket {
    pub label: &'static str,
    /// Count per capitalised device type, in requested order.
    pub counts: IndexMap<String, u64>,
}

/// All seven buckets, always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramViewData {
    pub buckets: Vec<HistogramBucket>,
}

impl HistogramViewData {
    fn empty(types: &[DeviceType]) -> Self {
        let counts: IndexMap<String, u64> = types.iter().map(|t| (t.capitalized(), 0)).collect();
        Self {
            buckets: HISTOGRAM_BUCKETS
                .iter()
                .map(|&label| HistogramBucket {
                    label,
                    counts: counts.clone(),
                })
                .collect(),
        }
    }

    pub fn bucket(&self, label: &str) -> Option<&HistogramBucket> {
        self.buckets.iter().find(|b| b.label == label)
    }

    /// Count for `device_type` in the bucket labelled `label`, `0` if absent.
    pub fn count(&self, label: &str, device_type: DeviceType) -> u64 {
        self.bucket(label)
            .and_then(|b| b.counts.get(&device_type.capitalized()).copied())
            .unwrap_or(0)
    }
}

/// Index into `HISTOGRAM_BUCKETS`: `0` for zero usage, otherwise
/// `min(floor(usage / 20) + 1, 6)`.
pub fn bucket_index(usage: f64) -> usize {
    if usage <= 0.0 {
        return 0;
    }
    1 + BUCKET_FLOORS.iter().take_while(|floor| usage >= **floor).count()
}

/// Bucket the instant usage of every device of the requested `types`.
///
/// Memory series are normalised to `used / (capacity_mib * 1024) * 100`
/// using the resource whose id equals the series `job`. Memory series
/// without such a resource (or with zero capacity) are skipped, as are
/// undecodable and non-finite samples. Returns `None` for an absent response
/// and when no series was counted.
pub fn parse_histogram_data(
    response: Option<&MetricsResponse>,
    types: &[DeviceType],
    resources: &[Resource],
) -> Option<HistogramViewData> {
    let response = response?;
    let mut histogram = HistogramViewData::empty(types);

    let memory_capacity: HashMap<&str, u64> = resources
        .iter()
        .filter(|r| r.device_type() == DeviceType::Memory)
        .filter_map(|r| Some((r.id().as_str(), r.device.capacity_mib?)))
        .collect();

    let mut counted = 0_usize;
    for series in &response.data.result {
        let decoded = match parse_metric_series(series) {
            Ok(decoded) => decoded,
            Err(e) => {
                trace!(error = %e, "skipping undecodable series");
                continue;
            }
        };
        if !types.contains(&decoded.device_type) {
            continue;
        }

        let usage = if decoded.device_type == DeviceType::Memory {
            let capacity = decoded
                .device_id
                .as_ref()
                .and_then(|id| memory_capacity.get(id.as_str()).copied())
                .filter(|capacity| *capacity > 0);
            let Some(capacity) = capacity else {
                trace!(job = ?decoded.device_id, "no memory capacity for series, skipping");
                continue;
            };
            memory_usage_percent(decoded.value, capacity)
        } else {
            decoded.value
        };
        if !usage.is_finite() {
            trace!(job = ?decoded.device_id, usage, "non-finite usage, skipping");
            continue;
        }

        let label = decoded.device_type.capitalized();
        if let Some(count) = histogram
            .buckets
            .get_mut(bucket_index(usage))
            .and_then(|bucket| bucket.counts.get_mut(&label))
        {
            *count += 1;
            counted += 1;
        }
    }

    (counted > 0).then_some(histogram)
}

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn memory_usage_percent(used: f64, capacity_mib: u64) -> f64 {
    used / (capacity_mib as f64 * 1024.0) * 100.0
}

// ── Storage usage decomposition ──

use serde::Serialize;

use hwdash_api::models::MetricsResponse;

use super::labels;
use crate::model::{DeviceType, Resource};

/// Storage figures in bytes. Each field is `None` only when its own source
/// is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StorageGraphViewData {
    /// Bytes used, from the `storageUsed` series.
    pub used: Option<f64>,
    /// Drive capacity of storage resources attached to a node.
    pub allocated: Option<u64>,
    /// Drive capacity of every storage resource.
    pub overall: Option<u64>,
}

pub fn parse_storage_graph_data(
    resources: Option<&[Resource]>,
    response: Option<&MetricsResponse>,
) -> StorageGraphViewData {
    let used = response.and_then(|resp| {
        resp.data
            .result
            .iter()
            .find(|s| s.label(labels::DATA_LABEL) == Some(labels::STORAGE_USED))
            .and_then(|s| s.value.as_ref())
            .and_then(hwdash_api::models::Sample::value)
            .filter(|v| v.is_finite())
    });

    let (allocated, overall) = match resources {
        Some(resources) => {
            let (allocated, overall) = resources
                .iter()
                .filter(|r| r.device_type() == DeviceType::Storage)
                .fold((0_u64, 0_u64), |(allocated, overall), r| {
                    let bytes = r.device.drive_capacity_bytes.unwrap_or(0);
                    let allocated = if r.is_allocated() {
                        allocated.saturating_add(bytes)
                    } else {
                        allocated
                    };
                    (allocated, overall.saturating_add(bytes))
                });
            (Some(allocated), Some(overall))
        }
        None => (None, None),
    };

    StorageGraphViewData {
        used,
        allocated,
        overall,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::series::fixtures::{instant, response};
    use crate::model::resource::fixtures::{attached, resource};
    use pretty_assertions::assert_eq;

    const DRIVE: u64 = 4_398_046_511_104;

    fn volume(id: &str, bytes: u64) -> Resource {
        let mut res = resource(id, DeviceType::Storage);
        res.device.drive_capacity_bytes = Some(bytes);
        res
    }

    fn used_response() -> MetricsResponse {
        response(vec![instant(&[("data_label", "storageUsed")], "10000000")])
    }

    #[test]
    fn decomposition_example() {
        let resources = vec![attached(volume("disk-1", DRIVE), "node-1")];
        let resp = used_response();

        assert_eq!(
            parse_storage_graph_data(Some(resources.as_slice()), Some(&resp)),
            StorageGraphViewData {
                used: Some(10_000_000.0),
                allocated: Some(DRIVE),
                overall: Some(DRIVE),
            }
        );
        assert_eq!(
            parse_storage_graph_data(Some(resources.as_slice()), None),
            StorageGraphViewData {
                used: None,
                allocated: Some(DRIVE),
                overall: Some(DRIVE),
            }
        );
        assert_eq!(
            parse_storage_graph_data(None, Some(&resp)),
            StorageGraphViewData {
                used: Some(10_000_000.0),
                allocated: None,
                overall: None,
            }
        );
    }

    #[test]
    fn no_volume_info_is_zero_not_none() {
        let resources = vec![
            attached(resource("cpu-1", DeviceType::Cpu), "node-1"),
            volume("disk-free", 0),
        ];
        let data = parse_storage_graph_data(Some(resources.as_slice()), None);
        assert_eq!(data.allocated, Some(0));
        assert_eq!(data.overall, Some(0));

        let data = parse_storage_graph_data(Some(&[][..]), None);
        assert_eq!(data.allocated, Some(0));
        assert_eq!(data.overall, Some(0));
    }

    #[test]
    fn unattached_volumes_count_toward_overall_only() {
        let resources = vec![
            attached(volume("disk-1", 1_000), "node-1"),
            volume("disk-2", 500),
        ];
        let data = parse_storage_graph_data(Some(resources.as_slice()), None);
        assert_eq!(data.allocated, Some(1_000));
        assert_eq!(data.overall, Some(1_500));
    }

    #[test]
    fn used_requires_the_labelled_series() {
        let resp = response(vec![instant(&[("data_label", "somethingElse")], "5")]);
        assert_eq!(parse_storage_graph_data(None, Some(&resp)).used, None);
    }
}

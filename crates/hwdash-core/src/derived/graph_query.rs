// ── Metrics query builders ──
//
// Every expression tags its series with a `data_label` so the parsers can
// tell them apart after arithmetic drops `__name__`.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

use crate::metrics::labels;
use crate::model::{Device, DeviceType};

/// A range query ready for `MetricsClient::query_range`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphQuery {
    pub query: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: Duration,
}

/// `max(ceil(window / 300), 15)` seconds.
pub fn graph_step(window: Duration) -> Duration {
    Duration::from_secs(window.as_secs().div_ceil(300).max(15))
}

fn tagged(expr: &str, role: &str) -> String {
    format!(
        "label_replace({expr}, \"{data_label}\", \"{role}\", \"\", \"\")",
        data_label = labels::DATA_LABEL
    )
}

/// Usage and energy graph query for one device over `window` ending at `end`.
pub fn build_graph_query(device: &Device, window: Duration, end: DateTime<Utc>) -> GraphQuery {
    let job = device.device_id.as_str();
    let step = graph_step(window);
    let ty = device.device_type;

    let mut parts = match ty {
        DeviceType::Memory => vec![tagged(
            &format!(
                "memory_usedMemory{{job=\"{job}\"}} / ({} * 1024) * 100",
                device.capacity_mib.unwrap_or(0)
            ),
            labels::USAGE,
        )],
        DeviceType::Storage => vec![tagged(
            &format!(
                "storage_amountUsedDisk{{job=\"{job}\"}} / {} * 100",
                device.drive_capacity_bytes.unwrap_or(0)
            ),
            labels::USAGE,
        )],
        DeviceType::NetworkInterface => vec![
            tagged(
                &format!(
                    "rate(networkInterface_networkTransmitAmount{{job=\"{job}\"}}[{}s])",
                    step.as_secs()
                ),
                labels::TRANSMIT,
            ),
            tagged(
                &format!(
                    "rate(networkInterface_networkReceiveAmount{{job=\"{job}\"}}[{}s])",
                    step.as_secs()
                ),
                labels::RECEIVE,
            ),
        ],
        _ => vec![tagged(&format!("{ty}_usageRate{{job=\"{job}\"}}"), labels::USAGE)],
    };
    parts.push(tagged(
        &format!("{ty}_energyConsumption{{job=\"{job}\"}}"),
        labels::ENERGY,
    ));

    let start = TimeDelta::from_std(window)
        .ok()
        .and_then(|delta| end.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    GraphQuery {
        query: parts.join(" or "),
        start,
        end,
        step,
    }
}

/// Instant query behind the usage histogram, one selector per type.
pub fn histogram_query(types: &[DeviceType]) -> String {
    types
        .iter()
        .map(|ty| match ty {
            DeviceType::Memory => "memory_usedMemory".to_owned(),
            other => format!("{other}_usageRate"),
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

/// Instant query for total used storage, tagged `storageUsed`.
pub fn storage_usage_query() -> String {
    tagged("sum(storage_amountUsedDisk)", labels::STORAGE_USED)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::resource::fixtures::resource;
    use chrono::TimeZone;

    fn end() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn step_has_a_floor_and_scales_with_window() {
        assert_eq!(graph_step(Duration::from_secs(3600)), Duration::from_secs(15));
        assert_eq!(graph_step(Duration::from_secs(86_400)), Duration::from_secs(288));
        assert_eq!(graph_step(Duration::from_secs(4_501)), Duration::from_secs(16));
    }

    #[test]
    fn processor_query() {
        let device = resource("gpu-1", DeviceType::Gpu).device;
        let q = build_graph_query(&device, Duration::from_secs(3600), end());

        assert_eq!(
            q.query,
            "label_replace(GPU_usageRate{job=\"gpu-1\"}, \"data_label\", \"usage\", \"\", \"\") or \
             label_replace(GPU_energyConsumption{job=\"gpu-1\"}, \"data_label\", \"energy\", \
             \"\", \"\")"
        );
        assert_eq!(q.end - q.start, TimeDelta::hours(1));
        assert_eq!(q.step, Duration::from_secs(15));
    }

    #[test]
    fn memory_query_uses_capacity() {
        let mut device = resource("mem-1", DeviceType::Memory).device;
        device.capacity_mib = Some(8192);
        let q = build_graph_query(&device, Duration::from_secs(3600), end());
        assert!(q.query.starts_with(
            "label_replace(memory_usedMemory{job=\"mem-1\"} / (8192 * 1024) * 100, \
             \"data_label\", \"usage\""
        ));
        assert!(q.query.contains("memory_energyConsumption{job=\"mem-1\"}"));
    }

    #[test]
    fn storage_query_uses_drive_capacity() {
        let mut device = resource("disk-1", DeviceType::Storage).device;
        device.drive_capacity_bytes = Some(1_000);
        let q = build_graph_query(&device, Duration::from_secs(3600), end());
        assert!(q.query.contains("storage_amountUsedDisk{job=\"disk-1\"} / 1000 * 100"));
    }

    #[test]
    fn network_query_rates_over_step() {
        let device = resource("nic-1", DeviceType::NetworkInterface).device;
        let q = build_graph_query(&device, Duration::from_secs(86_400), end());
        assert!(q.query.contains(
            "rate(networkInterface_networkTransmitAmount{job=\"nic-1\"}[288s]), \
             \"data_label\", \"transmit\""
        ));
        assert!(q.query.contains(
            "rate(networkInterface_networkReceiveAmount{job=\"nic-1\"}[288s]), \
             \"data_label\", \"receive\""
        ));
        assert_eq!(q.query.matches(" or ").count(), 2);
    }

    #[test]
    fn histogram_and_storage_queries() {
        assert_eq!(
            histogram_query(&[DeviceType::Cpu, DeviceType::Memory]),
            "CPU_usageRate or memory_usedMemory"
        );
        assert_eq!(
            storage_usage_query(),
            "label_replace(sum(storage_amountUsedDisk), \"data_label\", \"storageUsed\", \
             \"\", \"\")"
        );
    }
}

// ── Time-series graph data ──

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::trace;

use hwdash_api::models::MetricsResponse;

use super::labels;
use crate::model::DeviceType;

/// Decimal throughput units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
pub enum ThroughputUnit {
    #[strum(serialize = "B/s")]
    BytesPerSecond,
    #[strum(serialize = "KB/s")]
    KilobytesPerSecond,
    #[strum(serialize = "MB/s")]
    MegabytesPerSecond,
    #[strum(serialize = "GB/s")]
    GigabytesPerSecond,
}

impl ThroughputUnit {
    const ALL: [Self; 4] = [
        Self::GigabytesPerSecond,
        Self::MegabytesPerSecond,
        Self::KilobytesPerSecond,
        Self::BytesPerSecond,
    ];

    pub fn divisor(self) -> f64 {
        match self {
            Self::BytesPerSecond => 1.0,
            Self::KilobytesPerSecond => 1e3,
            Self::MegabytesPerSecond => 1e6,
            Self::GigabytesPerSecond => 1e9,
        }
    }

    /// Largest unit that keeps `peak` at or above 1.
    pub fn for_peak(peak: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|unit| peak / unit.divisor() >= 1.0)
            .unwrap_or(Self::BytesPerSecond)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GraphUnit {
    Percent,
    Throughput(ThroughputUnit),
}

impl std::fmt::Display for GraphUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percent => f.write_str("%"),
            Self::Throughput(unit) => unit.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphPoint {
    /// Unix seconds.
    pub timestamp: f64,
    pub usage: Option<f64>,
    pub energy: Option<f64>,
    pub transmit: Option<f64>,
    pub receive: Option<f64>,
}

impl GraphPoint {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(timestamp_key(self.timestamp))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphViewData {
    /// Unit of `usage` / `transmit` / `receive`.
    pub unit: GraphUnit,
    /// Ordered by timestamp.
    pub points: Vec<GraphPoint>,
}

/// Merge the range series of one device graph into timestamp-ordered
/// points. Series are told apart by their `data_label`.
///
/// Network interfaces get their throughput scaled into a common unit.
/// Returns `None` for an absent response and when no sample was usable.
pub fn parse_graph_data(
    response: Option<&MetricsResponse>,
    device_type: DeviceType,
) -> Option<GraphViewData> {
    let response = response?;
    let mut points: BTreeMap<i64, GraphPoint> = BTreeMap::new();

    for series in &response.data.result {
        let Some(role) = series.label(labels::DATA_LABEL) else {
            trace!("skipping range series without data_label");
            continue;
        };
        let slot: fn(&mut GraphPoint) -> &mut Option<f64> = match role {
            labels::USAGE => |p| &mut p.usage,
            labels::ENERGY => |p| &mut p.energy,
            labels::TRANSMIT => |p| &mut p.transmit,
            labels::RECEIVE => |p| &mut p.receive,
            other => {
                trace!(role = other, "skipping range series with unknown data_label");
                continue;
            }
        };

        let samples = series.values.iter().chain(series.value.as_ref());
        for sample in samples {
            let Some(value) = sample.value().filter(|v| v.is_finite()) else {
                continue;
            };
            let point = points
                .entry(timestamp_key(sample.timestamp()))
                .or_insert_with(|| GraphPoint {
                    timestamp: sample.timestamp(),
                    ..GraphPoint::default()
                });
            *slot(point) = Some(value);
        }
    }

    if points.is_empty() {
        return None;
    }
    let mut points: Vec<GraphPoint> = points.into_values().collect();

    let unit = if device_type == DeviceType::NetworkInterface {
        let peak = points
            .iter()
            .flat_map(|p| [p.transmit, p.receive])
            .flatten()
            .fold(0.0_f64, f64::max);
        let unit = ThroughputUnit::for_peak(peak);
        let divisor = unit.divisor();
        for point in &mut points {
            for value in [&mut point.transmit, &mut point.receive].into_iter().flatten() {
                *value /= divisor;
            }
        }
        GraphUnit::Throughput(unit)
    } else {
        GraphUnit::Percent
    };

    Some(GraphViewData { unit, points })
}

/// Unix seconds to whole milliseconds.
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn timestamp_key(timestamp: f64) -> i64 {
    (timestamp * 1000.0).round() as i64
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::metrics::series::fixtures::{range, response};

    #[test]
    fn unit_selection() {
        assert_eq!(ThroughputUnit::for_peak(0.0), ThroughputUnit::BytesPerSecond);
        assert_eq!(ThroughputUnit::for_peak(999.0), ThroughputUnit::BytesPerSecond);
        assert_eq!(ThroughputUnit::for_peak(1_000.0), ThroughputUnit::KilobytesPerSecond);
        assert_eq!(ThroughputUnit::for_peak(2_500_000.0), ThroughputUnit::MegabytesPerSecond);
        assert_eq!(ThroughputUnit::for_peak(7e12), ThroughputUnit::GigabytesPerSecond);
        assert_eq!(GraphUnit::Throughput(ThroughputUnit::MegabytesPerSecond).to_string(), "MB/s");
    }

    #[test]
    fn merges_usage_and_energy_by_timestamp() {
        let resp = response(vec![
            range(&[("data_label", "usage")], &[(20.0, "40"), (10.0, "30")]),
            range(&[("data_label", "energy")], &[(10.0, "120.5")]),
        ]);
        let graph = parse_graph_data(Some(&resp), DeviceType::Cpu).unwrap();

        assert_eq!(graph.unit, GraphUnit::Percent);
        assert_eq!(graph.points.len(), 2);
        assert_eq!(graph.points[0].timestamp, 10.0);
        assert_eq!(graph.points[0].usage, Some(30.0));
        assert_eq!(graph.points[0].energy, Some(120.5));
        assert_eq!(graph.points[1].usage, Some(40.0));
        assert_eq!(graph.points[1].energy, None);
    }

    #[test]
    fn network_throughput_is_scaled_to_peak() {
        let resp = response(vec![
            range(&[("data_label", "transmit")], &[(1.0, "2500000"), (2.0, "500000")]),
            range(&[("data_label", "receive")], &[(1.0, "1000000")]),
        ]);
        let graph = parse_graph_data(Some(&resp), DeviceType::NetworkInterface).unwrap();

        assert_eq!(graph.unit, GraphUnit::Throughput(ThroughputUnit::MegabytesPerSecond));
        assert_eq!(graph.points[0].transmit, Some(2.5));
        assert_eq!(graph.points[0].receive, Some(1.0));
        assert_eq!(graph.points[1].transmit, Some(0.5));
    }

    #[test]
    fn unlabelled_and_bad_samples_are_skipped() {
        let resp = response(vec![
            range(&[("job", "x")], &[(1.0, "1")]),
            range(&[("data_label", "usage")], &[(1.0, "NaN"), (2.0, "bad")]),
        ]);
        assert!(parse_graph_data(Some(&resp), DeviceType::Gpu).is_none());
        assert!(parse_graph_data(None, DeviceType::Gpu).is_none());
    }

    #[test]
    fn point_time() {
        let point = GraphPoint {
            timestamp: 1_700_000_000.5,
            ..GraphPoint::default()
        };
        assert_eq!(point.time().unwrap().timestamp_millis(), 1_700_000_000_500);
    }
}

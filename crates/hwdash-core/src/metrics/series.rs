// ── Series decoding ──
//
// Metric names follow `<deviceType>_<role>` (`CPU_usageRate`,
// `memory_usedMemory`). The device id travels in the `job` label.

use std::str::FromStr;

use hwdash_api::models::MetricSeries;

use super::labels;
use crate::model::{DeviceType, EntityId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("series has no __name__ label")]
    MissingName,

    #[error("metric {name:?} does not start with a known device type")]
    UnknownDeviceType { name: String },

    #[error("series {name:?} carries no sample")]
    MissingValue { name: String },

    #[error("series {name:?} has non-numeric sample {raw:?}")]
    InvalidValue { name: String, raw: String },
}

/// A single-sample series with its name split into parts.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSeries {
    pub device_type: DeviceType,
    /// Name part after the first `_`; empty when there is none.
    pub role: String,
    /// The `job` label.
    pub device_id: Option<EntityId>,
    pub data_label: Option<String>,
    pub value: f64,
}

pub fn parse_metric_series(series: &MetricSeries) -> Result<DecodedSeries, DecodeError> {
    let name = series
        .label(labels::NAME)
        .ok_or(DecodeError::MissingName)?;
    let (prefix, role) = name.split_once('_').unwrap_or((name, ""));
    let device_type =
        DeviceType::from_str(prefix).map_err(|_| DecodeError::UnknownDeviceType {
            name: name.to_owned(),
        })?;

    let sample = series.value.as_ref().ok_or_else(|| DecodeError::MissingValue {
        name: name.to_owned(),
    })?;
    let value = sample.value().ok_or_else(|| DecodeError::InvalidValue {
        name: name.to_owned(),
        raw: sample.1.clone(),
    })?;

    Ok(DecodedSeries {
        device_type,
        role: role.to_owned(),
        device_id: series.label(labels::JOB).map(EntityId::from),
        data_label: series.label(labels::DATA_LABEL).map(str::to_owned),
        value,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod fixtures {
    use hwdash_api::models::{MetricSeries, MetricsData, MetricsResponse, Sample};

    pub(crate) fn instant(labels: &[(&str, &str)], value: &str) -> MetricSeries {
        MetricSeries {
            metric: labels
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            value: Some(Sample(1_700_000_000.0, value.to_owned())),
            values: Vec::new(),
        }
    }

    pub(crate) fn range(labels: &[(&str, &str)], samples: &[(f64, &str)]) -> MetricSeries {
        MetricSeries {
            values: samples
                .iter()
                .map(|(ts, v)| Sample(*ts, (*v).to_owned()))
                .collect(),
            value: None,
            ..instant(labels, "0")
        }
    }

    pub(crate) fn response(result: Vec<MetricSeries>) -> MetricsResponse {
        MetricsResponse {
            status: "success".to_owned(),
            data: MetricsData {
                result_type: "vector".to_owned(),
                result,
            },
            ..MetricsResponse::default()
        }
    }
}

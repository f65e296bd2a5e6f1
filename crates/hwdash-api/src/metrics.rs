// Async HTTP client for the Prometheus-compatible metrics backend.
//
// `/query` returns single-point vectors, `/query_range` returns matrices.
// An envelope with `status != "success"` becomes `Error::Query` whether the
// backend sent it with HTTP 200 or with 4xx/5xx.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;
use url::Url;

use crate::error::{Error, body_preview};
use crate::inventory::normalize_base_url;
use crate::models::MetricsResponse;
use crate::transport::TransportConfig;

/// Async client for the metrics query API.
#[derive(Clone)]
pub struct MetricsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MetricsClient {
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Instant query, evaluated at `time` (backend "now" when `None`).
    pub async fn query(
        &self,
        query: &str,
        time: Option<DateTime<Utc>>,
    ) -> Result<MetricsResponse, Error> {
        let mut params = vec![("query", query.to_owned())];
        if let Some(time) = time {
            params.push(("time", time.timestamp().to_string()));
        }
        self.send("query", &params).await
    }

    /// Range query between `start` and `end` with a fixed `step`.
    pub async fn query_range(
        &self,
        query: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        step: Duration,
    ) -> Result<MetricsResponse, Error> {
        let params = [
            ("query", query.to_owned()),
            ("start", start.timestamp().to_string()),
            ("end", end.timestamp().to_string()),
            ("step", step.as_secs().max(1).to_string()),
        ];
        self.send("query_range", &params).await
    }

    async fn send(&self, path: &str, params: &[(&str, String)]) -> Result<MetricsResponse, Error> {
        let url = self.base_url.join(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        match serde_json::from_str::<MetricsResponse>(&body) {
            Ok(envelope) if envelope.is_success() => Ok(envelope),
            Ok(envelope) => Err(Error::Query {
                error_type: envelope.error_type.unwrap_or_else(|| status.to_string()),
                message: envelope.error.unwrap_or_default(),
            }),
            Err(_) if !status.is_success() => Err(Error::Api {
                status: status.as_u16(),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body_preview(&body)
                },
                code: None,
            }),
            Err(e) => Err(Error::Deserialization {
                message: format!("{e} (body preview: {:?})", body_preview(&body)),
                body,
            }),
        }
    }
}

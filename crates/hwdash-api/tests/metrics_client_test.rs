#![allow(clippy::unwrap_used)]
// Integration tests for `MetricsClient` using wiremock.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use hwdash_api::{Error, MetricsClient};

async fn setup() -> (MockServer, MetricsClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client = MetricsClient::from_reqwest(&base, reqwest::Client::new()).unwrap();
    (server, client)
}

#[tokio::test]
async fn test_instant_query() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .and(query_param("query", "CPU_usageRate"))
        .and(query_param("time", "1700000000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "resultType": "vector",
                "result": [{
                    "metric": { "__name__": "CPU_usageRate", "job": "cpu-1" },
                    "value": [1_700_000_000, "56"]
                }]
            },
            "stats": { "seriesFetched": "1" }
        })))
        .mount(&server)
        .await;

    let time = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let resp = client.query("CPU_usageRate", Some(time)).await.unwrap();

    assert!(resp.is_success());
    assert_eq!(resp.data.result_type, "vector");
    assert_eq!(resp.data.result.len(), 1);
    assert_eq!(resp.data.result[0].value.as_ref().unwrap().value(), Some(56.0));
    assert!(resp.stats.is_some());
}

#[tokio::test]
async fn test_range_query_sends_window() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query_range"))
        .and(query_param("start", "1700000000"))
        .and(query_param("end", "1700003600"))
        .and(query_param("step", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": {
                "resultType": "matrix",
                "result": [{
                    "metric": { "data_label": "usage" },
                    "values": [[1_700_000_000, "1"], [1_700_000_015, "2"]]
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let start = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    let end = Utc.timestamp_opt(1_700_003_600, 0).unwrap();
    let resp = client
        .query_range("up", start, end, Duration::from_secs(15))
        .await
        .unwrap();

    assert_eq!(resp.data.result[0].values.len(), 2);
}

#[tokio::test]
async fn test_error_envelope_becomes_query_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "errorType": "bad_data",
            "error": "1:1: parse error: unexpected end of input"
        })))
        .mount(&server)
        .await;

    let err = client.query("(", None).await.unwrap_err();
    match err {
        Error::Query { error_type, message } => {
            assert_eq!(error_type, "bad_data");
            assert!(message.contains("parse error"));
        }
        other => panic!("expected Query error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_plain_text_failure_becomes_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/query"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let err = client.query("up", None).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

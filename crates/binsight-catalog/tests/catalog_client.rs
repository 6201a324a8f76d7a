//! Integration tests for `CatalogClient` using wiremock HTTP mocks.

use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use binsight_catalog::{CatalogClient, CatalogError};

fn test_client(base_url: &str, max_poll_attempts: u32) -> CatalogClient {
    CatalogClient::with_endpoint(
        base_url,
        "shpat_test",
        5,
        Duration::ZERO,
        max_poll_attempts,
    )
    .expect("client construction should not fail")
}

fn operation_response(status: &str, url: Option<&str>, error_code: Option<&str>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "data": {
            "currentBulkOperation": {
                "id": "gid://shopify/BulkOperation/1",
                "status": status,
                "errorCode": error_code,
                "url": url,
            }
        }
    }))
}

#[tokio::test]
async fn start_bulk_export_returns_operation_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("X-Shopify-Access-Token", "shpat_test"))
        .and(body_string_contains("bulkOperationRunQuery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "bulkOperationRunQuery": {
                    "bulkOperation": { "id": "gid://shopify/BulkOperation/1", "status": "CREATED" },
                    "userErrors": []
                }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let job_id = client.start_bulk_export().await.expect("should start");
    assert_eq!(job_id, "gid://shopify/BulkOperation/1");
}

#[tokio::test]
async fn start_bulk_export_surfaces_first_user_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "bulkOperationRunQuery": {
                    "bulkOperation": null,
                    "userErrors": [
                        { "field": ["query"], "message": "field 'bogus' does not exist" },
                        { "field": null, "message": "second error" }
                    ]
                }
            }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let err = client.start_bulk_export().await.expect_err("should reject");
    assert!(
        matches!(
            err,
            CatalogError::RequestRejected { ref message } if message == "field 'bogus' does not exist"
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn await_completion_polls_until_completed_and_returns_url() {
    let server = MockServer::start().await;

    // Two RUNNING polls, then COMPLETED with a download URL.
    Mock::given(method("POST"))
        .and(body_string_contains("currentBulkOperation"))
        .respond_with(operation_response("RUNNING", None, None))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("currentBulkOperation"))
        .respond_with(operation_response(
            "COMPLETED",
            Some("https://exports.example.com/file.jsonl"),
            None,
        ))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 10);
    let cancel = CancellationToken::new();
    let url = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect("should complete");
    assert_eq!(url, "https://exports.example.com/file.jsonl");
}

#[tokio::test]
async fn await_completion_fails_with_platform_error_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(operation_response("FAILED", None, Some("ACCESS_DENIED")))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let cancel = CancellationToken::new();
    let err = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, CatalogError::JobFailed { ref code, .. } if code == "ACCESS_DENIED"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn await_completion_treats_canceled_as_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(operation_response("CANCELED", None, None))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let cancel = CancellationToken::new();
    let err = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect_err("should fail");
    assert!(
        matches!(err, CatalogError::JobFailed { ref code, .. } if code == "CANCELED"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn await_completion_times_out_after_max_attempts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(operation_response("RUNNING", None, None))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 4);
    let cancel = CancellationToken::new();
    let err = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect_err("should time out");
    assert!(
        matches!(err, CatalogError::JobTimeout { attempts: 4, .. }),
        "got {err:?}"
    );
    // One status request per attempt, nothing beyond the ceiling.
    assert_eq!(server.received_requests().await.map_or(0, |r| r.len()), 4);
}

#[tokio::test]
async fn await_completion_errors_when_completed_without_url() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(operation_response("COMPLETED", None, None))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let cancel = CancellationToken::new();
    let err = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect_err("should fail");
    assert!(matches!(err, CatalogError::MissingDownloadUrl { .. }), "got {err:?}");
}

#[tokio::test]
async fn await_completion_stops_when_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(operation_response("RUNNING", None, None))
        .mount(&server)
        .await;

    // A long poll interval makes the cancelled branch win the select
    // deterministically on the first wait.
    let client = CatalogClient::with_endpoint(
        &server.uri(),
        "shpat_test",
        5,
        Duration::from_secs(30),
        5,
    )
    .expect("client construction should not fail");

    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = client
        .await_completion("gid://shopify/BulkOperation/1", &cancel)
        .await
        .expect_err("should cancel");
    assert!(matches!(err, CatalogError::Cancelled), "got {err:?}");
}

#[tokio::test]
async fn download_export_returns_raw_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/exports/file.jsonl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"id\":\"gid://shopify/Product/1\"}\n"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let body = client
        .download_export(&format!("{}/exports/file.jsonl", server.uri()))
        .await
        .expect("should download");
    assert!(body.contains("gid://shopify/Product/1"));
}

#[tokio::test]
async fn graphql_level_errors_become_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [ { "message": "Throttled" } ]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let err = client.start_bulk_export().await.expect_err("should fail");
    assert!(
        matches!(err, CatalogError::Api(ref message) if message == "Throttled"),
        "got {err:?}"
    );
}

//! Failure classification of the HTTP client
//!
//! Every backend failure mode must surface as exactly one `ClientError`
//! variant and never as a panic.

use std::time::Duration;

use assert_matches::assert_matches;
use camwatch::api::{ApiClient, CameraAction, ClientError, ImageFormat};
use camwatch::config::BaseUrl;
use reqwest::StatusCode;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

fn client(server: &MockServer) -> ApiClient {
    create_test_client(server, create_test_timeouts(Duration::from_millis(300)))
}

#[tokio::test]
async fn test_fetch_frame_decodes_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_frame_json()))
        .mount(&mock_server)
        .await;

    let frame = client(&mock_server).fetch_frame().await.unwrap();

    assert_eq!(frame.format, ImageFormat::Jpeg);
    assert_eq!(frame.size, 8);
    assert_eq!(frame.encoded, jpeg_frame_base64());
}

#[tokio::test]
async fn test_slow_backend_is_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(create_frame_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch_frame().await;

    assert_matches!(result, Err(ClientError::Timeout));
}

#[tokio::test]
async fn test_server_error_is_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/db/delete-file"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).delete_store_file().await;

    assert_eq!(
        result,
        Err(ClientError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR
        })
    );
}

#[tokio::test]
async fn test_invalid_json_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{invalid json"))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch_frame().await;

    assert_matches!(result, Err(ClientError::Malformed(_)));
}

#[tokio::test]
async fn test_missing_success_flag_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .camera_command(CameraAction::Start)
        .await;

    assert_matches!(result, Err(ClientError::Malformed(_)));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport() {
    // Nothing listens on the discard port
    let client = ApiClient::new(
        BaseUrl::new("http://127.0.0.1:9"),
        create_test_timeouts(Duration::from_millis(500)),
    )
    .unwrap();

    let result = client.fetch_frame().await;

    assert_matches!(result, Err(ClientError::Transport(_)));
}

#[tokio::test]
async fn test_refused_command_is_application() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .and(body_json(serde_json::json!({ "action": "start" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(false)))
        .mount(&mock_server)
        .await;

    let result = client(&mock_server)
        .camera_command(CameraAction::Start)
        .await;

    assert_eq!(
        result,
        Err(ClientError::Application("backend refused".to_string()))
    );
}

#[tokio::test]
async fn test_unavailable_frame_is_application() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "success": false })),
        )
        .mount(&mock_server)
        .await;

    let result = client(&mock_server).fetch_frame().await;

    assert_eq!(
        result,
        Err(ClientError::Application("Frame not available".to_string()))
    );
}

#[tokio::test]
async fn test_bucket_delete_sends_confirmation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/s3/bucket/delete"))
        .and(body_json(serde_json::json!({
            "bucket_name": "computer-vision-analysis",
            "confirmation": "CONFIRM_DELETE",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    client(&mock_server)
        .delete_bucket("computer-vision-analysis")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cleanup_passes_days_and_returns_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/db/cleanup"))
        .and(query_param("days", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "success": true, "deleted_count": 42 })),
        )
        .mount(&mock_server)
        .await;

    let deleted = client(&mock_server).cleanup_records(0).await.unwrap();

    assert_eq!(deleted, 42);
}

#[tokio::test]
async fn test_base_url_edit_applies_to_next_call() {
    let first = MockServer::start().await;
    let second = MockServer::start().await;

    for server in [&first, &second] {
        Mock::given(method("POST"))
            .and(path("/db/delete-file"))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
            .expect(1)
            .mount(server)
            .await;
    }

    let client = client(&first);
    client.delete_store_file().await.unwrap();

    client.base_url().set(format!("{}/", second.uri()));
    client.delete_store_file().await.unwrap();
}

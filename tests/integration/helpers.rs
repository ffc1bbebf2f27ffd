//! Helper functions for integration tests

use std::time::Duration;

use base64::{Engine, engine::general_purpose::STANDARD};
use camwatch::alerts::AlertLog;
use camwatch::api::ApiClient;
use camwatch::config::{BaseUrl, PollSettings, Timeouts};
use camwatch::{Session, SessionSettings};
use wiremock::MockServer;

/// A few bytes starting with the JPEG magic number
pub fn jpeg_frame_base64() -> String {
    STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46])
}

pub fn create_frame_json() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "frame": jpeg_frame_base64(),
    })
}

pub fn create_ack_json(success: bool) -> serde_json::Value {
    if success {
        serde_json::json!({ "success": true })
    } else {
        serde_json::json!({ "success": false, "detail": "backend refused" })
    }
}

/// Timeouts short enough for tests, with the frame timeout given explicitly
pub fn create_test_timeouts(frame_timeout: Duration) -> Timeouts {
    Timeouts {
        frame: frame_timeout,
        command: Duration::from_secs(2),
        bucket_delete: Duration::from_secs(2),
        cleanup: Duration::from_secs(2),
        delete_file: Duration::from_secs(2),
        images: Duration::from_secs(2),
    }
}

pub fn create_test_settings(frame_timeout: Duration, poll: PollSettings) -> SessionSettings {
    SessionSettings {
        timeouts: create_test_timeouts(frame_timeout),
        poll,
        ..SessionSettings::default()
    }
}

pub fn create_test_client(server: &MockServer, timeouts: Timeouts) -> ApiClient {
    ApiClient::new(BaseUrl::new(server.uri()), timeouts).unwrap()
}

pub fn create_test_session(server: &MockServer, settings: SessionSettings) -> Session {
    Session::new(BaseUrl::new(server.uri()), settings).unwrap()
}

/// Poll the alert log until a message containing `needle` shows up
pub async fn wait_for_alert(alerts: &AlertLog, needle: &str, within: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + within;

    while tokio::time::Instant::now() < deadline {
        if alerts.count_matching(needle).await > 0 {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}

/// Poll the mock server until a request with `method`, `path` and a body
/// containing `body_fragment` has been received
pub async fn wait_for_request(
    server: &MockServer,
    method: &str,
    path: &str,
    body_fragment: &str,
    within: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + within;

    while tokio::time::Instant::now() < deadline {
        let received = server.received_requests().await.unwrap_or_default();
        let found = received.iter().any(|request| {
            request.method.as_str() == method
                && request.url.path() == path
                && String::from_utf8_lossy(&request.body).contains(body_fragment)
        });
        if found {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}

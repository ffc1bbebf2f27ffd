//! Monitoring lifecycle against a mocked camera

use std::time::Duration;

use assert_matches::assert_matches;
use camwatch::actors::messages::{MonitorStatus, StartOutcome, StopOutcome};
use camwatch::config::PollSettings;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

async fn mount_camera_commands(server: &MockServer) {
    for action in ["start", "stop"] {
        Mock::given(method("POST"))
            .and(path("/camera"))
            .and(body_json(serde_json::json!({ "action": action })))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_frames_then_timeout_then_stop() {
    let mock_server = MockServer::start().await;
    mount_camera_commands(&mock_server).await;

    // Three good frames, then a camera that stops answering in time
    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_frame_json()))
        .up_to_n_times(3)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(create_frame_json())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let poll = PollSettings {
        refresh_interval: Duration::from_millis(10),
        failure_cooldown: Duration::from_secs(5),
    };
    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(200), poll),
    );
    let monitor = session.monitor();
    let alerts = session.alerts();

    assert_matches!(monitor.start().await.unwrap(), StartOutcome::Started);
    assert_eq!(monitor.status(), MonitorStatus::Active);

    assert!(
        wait_for_alert(alerts, "Video feed request timed out.", Duration::from_secs(3)).await,
        "timeout should be reported"
    );

    // A failed fetch keeps the last good frame on screen
    assert!(monitor.current_frame().is_some());

    // Stop lands in the failure cooldown and must not wait it out
    let started = tokio::time::Instant::now();
    assert_matches!(monitor.stop(true).await.unwrap(), StopOutcome::Stopped);
    assert!(started.elapsed() < Duration::from_secs(2));

    assert_eq!(
        alerts
            .count_matching("Camera monitoring started successfully.")
            .await,
        1
    );
    assert_eq!(
        alerts.count_matching("Video feed request timed out.").await,
        1
    );
    assert_eq!(alerts.count_matching("Camera monitoring stopped.").await, 1);

    assert!(monitor.current_frame().is_none());
    assert!(!monitor.is_active().await.unwrap());
    assert_eq!(monitor.status(), MonitorStatus::Idle);

    // The remote stop is sent in the background
    assert!(
        wait_for_request(
            &mock_server,
            "POST",
            "/camera",
            "\"stop\"",
            Duration::from_secs(2)
        )
        .await,
        "stop command should reach the backend"
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_second_start_is_already_active() {
    let mock_server = MockServer::start().await;
    mount_camera_commands(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_frame_json()))
        .mount(&mock_server)
        .await;

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );
    let monitor = session.monitor();

    assert_matches!(monitor.start().await.unwrap(), StartOutcome::Started);
    assert_matches!(monitor.start().await.unwrap(), StartOutcome::AlreadyActive);

    assert_eq!(
        session
            .alerts()
            .count_matching("Camera monitoring already active.")
            .await,
        1
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_rejected_start_stays_idle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(false)))
        .mount(&mock_server)
        .await;

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );
    let monitor = session.monitor();

    assert_matches!(monitor.start().await.unwrap(), StartOutcome::Failed(_));
    assert!(!monitor.is_active().await.unwrap());
    assert_eq!(monitor.status(), MonitorStatus::Idle);
    assert_eq!(
        session
            .alerts()
            .count_matching("Failed to start monitoring: backend refused")
            .await,
        1
    );

    // No poller means no frame requests
    tokio::time::sleep(Duration::from_millis(100)).await;
    let received = mock_server.received_requests().await.unwrap();
    assert!(received.iter().all(|request| request.method.as_str() == "POST"));
}

#[tokio::test]
async fn test_stop_when_idle_is_a_notice() {
    let mock_server = MockServer::start().await;

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );

    assert_matches!(
        session.monitor().stop(true).await.unwrap(),
        StopOutcome::NotActive
    );
    assert_eq!(
        session
            .alerts()
            .count_matching("Camera monitoring not active. Cannot stop.")
            .await,
        1
    );

    // Nothing to tell the backend
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_remote_stop_does_not_reach_alert_log() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .and(body_json(serde_json::json!({ "action": "start" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .and(body_json(serde_json::json!({ "action": "stop" })))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_frame_json()))
        .mount(&mock_server)
        .await;

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );
    let monitor = session.monitor();

    monitor.start().await.unwrap();
    assert_matches!(monitor.stop(true).await.unwrap(), StopOutcome::Stopped);

    assert!(
        wait_for_request(
            &mock_server,
            "POST",
            "/camera",
            "\"stop\"",
            Duration::from_secs(2)
        )
        .await
    );
    tokio::time::sleep(Duration::from_millis(50)).await;

    let alerts = session.alerts().snapshot().await;
    assert!(alerts.iter().all(|alert| !alert.level.is_failure()));
    assert_eq!(
        session
            .alerts()
            .count_matching("Camera monitoring stopped.")
            .await,
        1
    );
}

async fn count_frame_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.method.as_str() == "GET" && request.url.path() == "/camera")
        .count()
}

#[tokio::test]
async fn test_repeated_start_stop_leaves_no_poller_behind() {
    let mock_server = MockServer::start().await;
    mount_camera_commands(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_frame_json()))
        .mount(&mock_server)
        .await;

    let poll = PollSettings {
        refresh_interval: Duration::from_millis(10),
        failure_cooldown: Duration::from_millis(100),
    };
    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), poll),
    );
    let monitor = session.monitor();

    for _ in 0..3 {
        assert_matches!(monitor.start().await.unwrap(), StartOutcome::Started);
        assert_matches!(monitor.start().await.unwrap(), StartOutcome::AlreadyActive);

        // Let the poller fetch a few frames
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_matches!(monitor.stop(true).await.unwrap(), StopOutcome::Stopped);
        assert_matches!(monitor.stop(true).await.unwrap(), StopOutcome::NotActive);
    }

    assert!(!monitor.is_active().await.unwrap());
    assert!(monitor.current_frame().is_none());

    // No fetch may happen once stop has returned
    let before = count_frame_requests(&mock_server).await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let after = count_frame_requests(&mock_server).await;

    assert!(before > 0);
    assert_eq!(before, after);
    assert!(monitor.current_frame().is_none());

    assert_eq!(
        session
            .alerts()
            .count_matching("Camera monitoring started successfully.")
            .await,
        3
    );
    assert_eq!(
        session
            .alerts()
            .count_matching("Camera monitoring stopped.")
            .await,
        3
    );

    session.shutdown().await;
}

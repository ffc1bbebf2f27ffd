//! Self-destruct sequence against a mocked backend

use std::time::Duration;

use camwatch::config::PollSettings;
use camwatch::self_destruct::{DestructPhase, DestructStep};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

async fn mount_cleanup(server: &MockServer, deleted_count: u64) {
    Mock::given(method("POST"))
        .and(path("/db/cleanup"))
        .and(query_param("days", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "success": true, "deleted_count": deleted_count }),
        ))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_ack(server: &MockServer, route: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_failed_bucket_delete_does_not_abort_sequence() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/s3/bucket/delete"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_cleanup(&mock_server, 5).await;
    mount_ack(&mock_server, "/db/delete-file").await;

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );
    let destruct = session.self_destruct();
    let phase = destruct.subscribe();

    let report = destruct.run().await;

    // Monitoring was never started, so there is no stop step
    let steps: Vec<_> = report.steps.iter().map(|outcome| outcome.step).collect();
    assert_eq!(
        steps,
        vec![
            DestructStep::DeleteBucket,
            DestructStep::CleanupRecords,
            DestructStep::DeleteStoreFile,
        ]
    );
    assert!(!report.success());
    assert_eq!(report.failures().count(), 1);
    assert_eq!(
        report.steps[1].detail,
        "Database cleaned: 5 records deleted."
    );
    assert_eq!(
        *phase.borrow(),
        DestructPhase::Finished { success: false }
    );

    let alerts = session.alerts();
    assert_eq!(alerts.count_matching("Error during S3 deletion").await, 1);
    assert_eq!(
        alerts
            .count_matching("Database cleaned: 5 records deleted.")
            .await,
        1
    );
    assert_eq!(alerts.count_matching("Database file deleted.").await, 1);
    assert_eq!(
        alerts
            .count_matching("Self-destruct completed with some errors.")
            .await,
        1
    );

    session.shutdown().await;
}

#[tokio::test]
async fn test_full_sequence_while_monitoring() {
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
    mount_cleanup(&mock_server, 12).await;
    mount_ack(&mock_server, "/db/delete-file").await;

    Mock::given(method("POST"))
        .and(path("/camera"))
        .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(true)))
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
    session.monitor().start().await.unwrap();

    let report = session.self_destruct().run().await;

    let steps: Vec<_> = report.steps.iter().map(|outcome| outcome.step).collect();
    assert_eq!(
        steps,
        vec![
            DestructStep::DeleteBucket,
            DestructStep::CleanupRecords,
            DestructStep::DeleteStoreFile,
            DestructStep::StopMonitoring,
        ]
    );
    assert!(report.success());
    assert!(!session.monitor().is_active().await.unwrap());
    assert!(session.monitor().current_frame().is_none());

    // Destructive requests went out strictly in order
    let order: Vec<String> = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method.as_str() == "POST" && request.url.path() != "/camera")
        .map(|request| request.url.path().to_string())
        .collect();
    assert_eq!(
        order,
        vec!["/s3/bucket/delete", "/db/cleanup", "/db/delete-file"]
    );

    let alerts = session.alerts();
    assert_eq!(alerts.count_matching("Camera monitoring halted.").await, 1);
    assert_eq!(
        alerts
            .count_matching("Self-destruct sequence completed successfully.")
            .await,
        1
    );
}

#[tokio::test]
async fn test_refusals_are_reported_per_step() {
    let mock_server = MockServer::start().await;

    for route in ["/s3/bucket/delete", "/db/cleanup", "/db/delete-file"] {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_ack_json(false)))
            .mount(&mock_server)
            .await;
    }

    let session = create_test_session(
        &mock_server,
        create_test_settings(Duration::from_millis(500), PollSettings::default()),
    );

    let report = session.self_destruct().run().await;

    assert!(!report.success());
    assert_eq!(report.failures().count(), 3);

    let details: Vec<_> = report
        .steps
        .iter()
        .map(|outcome| outcome.detail.as_str())
        .collect();
    assert_eq!(
        details,
        vec![
            "Failed to delete S3 bucket: backend refused",
            "Failed to clean database: backend refused",
            "Failed to delete database file: backend refused",
        ]
    );
}

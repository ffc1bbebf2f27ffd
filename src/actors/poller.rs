//! FramePoller - Repeatedly fetches the current camera frame
//!
//! ## Message Flow
//!
//! ```text
//! fetch frame ──ok──→ publish frame ──→ sleep refresh interval ──┐
//!      ↑       └─err─→ alert ──→ sleep cooldown ──→ sleep ───────┤
//!      └─────────────────────────────────────────────────────────┘
//!                 (every await races the cancellation token)
//! ```
//!
//! Individual fetch failures are logged to the alert log and never end the loop;
//! only cancellation does. A fetch that is in flight when the token fires is
//! dropped, so nothing is published after cancellation.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, instrument, trace};

use crate::alerts::AlertLog;
use crate::api::{ApiClient, CameraFrame, ClientError};
use crate::config::PollSettings;

/// Polls `GET /camera` until cancelled
pub struct FramePoller {
    client: ApiClient,

    alerts: AlertLog,

    /// Latest frame, read by the UI
    frames: watch::Sender<Option<CameraFrame>>,

    settings: PollSettings,

    cancel: CancellationToken,
}

impl FramePoller {
    pub fn new(
        client: ApiClient,
        alerts: AlertLog,
        frames: watch::Sender<Option<CameraFrame>>,
        settings: PollSettings,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            client,
            alerts,
            frames,
            settings,
            cancel,
        }
    }

    /// Run the polling loop until the token is cancelled
    #[instrument(skip(self))]
    pub async fn run(self) {
        debug!("starting frame poller");

        loop {
            let result = tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                result = self.client.fetch_frame() => result,
            };

            match result {
                Ok(frame) => {
                    trace!("received {} byte {} frame", frame.size, frame.format.as_str());
                    self.frames.send_replace(Some(frame));
                }
                Err(e) => {
                    self.alerts.warning(describe_fetch_failure(&e)).await;

                    if !self.pause(self.settings.failure_cooldown).await {
                        break;
                    }
                }
            }

            if !self.pause(self.settings.refresh_interval).await {
                break;
            }
        }

        debug!("frame poller stopped");
    }

    /// Sleep for `duration`; returns `false` if cancelled first
    async fn pause(&self, duration: Duration) -> bool {
        tokio::select! {
            biased;

            _ = self.cancel.cancelled() => false,

            _ = tokio::time::sleep(duration) => true,
        }
    }
}

fn describe_fetch_failure(err: &ClientError) -> String {
    match err {
        ClientError::Timeout => "Video feed request timed out.".to_string(),
        ClientError::Application(detail) => format!("Frame retrieval failed: {detail}"),
        other => format!("Error updating video feed: {other}"),
    }
}

/// Handle to a running [`FramePoller`] task
///
/// At most one exists per monitor; dropping it without calling
/// [`PollerHandle::stop`] leaves the task running.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Spawn a poller on the current runtime
    pub fn spawn(
        client: ApiClient,
        alerts: AlertLog,
        frames: watch::Sender<Option<CameraFrame>>,
        settings: PollSettings,
    ) -> Self {
        let cancel = CancellationToken::new();
        let poller = FramePoller::new(client, alerts, frames, settings, cancel.clone());

        Self {
            cancel,
            task: tokio::spawn(poller.run()),
        }
    }

    /// Cancel the poller and wait until its task has exited
    pub async fn stop(self) {
        self.cancel.cancel();

        if let Err(e) = self.task.await {
            error!("frame poller task failed: {e}");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

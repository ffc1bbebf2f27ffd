//! MonitorActor - Owns the monitoring state and the frame poller
//!
//! All start/stop requests are serialized through this actor's command channel,
//! so the "monitoring active" flag and the poller handle have a single writer.
//!
//! ## Message Flow
//!
//! ```text
//! MonitorHandle ──Start──→ POST /camera {start} ──ok──→ spawn FramePoller
//!               ──Stop───→ cancel + await FramePoller ──→ spawn detached POST /camera {stop}
//!               ──IsActive / Shutdown
//! ```
//!
//! Monitoring is active exactly while a poller handle is held. Stop is
//! optimistic: the handle is taken (monitoring inactive) before the poller has
//! wound down, and the backend is informed afterwards without waiting for it.

use anyhow::{Context, Result};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, instrument, warn};

use crate::alerts::AlertLog;
use crate::api::{ApiClient, CameraAction, CameraFrame, ClientError};
use crate::config::PollSettings;

use super::messages::{MonitorCommand, MonitorStatus, StartOutcome, StopOutcome};
use super::poller::PollerHandle;

/// Actor controlling camera monitoring
pub struct MonitorActor {
    client: ApiClient,

    alerts: AlertLog,

    /// Latest frame, written by the poller and cleared on stop
    frames: watch::Sender<Option<CameraFrame>>,

    /// Status published for display
    status: watch::Sender<MonitorStatus>,

    settings: PollSettings,

    /// Command receiver for control messages
    command_rx: mpsc::Receiver<MonitorCommand>,

    /// Running poller; `Some` exactly while monitoring is active
    poller: Option<PollerHandle>,
}

impl MonitorActor {
    pub fn new(
        client: ApiClient,
        alerts: AlertLog,
        settings: PollSettings,
        command_rx: mpsc::Receiver<MonitorCommand>,
        frames: watch::Sender<Option<CameraFrame>>,
        status: watch::Sender<MonitorStatus>,
    ) -> Self {
        Self {
            client,
            alerts,
            frames,
            status,
            settings,
            command_rx,
            poller: None,
        }
    }

    /// Run the actor's main loop
    ///
    /// Runs until a Shutdown command arrives or every handle is dropped.
    /// Either way an active poller is stopped before the actor exits.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting monitor actor");

        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                MonitorCommand::Start { respond_to } => {
                    let outcome = self.start().await;
                    let _ = respond_to.send(outcome);
                }

                MonitorCommand::Stop {
                    user_initiated,
                    respond_to,
                } => {
                    let outcome = self.stop(user_initiated).await;
                    let _ = respond_to.send(outcome);
                }

                MonitorCommand::IsActive { respond_to } => {
                    let _ = respond_to.send(self.is_active());
                }

                MonitorCommand::Shutdown { respond_to } => {
                    debug!("received shutdown command");
                    if self.is_active() {
                        self.stop(false).await;
                    }
                    let _ = respond_to.send(());
                    return;
                }
            }
        }

        warn!("command channel closed, shutting down");
        if self.is_active() {
            self.stop(false).await;
        }
    }

    fn is_active(&self) -> bool {
        self.poller.is_some()
    }

    async fn start(&mut self) -> StartOutcome {
        if self.is_active() {
            self.alerts.info("Camera monitoring already active.").await;
            return StartOutcome::AlreadyActive;
        }

        self.status.send_replace(MonitorStatus::Starting);
        self.alerts.info("Attempting to start monitoring...").await;

        match self.client.camera_command(CameraAction::Start).await {
            Ok(()) => {
                self.poller = Some(PollerHandle::spawn(
                    self.client.clone(),
                    self.alerts.clone(),
                    self.frames.clone(),
                    self.settings,
                ));
                self.status.send_replace(MonitorStatus::Active);

                self.alerts
                    .success("Camera monitoring started successfully.")
                    .await;

                StartOutcome::Started
            }
            Err(e) => {
                self.status.send_replace(MonitorStatus::Idle);
                self.alerts.error(describe_start_failure(&e)).await;

                StartOutcome::Failed(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn stop(&mut self, user_initiated: bool) -> StopOutcome {
        let Some(poller) = self.poller.take() else {
            self.frames.send_replace(None);
            self.alerts
                .info("Camera monitoring not active. Cannot stop.")
                .await;
            return StopOutcome::NotActive;
        };

        self.status.send_replace(MonitorStatus::Idle);
        self.alerts.info("Attempting to stop monitoring...").await;

        poller.stop().await;

        self.frames.send_replace(None);
        self.alerts.success("Camera monitoring stopped.").await;

        let initiator = if user_initiated { "user" } else { "system" };
        debug!(initiator, "frame polling stopped");

        // Informing the camera is not part of the stop contract; failures only
        // reach the diagnostic log.
        let client = self.client.clone();
        tokio::spawn(async move {
            match client.camera_command(CameraAction::Stop).await {
                Ok(()) => debug!(initiator, "backend acknowledged stop request"),
                Err(e) => warn!(initiator, "failed to send stop request to API: {e}"),
            }
        });

        StopOutcome::Stopped
    }
}

fn describe_start_failure(err: &ClientError) -> String {
    match err {
        ClientError::Application(detail) => format!("Failed to start monitoring: {detail}"),
        ClientError::Timeout => "Error starting monitoring: Request timed out.".to_string(),
        ClientError::Transport(_) | ClientError::Http { .. } => {
            format!("Error starting monitoring: {err}")
        }
        ClientError::Malformed(_) => format!("Unexpected error starting monitoring: {err}"),
    }
}

/// Handle for controlling a MonitorActor
///
/// It can be cloned and shared across tasks; every clone talks to the same actor.
#[derive(Clone)]
pub struct MonitorHandle {
    /// Command sender
    sender: mpsc::Sender<MonitorCommand>,

    status: watch::Receiver<MonitorStatus>,

    frames: watch::Receiver<Option<CameraFrame>>,
}

impl MonitorHandle {
    /// Spawn a new monitor actor
    pub fn spawn(client: ApiClient, alerts: AlertLog, settings: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (frame_tx, frame_rx) = watch::channel(None);
        let (status_tx, status_rx) = watch::channel(MonitorStatus::Idle);

        let actor = MonitorActor::new(client, alerts, settings, cmd_rx, frame_tx, status_tx);

        tokio::spawn(actor.run());

        Self {
            sender: cmd_tx,
            status: status_rx,
            frames: frame_rx,
        }
    }

    /// Start monitoring
    pub async fn start(&self) -> Result<StartOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::Start { respond_to: tx })
            .await
            .context("failed to send Start command")?;

        rx.await.context("failed to receive response")
    }

    /// Stop monitoring
    ///
    /// Returns once the poller has terminated; the backend is informed in the
    /// background.
    pub async fn stop(&self, user_initiated: bool) -> Result<StopOutcome> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::Stop {
                user_initiated,
                respond_to: tx,
            })
            .await
            .context("failed to send Stop command")?;

        rx.await.context("failed to receive response")
    }

    /// Whether monitoring is active, after all earlier commands were handled
    pub async fn is_active(&self) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::IsActive { respond_to: tx })
            .await
            .context("failed to send IsActive command")?;

        rx.await.context("failed to receive response")
    }

    /// Stop monitoring if active and shut the actor down
    pub async fn shutdown(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(MonitorCommand::Shutdown { respond_to: tx })
            .await
            .context("failed to send Shutdown command")?;

        rx.await.context("failed to receive response")
    }

    /// Last published status, without waiting for pending commands
    pub fn status(&self) -> MonitorStatus {
        *self.status.borrow()
    }

    /// Latest frame, if monitoring is active and a fetch succeeded
    pub fn current_frame(&self) -> Option<CameraFrame> {
        self.frames.borrow().clone()
    }
}

//! Message types for actor communication
//!
//! Commands are sent to the monitor actor over an mpsc channel; each command that
//! expects an answer carries a oneshot sender for the reply.

use tokio::sync::oneshot;

use crate::api::ClientError;

/// Commands that can be sent to the MonitorActor
#[derive(Debug)]
pub enum MonitorCommand {
    /// Ask the camera to start capturing and begin polling frames
    Start {
        respond_to: oneshot::Sender<StartOutcome>,
    },

    /// Stop polling and tell the camera to stop in the background
    ///
    /// Alerts and outcome are the same whoever asks.
    Stop {
        /// `false` when another component (self-destruct, shutdown) asks.
        /// Only tags the diagnostic log lines.
        user_initiated: bool,
        respond_to: oneshot::Sender<StopOutcome>,
    },

    /// Whether monitoring is currently active
    IsActive { respond_to: oneshot::Sender<bool> },

    /// Stop monitoring if active, then exit
    Shutdown { respond_to: oneshot::Sender<()> },
}

/// Result of a start request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// The camera accepted the start command and the poller is running
    Started,

    /// Monitoring was already running; nothing changed
    AlreadyActive,

    /// The start command failed; monitoring stays inactive
    Failed(ClientError),
}

/// Result of a stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,

    /// Monitoring was not running; nothing changed
    NotActive,
}

/// Monitoring state as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonitorStatus {
    #[default]
    Idle,

    /// The start command is in flight
    Starting,

    Active,
}

impl MonitorStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MonitorStatus::Idle => "System Ready",
            MonitorStatus::Starting => "Starting Monitoring...",
            MonitorStatus::Active => "Monitoring Active",
        }
    }
}

//! Self-destruct sequence
//!
//! Irreversible bulk deletion of everything the backend stores:
//!
//! ```text
//! delete bucket → clean up records (days=0) → delete store file → [stop monitoring]
//! ```
//!
//! Steps run strictly one after another. A failing step never aborts the
//! sequence; partial cleanup beats no cleanup. The monitoring step only runs if
//! monitoring was active when the sequence began. The overall result is
//! successful only if every executed step was.

use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use crate::actors::monitor::MonitorHandle;
use crate::alerts::{AlertLevel, AlertLog};
use crate::api::{ApiClient, ClientError};

const SUMMARY_SUCCESS: &str = "Self-destruct sequence completed successfully.";
const SUMMARY_FAILURE: &str = "Self-destruct completed with some errors.";

/// One step of the sequence, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructStep {
    DeleteBucket,
    CleanupRecords,
    DeleteStoreFile,
    StopMonitoring,
}

impl DestructStep {
    /// Steps executed on every run
    pub const UNCONDITIONAL: [DestructStep; 3] = [
        DestructStep::DeleteBucket,
        DestructStep::CleanupRecords,
        DestructStep::DeleteStoreFile,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DestructStep::DeleteBucket => "bucket delete",
            DestructStep::CleanupRecords => "record cleanup",
            DestructStep::DeleteStoreFile => "store-file delete",
            DestructStep::StopMonitoring => "stop monitoring",
        }
    }

    /// Status line shown while the step runs
    pub fn progress_message(&self) -> &'static str {
        match self {
            DestructStep::DeleteBucket => "Deleting S3 bucket...",
            DestructStep::CleanupRecords => "Cleaning up database...",
            DestructStep::DeleteStoreFile => "Deleting database file...",
            DestructStep::StopMonitoring => "Stopping camera monitoring...",
        }
    }
}

/// How one executed step ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: DestructStep,
    pub success: bool,
    pub detail: String,
}

/// Result of a whole run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestructReport {
    /// Executed steps in execution order
    pub steps: Vec<StepOutcome>,
}

impl DestructReport {
    pub fn new(steps: Vec<StepOutcome>) -> Self {
        Self { steps }
    }

    /// `true` iff every executed step succeeded
    pub fn success(&self) -> bool {
        self.steps.iter().all(|outcome| outcome.success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|outcome| !outcome.success)
    }

    pub fn summary(&self) -> &'static str {
        if self.success() {
            SUMMARY_SUCCESS
        } else {
            SUMMARY_FAILURE
        }
    }
}

/// Progress published while a run is under way
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DestructPhase {
    /// Waiting for confirmation
    #[default]
    Ready,

    Running(DestructStep),

    Finished { success: bool },
}

impl DestructPhase {
    pub fn message(&self) -> &'static str {
        match self {
            DestructPhase::Ready => {
                "WARNING: This will delete ALL data including S3 bucket contents, database records, and security alerts."
            }
            DestructPhase::Running(step) => step.progress_message(),
            DestructPhase::Finished { success: true } => SUMMARY_SUCCESS,
            DestructPhase::Finished { success: false } => SUMMARY_FAILURE,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, DestructPhase::Running(_))
    }
}

/// Runs the self-destruct sequence against the backend
pub struct SelfDestruct {
    client: ApiClient,
    alerts: AlertLog,
    monitor: MonitorHandle,
    bucket_name: String,
    phase: watch::Sender<DestructPhase>,
}

impl SelfDestruct {
    pub fn new(
        client: ApiClient,
        alerts: AlertLog,
        monitor: MonitorHandle,
        bucket_name: impl Into<String>,
    ) -> Self {
        let (phase, _) = watch::channel(DestructPhase::Ready);

        Self {
            client,
            alerts,
            monitor,
            bucket_name: bucket_name.into(),
            phase,
        }
    }

    /// Receiver for progress updates
    pub fn subscribe(&self) -> watch::Receiver<DestructPhase> {
        self.phase.subscribe()
    }

    /// Execute every step and report the composite result
    ///
    /// Never retried automatically.
    #[instrument(skip(self), fields(bucket = %self.bucket_name))]
    pub async fn run(&self) -> DestructReport {
        let monitoring_active = match self.monitor.is_active().await {
            Ok(active) => active,
            Err(e) => {
                warn!("could not query monitoring state: {e:#}");
                false
            }
        };

        let mut plan = DestructStep::UNCONDITIONAL.to_vec();
        if monitoring_active {
            plan.push(DestructStep::StopMonitoring);
        }

        debug!("self-destruct sequence initiated with {} steps", plan.len());

        let mut outcomes = Vec::with_capacity(plan.len());

        for step in plan {
            self.phase.send_replace(DestructPhase::Running(step));
            self.alerts.info(step.progress_message()).await;

            let (level, outcome) = self.execute(step).await;
            self.alerts.append(level, outcome.detail.clone()).await;

            outcomes.push(outcome);
        }

        let report = DestructReport::new(outcomes);

        if report.success() {
            self.alerts.success(report.summary()).await;
        } else {
            let failed: Vec<_> = report.failures().map(|outcome| outcome.step.name()).collect();
            warn!("self-destruct completed with errors in: {}", failed.join(", "));
            self.alerts.warning(report.summary()).await;
        }

        self.phase.send_replace(DestructPhase::Finished {
            success: report.success(),
        });

        report
    }

    #[instrument(skip(self))]
    async fn execute(&self, step: DestructStep) -> (AlertLevel, StepOutcome) {
        let result = match step {
            DestructStep::DeleteBucket => self
                .client
                .delete_bucket(&self.bucket_name)
                .await
                .map(|()| "S3 bucket deleted.".to_string())
                .map_err(|e| {
                    failure(e, "Failed to delete S3 bucket", "Error during S3 deletion")
                }),

            DestructStep::CleanupRecords => self
                .client
                .cleanup_records(0)
                .await
                .map(|count| format!("Database cleaned: {count} records deleted."))
                .map_err(|e| {
                    failure(e, "Failed to clean database", "Error during database cleanup")
                }),

            DestructStep::DeleteStoreFile => self
                .client
                .delete_store_file()
                .await
                .map(|()| "Database file deleted.".to_string())
                .map_err(|e| {
                    failure(
                        e,
                        "Failed to delete database file",
                        "Error deleting database file",
                    )
                }),

            DestructStep::StopMonitoring => self
                .monitor
                .stop(false)
                .await
                .map(|_| "Camera monitoring halted.".to_string())
                .map_err(|e| (AlertLevel::Error, format!("Error stopping monitoring: {e:#}"))),
        };

        match result {
            Ok(detail) => (
                AlertLevel::Success,
                StepOutcome {
                    step,
                    success: true,
                    detail,
                },
            ),
            Err((level, detail)) => (
                level,
                StepOutcome {
                    step,
                    success: false,
                    detail,
                },
            ),
        }
    }
}

/// Backend refusals are warnings; anything else is an error
fn failure(err: ClientError, refused: &str, errored: &str) -> (AlertLevel, String) {
    match err {
        ClientError::Application(detail) => (AlertLevel::Warning, format!("{refused}: {detail}")),
        other => (AlertLevel::Error, format!("{errored}: {other}")),
    }
}

//! Client session
//!
//! Wires the API client, the alert log and the monitor actor together. The UI
//! only talks to the backend through a session.

use anyhow::Result;
use tracing::{instrument, warn};

use crate::actors::monitor::MonitorHandle;
use crate::alerts::AlertLog;
use crate::analytics::{self, AnalyticsReport};
use crate::api::{ApiClient, ClientError, ClientResult};
use crate::config::{
    BaseUrl, DEFAULT_ANALYTICS_LIMIT, DEFAULT_BUCKET_NAME, DEFAULT_RETENTION_DAYS, PollSettings,
    Timeouts,
};
use crate::self_destruct::SelfDestruct;

/// Everything a session needs besides the base URL
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub timeouts: Timeouts,
    pub poll: PollSettings,
    pub bucket_name: String,

    /// Retention applied by the cleanup run at startup
    pub retention_days: u32,

    pub analytics_limit: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            poll: PollSettings::default(),
            bucket_name: DEFAULT_BUCKET_NAME.to_string(),
            retention_days: DEFAULT_RETENTION_DAYS,
            analytics_limit: DEFAULT_ANALYTICS_LIMIT,
        }
    }
}

/// Handle bundle for one connection to the backend
///
/// Cheap to clone; clones share the alert log and the monitor actor.
#[derive(Clone)]
pub struct Session {
    client: ApiClient,
    alerts: AlertLog,
    monitor: MonitorHandle,
    settings: SessionSettings,
}

impl Session {
    /// Create a session and spawn its monitor actor
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(base_url: BaseUrl, settings: SessionSettings) -> Result<Self> {
        let client = ApiClient::new(base_url, settings.timeouts)?;
        let alerts = AlertLog::new();
        let monitor = MonitorHandle::spawn(client.clone(), alerts.clone(), settings.poll);

        Ok(Self {
            client,
            alerts,
            monitor,
            settings,
        })
    }

    pub fn alerts(&self) -> &AlertLog {
        &self.alerts
    }

    pub fn monitor(&self) -> &MonitorHandle {
        &self.monitor
    }

    pub fn base_url(&self) -> &BaseUrl {
        self.client.base_url()
    }

    /// Prepare a self-destruct run against this session's backend
    pub fn self_destruct(&self) -> SelfDestruct {
        SelfDestruct::new(
            self.client.clone(),
            self.alerts.clone(),
            self.monitor.clone(),
            self.settings.bucket_name.clone(),
        )
    }

    pub async fn analytics(&self) -> ClientResult<AnalyticsReport> {
        analytics::load_report(&self.client, self.settings.analytics_limit).await
    }

    /// Delete records older than the configured retention
    ///
    /// Outcome goes to the alert log only.
    #[instrument(skip(self), fields(days = self.settings.retention_days))]
    pub async fn initial_cleanup(&self) {
        self.alerts
            .info("Performing initial database cleanup...")
            .await;

        match self.client.cleanup_records(self.settings.retention_days).await {
            Ok(count) => {
                self.alerts
                    .success(format!(
                        "Initial cleanup complete: {count} old images deleted."
                    ))
                    .await;
            }
            Err(ClientError::Application(detail)) => {
                self.alerts
                    .warning(format!("Initial cleanup failed: {detail}"))
                    .await;
            }
            Err(e) => {
                self.alerts
                    .error(format!("Error during initial cleanup: {e}"))
                    .await;
            }
        }
    }

    /// Stop monitoring if active and shut the monitor actor down
    pub async fn shutdown(&self) {
        if let Err(e) = self.monitor.shutdown().await {
            warn!("monitor shutdown failed: {e:#}");
        }
    }
}

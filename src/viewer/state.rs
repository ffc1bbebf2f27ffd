//! Application state management

use crate::actors::messages::MonitorStatus;
use crate::alerts::AlertEntry;
use crate::analytics::AnalyticsReport;
use crate::api::CameraFrame;
use crate::self_destruct::{DestructPhase, DestructReport};

/// Tab selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Live,
    Alerts,
    Analytics,
    SelfDestruct,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Live, Tab::Alerts, Tab::Analytics, Tab::SelfDestruct];

    pub fn next(&self) -> Self {
        match self {
            Tab::Live => Tab::Alerts,
            Tab::Alerts => Tab::Analytics,
            Tab::Analytics => Tab::SelfDestruct,
            Tab::SelfDestruct => Tab::Live,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Tab::Live => Tab::SelfDestruct,
            Tab::Alerts => Tab::Live,
            Tab::Analytics => Tab::Alerts,
            Tab::SelfDestruct => Tab::Analytics,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Live => "Live Feed",
            Tab::Alerts => "Alerts",
            Tab::Analytics => "Analytics",
            Tab::SelfDestruct => "Self Destruct",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Live => 0,
            Tab::Alerts => 1,
            Tab::Analytics => 2,
            Tab::SelfDestruct => 3,
        }
    }
}

/// Analytics tab content
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalyticsView {
    #[default]
    NotLoaded,
    Loading,
    Loaded(AnalyticsReport),
    Failed(String),
}

/// Keyboard input routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,

    /// Keys go to the base URL field
    EditingUrl,
}

/// Application state
pub struct AppState {
    /// Current selected tab
    pub current_tab: Tab,

    /// Alert log snapshot, oldest first
    pub alerts: Vec<AlertEntry>,

    /// Selected alert index (newest first, for Alerts tab)
    pub selected_alert: usize,

    /// Latest frame
    pub frame: Option<CameraFrame>,

    /// Frames received since startup
    pub frames_received: u64,

    pub monitor_status: MonitorStatus,

    /// A start request is in flight
    pub start_pending: bool,

    /// A stop request is in flight
    pub stop_pending: bool,

    /// Base URL requests currently go to
    pub base_url: String,

    pub input_mode: InputMode,

    /// Edit buffer for the base URL
    pub url_input: String,

    pub analytics: AnalyticsView,

    pub destruct_phase: DestructPhase,

    /// Result of the last self-destruct run
    pub destruct_report: Option<DestructReport>,

    /// Recipient of the backend's alert emails
    pub alert_email: Option<String>,
}

impl AppState {
    pub fn new(base_url: String, alert_email: Option<String>) -> Self {
        Self {
            current_tab: Tab::Live,
            alerts: Vec::new(),
            selected_alert: 0,
            frame: None,
            frames_received: 0,
            monitor_status: MonitorStatus::Idle,
            start_pending: false,
            stop_pending: false,
            base_url,
            input_mode: InputMode::Normal,
            url_input: String::new(),
            analytics: AnalyticsView::NotLoaded,
            destruct_phase: DestructPhase::Ready,
            destruct_report: None,
            alert_email,
        }
    }

    /// Replace the alert snapshot
    pub fn set_alerts(&mut self, alerts: Vec<AlertEntry>) {
        self.alerts = alerts;

        // Clamp selection
        if self.selected_alert >= self.alerts.len() {
            self.selected_alert = self.alerts.len().saturating_sub(1);
        }
    }

    /// Store the latest frame, counting new arrivals
    pub fn update_frame(&mut self, frame: Option<CameraFrame>) {
        if frame.is_some() && frame != self.frame {
            self.frames_received += 1;
        }
        self.frame = frame;
    }

    pub fn select_next(&mut self) {
        if !self.alerts.is_empty() {
            self.selected_alert = (self.selected_alert + 1) % self.alerts.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.alerts.is_empty() {
            self.selected_alert = if self.selected_alert == 0 {
                self.alerts.len() - 1
            } else {
                self.selected_alert - 1
            };
        }
    }

    pub fn can_start(&self) -> bool {
        self.monitor_status == MonitorStatus::Idle
            && !self.start_pending
            && !self.destruct_phase.is_running()
    }

    pub fn can_stop(&self) -> bool {
        self.monitor_status == MonitorStatus::Active && !self.stop_pending
    }

    /// Whether the user may leave the current tab
    pub fn can_navigate(&self) -> bool {
        self.input_mode == InputMode::Normal && !self.destruct_phase.is_running()
    }

    pub fn can_confirm_destruct(&self) -> bool {
        self.destruct_phase == DestructPhase::Ready
    }

    /// Switch tabs, resetting a finished self-destruct view on entry
    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == Tab::SelfDestruct && self.current_tab != Tab::SelfDestruct {
            self.destruct_phase = DestructPhase::Ready;
            self.destruct_report = None;
        }
        self.current_tab = tab;
    }

    pub fn begin_url_edit(&mut self, current: String) {
        self.url_input = current;
        self.input_mode = InputMode::EditingUrl;
    }

    pub fn cancel_url_edit(&mut self) {
        self.url_input.clear();
        self.input_mode = InputMode::Normal;
    }

    /// Finish editing and hand out the new value
    pub fn commit_url_edit(&mut self) -> String {
        self.input_mode = InputMode::Normal;
        std::mem::take(&mut self.url_input)
    }
}

//! Main application logic

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::sync::{mpsc, watch};

use crate::actors::messages::StartOutcome;
use crate::analytics::AnalyticsReport;
use crate::api::{ClientError, ClientResult};
use crate::config::BaseUrl;
use crate::self_destruct::{DestructPhase, DestructReport, DestructStep};
use crate::session::Session;

use super::{
    config::Config,
    state::{AnalyticsView, AppState, InputMode, Tab},
    ui,
};

/// Results of background operations, delivered back to the event loop
enum UiEvent {
    StartFinished(Result<StartOutcome, String>),
    StopFinished(Result<(), String>),
    AnalyticsLoaded(ClientResult<AnalyticsReport>),
    SelfDestructFinished(DestructReport),
}

/// Main TUI application
pub struct App {
    state: AppState,
    session: Session,
    events_tx: mpsc::UnboundedSender<UiEvent>,
    events_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Progress of the running or last self-destruct
    destruct_rx: Option<watch::Receiver<DestructPhase>>,
}

impl App {
    /// Create a new application instance
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: Config, alert_email: Option<String>) -> Result<Self> {
        let base_url = BaseUrl::new(config.api_url.clone());
        let session = Session::new(base_url, config.session_settings())?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            state: AppState::new(session.base_url().resolve(), alert_email),
            session,
            events_tx,
            events_rx,
            destruct_rx: None,
        })
    }

    /// Run the application
    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Prune old records in the background
        let session = self.session.clone();
        tokio::spawn(async move { session.initial_cleanup().await });

        // Run event loop
        let result = self.run_event_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        self.session.shutdown().await;

        result
    }

    /// Main event loop
    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            self.sync_state().await;

            // Render UI
            terminal.draw(|f| ui::render(f, &self.state))?;

            // Handle finished background operations (non-blocking)
            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_ui_event(event).await;
            }

            // Handle keyboard events (with timeout)
            if event::poll(std::time::Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && self.handle_key_event(key.code).await
            {
                break; // Quit
            }
        }

        Ok(())
    }

    /// Pull the latest shared values into the render state
    async fn sync_state(&mut self) {
        self.state
            .set_alerts(self.session.alerts().snapshot().await);

        let monitor = self.session.monitor();
        self.state.update_frame(monitor.current_frame());
        self.state.monitor_status = monitor.status();

        // A run never returns to Ready, so Ready here means not yet scheduled
        if let Some(rx) = &self.destruct_rx {
            let phase = rx.borrow().clone();
            if phase != DestructPhase::Ready {
                self.state.destruct_phase = phase;
            }
        }

    }

    /// Handle the result of a background operation
    async fn handle_ui_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::StartFinished(result) => {
                self.state.start_pending = false;
                if let Err(e) = result {
                    self.session
                        .alerts()
                        .error(format!("Monitor unavailable: {e}"))
                        .await;
                }
            }
            UiEvent::StopFinished(result) => {
                self.state.stop_pending = false;
                if let Err(e) = result {
                    self.session
                        .alerts()
                        .error(format!("Monitor unavailable: {e}"))
                        .await;
                }
            }
            UiEvent::AnalyticsLoaded(result) => {
                self.state.analytics = match result {
                    Ok(report) => AnalyticsView::Loaded(report),
                    Err(ClientError::Application(message)) => {
                        AnalyticsView::Failed(format!("Error: {message}"))
                    }
                    Err(e @ ClientError::Malformed(_)) => {
                        AnalyticsView::Failed(format!("An unexpected error occurred: {e}"))
                    }
                    Err(e) => AnalyticsView::Failed(format!("Error accessing database: {e}")),
                };
            }
            UiEvent::SelfDestructFinished(report) => {
                self.state.destruct_report = Some(report);
            }
        }
    }

    /// Handle keyboard event, returns `true` to quit
    async fn handle_key_event(&mut self, code: KeyCode) -> bool {
        if self.state.input_mode == InputMode::EditingUrl {
            self.handle_url_input(code).await;
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                return !self.state.destruct_phase.is_running();
            }
            KeyCode::Esc => {
                if self.state.current_tab == Tab::SelfDestruct {
                    if self.state.can_navigate() {
                        self.switch_tab(Tab::Live);
                    }
                } else {
                    return true;
                }
            }
            KeyCode::Tab | KeyCode::Right if self.state.can_navigate() => {
                self.switch_tab(self.state.current_tab.next());
            }
            KeyCode::BackTab | KeyCode::Left if self.state.can_navigate() => {
                self.switch_tab(self.state.current_tab.previous());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.select_next();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.select_previous();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.start_monitoring();
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.stop_monitoring();
            }
            KeyCode::Char('u') | KeyCode::Char('U') if self.state.current_tab == Tab::Live => {
                self.state.begin_url_edit(self.session.base_url().raw());
            }
            KeyCode::Char('a') | KeyCode::Char('A') if self.state.can_navigate() => {
                self.switch_tab(Tab::Analytics);
            }
            KeyCode::Char('r') | KeyCode::Char('R') if self.state.current_tab == Tab::Analytics => {
                self.load_analytics();
            }
            KeyCode::Char('d') | KeyCode::Char('D') if self.state.can_navigate() => {
                self.switch_tab(Tab::SelfDestruct);
            }
            KeyCode::Char('Y')
                if self.state.current_tab == Tab::SelfDestruct
                    && self.state.can_confirm_destruct() =>
            {
                self.run_self_destruct();
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Enter
                if self.state.current_tab == Tab::SelfDestruct && self.state.can_navigate() =>
            {
                self.switch_tab(Tab::Live);
            }
            _ => {}
        }

        false
    }

    async fn handle_url_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter => {
                let url = self.state.commit_url_edit();
                let base_url = self.session.base_url();
                base_url.set(url);
                self.state.base_url = base_url.resolve();
                self.session
                    .alerts()
                    .info(format!("REST API URL set to {}", self.state.base_url))
                    .await;
            }
            KeyCode::Esc => self.state.cancel_url_edit(),
            KeyCode::Backspace => {
                self.state.url_input.pop();
            }
            KeyCode::Char(c) => self.state.url_input.push(c),
            _ => {}
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        let entering = tab != self.state.current_tab;

        if entering && tab == Tab::SelfDestruct {
            self.destruct_rx = None;
        }

        self.state.switch_tab(tab);

        if entering && tab == Tab::Analytics {
            self.load_analytics();
        }
    }

    fn start_monitoring(&mut self) {
        if !self.state.can_start() {
            return;
        }
        self.state.start_pending = true;

        let monitor = self.session.monitor().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = monitor.start().await.map_err(|e| format!("{e:#}"));
            tx.send(UiEvent::StartFinished(result)).ok();
        });
    }

    fn stop_monitoring(&mut self) {
        if self.state.stop_pending {
            return;
        }
        self.state.stop_pending = true;

        let monitor = self.session.monitor().clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = monitor
                .stop(true)
                .await
                .map(|_| ())
                .map_err(|e| format!("{e:#}"));
            tx.send(UiEvent::StopFinished(result)).ok();
        });
    }

    fn load_analytics(&mut self) {
        if self.state.analytics == AnalyticsView::Loading {
            return;
        }
        self.state.analytics = AnalyticsView::Loading;

        let session = self.session.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tx.send(UiEvent::AnalyticsLoaded(session.analytics().await))
                .ok();
        });
    }

    fn run_self_destruct(&mut self) {
        let destruct = self.session.self_destruct();
        self.destruct_rx = Some(destruct.subscribe());
        self.state.destruct_phase = DestructPhase::Running(DestructStep::DeleteBucket);

        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let report = destruct.run().await;
            tx.send(UiEvent::SelfDestructFinished(report)).ok();
        });
    }
}

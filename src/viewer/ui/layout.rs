//! Main dashboard layout

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::actors::messages::MonitorStatus;
use crate::viewer::state::{AppState, InputMode, Tab};

use super::{alerts, analytics, live, self_destruct};

/// Render the main dashboard UI
pub fn render(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], state);
    render_content(frame, chunks[1], state);
    render_footer(frame, chunks[2], state);
}

/// Render header with tabs
fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let titles: Vec<&str> = Tab::ALL.iter().map(Tab::title).collect();

    let title = match &state.alert_email {
        Some(email) => format!("Security Camera | Alerts to {email}"),
        None => "Security Camera".to_string(),
    };

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .select(state.current_tab.index())
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Render main content area based on selected tab
fn render_content(frame: &mut Frame, area: Rect, state: &AppState) {
    match state.current_tab {
        Tab::Live => live::render(frame, area, state),
        Tab::Alerts => alerts::render(frame, area, state),
        Tab::Analytics => analytics::render(frame, area, state),
        Tab::SelfDestruct => self_destruct::render(frame, area, state),
    }
}

/// Render footer with status and keybindings
fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let key = Style::default().fg(Color::Yellow);

    let mut footer_text = if state.input_mode == InputMode::EditingUrl {
        vec![
            Span::raw("Save: "),
            Span::styled("Enter", key),
            Span::raw(" | Cancel: "),
            Span::styled("Esc", key),
            Span::raw(" | "),
        ]
    } else {
        vec![
            Span::raw("Tab: "),
            Span::styled("←/→", key),
            Span::raw(" | Start: "),
            Span::styled("S", key),
            Span::raw(" | Stop: "),
            Span::styled("X", key),
            Span::raw(" | URL: "),
            Span::styled("U", key),
            Span::raw(" | Analytics: "),
            Span::styled("A", key),
            Span::raw(" | Destruct: "),
            Span::styled("D", key),
            Span::raw(" | Quit: "),
            Span::styled("Q", key),
            Span::raw(" | "),
        ]
    };

    // Monitoring status
    let status_color = match state.monitor_status {
        MonitorStatus::Active => Color::Green,
        MonitorStatus::Starting => Color::Yellow,
        MonitorStatus::Idle => Color::Gray,
    };
    footer_text.push(Span::styled(
        format!("● {}", state.monitor_status.label()),
        Style::default().fg(status_color),
    ));

    footer_text.push(Span::raw(" | "));
    footer_text.push(Span::styled(
        state.base_url.as_str(),
        Style::default().fg(Color::DarkGray),
    ));

    let footer =
        Paragraph::new(Line::from(footer_text)).block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

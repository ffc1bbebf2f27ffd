//! Live feed tab UI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::actors::messages::MonitorStatus;
use crate::viewer::state::{AppState, InputMode};

use super::alerts::alert_line;

/// Render live feed tab
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Feed and controls
            Constraint::Percentage(45), // Recent alerts
        ])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Feed
            Constraint::Length(5), // Controls
            Constraint::Length(3), // URL field
        ])
        .split(chunks[0]);

    render_feed(frame, left[0], state);
    render_controls(frame, left[1], state);
    render_url_field(frame, left[2], state);
    render_recent_alerts(frame, chunks[1], state);
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}

fn render_feed(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Video Feed");

    let Some(current) = &state.frame else {
        let hint = match state.monitor_status {
            MonitorStatus::Idle => "No video. Press S to start monitoring.",
            _ => "Waiting for the first frame...",
        };
        let placeholder = Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(block);

        frame.render_widget(placeholder, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let lines = vec![
        Line::from(Span::styled(
            "● LIVE",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Format: ", label),
            Span::raw(current.format.as_str()),
        ]),
        Line::from(vec![
            Span::styled("Size: ", label),
            Span::raw(format_size(current.size)),
        ]),
        Line::from(vec![
            Span::styled("Received: ", label),
            Span::raw(current.received_at.format("%H:%M:%S%.3f").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Frames: ", label),
            Span::raw(state.frames_received.to_string()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn control(key: &'static str, label: &'static str, enabled: bool, color: Color) -> Line<'static> {
    let style = if enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Line::from(vec![
        Span::styled(format!("[{key}] "), style),
        Span::styled(label, style),
    ])
}

fn render_controls(frame: &mut Frame, area: Rect, state: &AppState) {
    let lines = vec![
        control("S", "Start Monitoring", state.can_start(), Color::Green),
        control("X", "Stop Monitoring", state.can_stop(), Color::Yellow),
        control("D", "Self Destruct", state.can_navigate(), Color::Red),
    ];

    let controls = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Controls | {}", state.monitor_status.label())),
    );

    frame.render_widget(controls, area);
}

fn render_url_field(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style, title) = match state.input_mode {
        InputMode::EditingUrl => (
            format!("{}▏", state.url_input),
            Style::default().fg(Color::Yellow),
            "REST API URL (editing)",
        ),
        InputMode::Normal => (state.base_url.clone(), Style::default(), "REST API URL"),
    };

    let field = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(field, area);
}

fn render_recent_alerts(frame: &mut Frame, area: Rect, state: &AppState) {
    // Newest at the bottom, as many as fit
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.alerts.len().saturating_sub(visible);

    let items: Vec<ListItem> = state
        .alerts
        .iter()
        .skip(skip)
        .map(|alert| ListItem::new(alert_line(alert)))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Alerts"));

    frame.render_widget(list, area);
}

//! Alerts tab UI

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::alerts::{AlertEntry, AlertLevel};
use crate::viewer::state::AppState;

/// Color and icon for an alert level
pub fn level_style(level: AlertLevel) -> (Color, &'static str) {
    match level {
        AlertLevel::Info => (Color::Blue, "ℹ "),
        AlertLevel::Success => (Color::Green, "✔ "),
        AlertLevel::Warning => (Color::Yellow, "⚠ "),
        AlertLevel::Error => (Color::Red, "✖ "),
    }
}

/// One log line: timestamp, level icon, message
pub fn alert_line(alert: &AlertEntry) -> Line<'_> {
    let (color, icon) = level_style(alert.level);
    let timestamp = alert.timestamp.format("%H:%M:%S");

    let message_style = if alert.level.is_failure() {
        Style::default().fg(color)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(
            format!("[{}] ", timestamp),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(icon, Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(alert.message.as_str(), message_style),
    ])
}

/// Render alerts tab
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.alerts.is_empty() {
        let message = Paragraph::new("No alerts yet")
            .block(Block::default().borders(Borders::ALL).title("Alert Log"))
            .style(Style::default().fg(Color::Gray));

        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = state
        .alerts
        .iter()
        .rev() // Show newest first
        .enumerate()
        .map(|(i, alert)| {
            let mut style = Style::default();
            if i == state.selected_alert {
                style = style.bg(Color::DarkGray).add_modifier(Modifier::BOLD);
            }

            ListItem::new(alert_line(alert)).style(style)
        })
        .collect();

    let failures = state
        .alerts
        .iter()
        .filter(|alert| alert.level.is_failure())
        .count();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(format!(
        "Alert Log ({} total, {} problems)",
        state.alerts.len(),
        failures
    )));

    frame.render_widget(list, area);
}

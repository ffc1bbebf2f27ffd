//! Analytics tab UI

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Paragraph},
};

use crate::analytics::AnalyticsReport;
use crate::viewer::state::{AnalyticsView, AppState};

/// Render analytics tab
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Security Analytics");

    let message = match &state.analytics {
        AnalyticsView::Loaded(report) if !report.is_empty() => {
            render_report(frame, area, report);
            return;
        }
        AnalyticsView::Loaded(_) => Paragraph::new("No images found in the database.")
            .style(Style::default().fg(Color::Gray)),
        AnalyticsView::NotLoaded | AnalyticsView::Loading => {
            Paragraph::new("Loading analytics data...").style(Style::default().fg(Color::Gray))
        }
        AnalyticsView::Failed(error) => {
            Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red))
        }
    };

    frame.render_widget(message.alignment(Alignment::Center).block(block), area);
}

fn render_report(frame: &mut Frame, area: Rect, report: &AnalyticsReport) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Stat cards
            Constraint::Min(0),    // Recent alerts
        ])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(chunks[0]);

    render_stat(
        frame,
        cards[0],
        "Total Images",
        report.total_images.to_string(),
    );
    render_stat(
        frame,
        cards[1],
        "Alerts Detected",
        report.images_with_alerts.to_string(),
    );

    let rate = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Alert Rate"))
        .gauge_style(Style::default().fg(Color::Red))
        .ratio((report.alert_rate / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", report.alert_rate));
    frame.render_widget(rate, cards[2]);

    render_recent_alerts(frame, chunks[1], report);
}

fn render_stat(frame: &mut Frame, area: Rect, title: &'static str, value: String) {
    let stat = Paragraph::new(Line::from(Span::styled(
        value,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(title));

    frame.render_widget(stat, area);
}

fn render_recent_alerts(frame: &mut Frame, area: Rect, report: &AnalyticsReport) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Recent Security Alerts");

    if report.recent_alerts.is_empty() {
        let message = Paragraph::new("No security alerts recorded.")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = report
        .recent_alerts
        .iter()
        .map(|image| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", image.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("File: {} ", image.filename)),
                Span::styled(
                    format!("Alerts: {}", image.alert_count),
                    Style::default().fg(Color::Red),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

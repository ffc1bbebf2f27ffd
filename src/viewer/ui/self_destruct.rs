//! Self-destruct confirmation tab UI

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::self_destruct::DestructPhase;
use crate::viewer::state::AppState;

/// Render self-destruct tab
pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let phase = &state.destruct_phase;

    let phase_style = match phase {
        DestructPhase::Ready => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        DestructPhase::Running(_) => Style::default().fg(Color::Yellow),
        DestructPhase::Finished { success: true } => Style::default().fg(Color::Green),
        DestructPhase::Finished { success: false } => Style::default().fg(Color::Red),
    };

    let mut lines = vec![
        Line::from(Span::styled(
            "SELF DESTRUCT",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(phase.message(), phase_style)),
        Line::from(""),
    ];

    if let Some(report) = &state.destruct_report {
        for outcome in &report.steps {
            let (icon, color) = if outcome.success {
                ("✔ ", Color::Green)
            } else {
                ("✖ ", Color::Red)
            };
            lines.push(Line::from(vec![
                Span::styled(icon, Style::default().fg(color)),
                Span::styled(
                    format!("{}: ", outcome.step.name()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(outcome.detail.as_str()),
            ]));
        }
        lines.push(Line::from(""));
    }

    let key = Style::default().fg(Color::Yellow);
    match phase {
        DestructPhase::Ready => {
            lines.push(Line::from(
                "This action cannot be undone! Are you sure you want to proceed?",
            ));
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::styled("[Y] ", key),
                Span::styled(
                    "CONFIRM DELETE",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw("    "),
                Span::styled("[N] ", key),
                Span::raw("Nevermind"),
            ]));
        }
        DestructPhase::Running(_) => {
            lines.push(Line::from(Span::styled(
                "Please wait...",
                Style::default().fg(Color::Gray),
            )));
        }
        DestructPhase::Finished { .. } => {
            lines.push(Line::from(vec![
                Span::styled("[Enter] ", key),
                Span::raw("Return to Main Screen"),
            ]));
        }
    }

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title("Self Destruct"),
        );

    frame.render_widget(panel, area);
}

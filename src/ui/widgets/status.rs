// src/ui/widgets/status.rs

use crate::app::App;
use crate::core::health::ServiceStatus;
use crate::core::renderer::EmotionList;
use chrono::NaiveDateTime;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};
use rust_i18n::t;

/// Renders the side panel: service health first, then metadata of the last
/// analysis and a gauge for its strongest emotion.
pub fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let container = Block::default().borders(Borders::ALL).title(t!("status.title").to_string());
    frame.render_widget(container, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(5), // Service section
            Constraint::Length(1), // Spacer
            Constraint::Length(4), // Last analysis section
            Constraint::Length(1), // Gauge label
            Constraint::Length(1), // Gauge
            Constraint::Min(0),
        ])
        .split(area);

    // --- Service Section ---
    let (icon, state_text, state_style) = match &app.service_status {
        ServiceStatus::Checking => ("…", t!("status.checking"), Style::default().fg(Color::Gray)),
        ServiceStatus::Ready { .. } => ("✓", t!("status.ready"), Style::default().fg(Color::Green)),
        ServiceStatus::Unconfigured { .. } => ("⚠", t!("status.unconfigured"), Style::default().fg(Color::Yellow)),
        ServiceStatus::Degraded { .. } => ("⚠", t!("status.degraded"), Style::default().fg(Color::Yellow)),
        ServiceStatus::Unreachable { .. } => ("✕", t!("status.unreachable"), Style::default().fg(Color::Red)),
    };
    let mut service_lines = vec![
        Line::from(vec![Span::styled(format!("{} ", icon), state_style), Span::styled(state_text.to_string(), state_style.bold())]),
        Line::from(vec![
            Span::raw(format!("{}: ", t!("status.endpoint"))),
            Span::styled(app.api().base_url().to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(format!("{}: {} MB", t!("status.max_file_size"), app.collector().max_file_size_mb())),
    ];
    if let Some(model) = app.service_status.model() {
        service_lines.push(Line::from(format!("{}: {}", t!("status.model"), model)));
    }
    frame.render_widget(Paragraph::new(service_lines).wrap(Wrap { trim: true }), chunks[0]);

    let Some(report) = &app.last_report else {
        return;
    };

    // --- Last Analysis Section ---
    let mut report_lines = vec![Line::from(t!("status.last_analysis").to_string().bold())];
    if let Some(length) = report.text_length {
        report_lines.push(Line::from(format!("{}: {} {}", t!("status.text_length"), length, t!("status.characters"))));
    }
    if let Some(at) = &report.analyzed_at {
        report_lines.push(Line::from(format!("{}: {}", t!("status.analyzed_at"), format_timestamp(at))));
    }
    frame.render_widget(Paragraph::new(report_lines).wrap(Wrap { trim: true }), chunks[2]);

    // --- Strongest Emotion Gauge ---
    let strongest = app.rendered.as_ref().and_then(|rendered| match &rendered.emotions {
        EmotionList::Entries(entries) => entries
            .iter()
            .max_by(|a, b| a.ratio.total_cmp(&b.ratio)),
        EmotionList::Placeholder(_) => None,
    });
    if let Some(emotion) = strongest {
        frame.render_widget(Paragraph::new(emotion.label.clone().bold()), chunks[3]);
        let gauge = Gauge::default()
            .ratio(emotion.ratio)
            .label(emotion.value_text.clone())
            .gauge_style(Style::default().fg(Color::Magenta));
        frame.render_widget(gauge, chunks[4]);
    }
}

/// The service stamps results with a naive ISO-8601 time; show it compactly.
fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

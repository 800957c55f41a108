// src/ui/widgets/analysis_view.rs

use crate::app::App;
use crate::core::renderer::{EmotionList, NoteBlock, RenderedEmotion, RenderedResult};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};
use rust_i18n::t;

pub fn render_analysis_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title(t!("result.panel_title").to_string());

    let Some(rendered) = &app.rendered else {
        let welcome = Paragraph::new(t!("result.welcome").to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(main_block);
        frame.render_widget(welcome, area);
        return;
    };

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    // Leave one column for the scrollbar.
    let bar_width = inner_area.width.saturating_sub(4).min(40) as usize;
    let lines = build_result_lines(rendered, bar_width);
    let total_lines = lines.len();

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(paragraph, inner_area);

    app.report_scroll_state = app
        .report_scroll_state
        .content_length(total_lines)
        .position(app.scroll_offset);
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        inner_area,
        &mut app.report_scroll_state,
    );
}

fn heading(text: &str) -> Line<'static> {
    Line::from(text.to_string().yellow().bold())
}

fn build_result_lines(rendered: &RenderedResult, bar_width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(rendered.title.clone().bold().underlined()),
        Line::from(""),
        heading(&rendered.dominant_heading),
    ];

    let badge_style = if rendered.dominant.is_placeholder {
        Style::default().fg(Color::DarkGray).italic()
    } else {
        Style::default().fg(Color::Black).bg(Color::Magenta).bold()
    };
    lines.push(Line::from(Span::styled(format!(" {} ", rendered.dominant.value), badge_style)));
    lines.push(Line::from(vec![
        Span::raw(format!("{}: ", rendered.tone.label)),
        Span::styled(rendered.tone.value.clone(), Style::default().bold()),
    ]));
    lines.push(Line::from(""));

    lines.push(heading(&rendered.emotions_heading));
    match &rendered.emotions {
        EmotionList::Placeholder(text) => {
            lines.push(Line::from(text.clone().dark_gray().italic()));
        }
        EmotionList::Entries(entries) => {
            for emotion in entries {
                push_emotion(&mut lines, emotion, bar_width);
            }
        }
    }

    for block in [&rendered.cultural_notes, &rendered.summary].into_iter().flatten() {
        push_note(&mut lines, block);
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" ⤓ {} ", rendered.export_label),
        Style::default().fg(Color::Black).bg(Color::Cyan),
    )));
    lines
}

fn push_emotion(lines: &mut Vec<Line<'static>>, emotion: &RenderedEmotion, bar_width: usize) {
    lines.push(Line::from(vec![
        Span::styled(emotion.label.clone(), Style::default().bold()),
        Span::raw(" "),
        Span::styled(emotion.value_text.clone(), Style::default().fg(Color::Cyan)),
    ]));

    let filled = ((emotion.ratio * bar_width as f64).round() as usize).min(bar_width);
    lines.push(Line::from(vec![
        Span::styled("█".repeat(filled), Style::default().fg(Color::Magenta)),
        Span::styled("░".repeat(bar_width - filled), Style::default().fg(Color::DarkGray)),
    ]));

    if let Some(context) = &emotion.context {
        lines.push(Line::from(context.clone().dark_gray().italic()));
    }
    for passage in &emotion.passages {
        lines.push(Line::from(format!("  « {} »", passage).italic()));
    }
}

fn push_note(lines: &mut Vec<Line<'static>>, block: &NoteBlock) {
    lines.push(Line::from(""));
    lines.push(heading(&block.heading));
    lines.push(Line::from(block.body.clone()));
}

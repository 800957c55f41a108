// src/ui/widgets/input.rs

use ratatui::{prelude::*, widgets::{Block, Borders, Paragraph}};
use rust_i18n::t;
use crate::app::{App, InputMode, SPINNER_CHARS};

/// Renders the prompt and, on its right, the submission control.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let control = app.control();
    let control_text = if control.is_enabled() {
        format!(" {} ", control.label())
    } else {
        format!(" {} {} ", SPINNER_CHARS[app.spinner_frame], control.label())
    };
    let control_width = (control_text.chars().count() as u16 + 2).min(area.width / 2);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(control_width)])
        .split(area);

    let (title, value, color) = match app.input_mode {
        InputMode::Text => (t!("input.text_title"), app.input.as_str(), Color::Yellow),
        InputMode::File => {
            let extensions = app.collector().allowed_list();
            (t!("input.file_title", extensions = extensions), app.file_input.as_str(), Color::Cyan)
        }
    };

    let inner_width = chunks[0].width.saturating_sub(2) as usize;
    let (hidden, cursor) = prompt_window(value.chars().count(), inner_width);

    let input_paragraph = Paragraph::new(value)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .style(Style::default().fg(color))
        .scroll((0, hidden as u16));
    frame.render_widget(input_paragraph, chunks[0]);

    if inner_width > 0 {
        frame.set_cursor_position((chunks[0].x + 1 + cursor as u16, chunks[0].y + 1));
    }

    let control_style = if control.is_enabled() {
        Style::default().fg(Color::Black).bg(Color::Green).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let control_paragraph = Paragraph::new(control_text)
        .style(control_style)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(control_paragraph, chunks[1]);
}

/// Single-line prompt: keeps the end of long input in view. Returns how many
/// characters scroll off to the left and the cursor column inside the box.
fn prompt_window(typed: usize, inner_width: usize) -> (usize, usize) {
    let hidden = (typed + 1).saturating_sub(inner_width);
    (hidden, typed.saturating_sub(hidden).min(inner_width.saturating_sub(1)))
}

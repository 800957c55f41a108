// src/ui/widgets/footer.rs

use crate::app::{App, InputMode};
use ratatui::{
    prelude::*,
    style::{Color, Style},
    widgets::Paragraph,
};
use rust_i18n::t;

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hints = match app.input_mode {
        InputMode::Text => t!("footer.text_mode"),
        InputMode::File => t!("footer.file_mode"),
    };

    let footer = Paragraph::new(hints.to_string())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

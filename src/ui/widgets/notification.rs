// src/ui/widgets/notification.rs

use crate::app::App;
use crate::core::notification::{NotificationPhase, Severity};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use std::time::Instant;

const MAX_WIDTH: u16 = 56;

/// Draws the current notification, if any, in the top-right corner.
pub fn render_notification(frame: &mut Frame, app: &App, area: Rect) {
    let Some(notification) = app.notification() else {
        return;
    };

    let color = match notification.severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Warning => Color::Yellow,
        Severity::Info => Color::Cyan,
    };
    let mut style = Style::default().fg(color);
    if notification.phase(Instant::now()) == NotificationPhase::Fading {
        style = style.add_modifier(Modifier::DIM);
    }

    let text = format!("{} {}", notification.severity.icon(), notification.message);
    let popup_area = corner_rect(&text, area);

    let popup = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style));

    // `Clear` keeps the widgets underneath from bleeding through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// A box in the top-right corner, tall enough for the wrapped message.
fn corner_rect(text: &str, r: Rect) -> Rect {
    let width = MAX_WIDTH.min(r.width);
    let inner_width = width.saturating_sub(2).max(1) as usize;
    let text_lines = text.chars().count().div_ceil(inner_width).max(1) as u16;
    let height = (text_lines + 2).min(r.height);
    Rect {
        x: r.x + r.width - width,
        y: r.y,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_rect_is_anchored_top_right() {
        let area = Rect::new(0, 0, 120, 40);
        let rect = corner_rect("✓ ok", area);
        assert_eq!(rect, Rect::new(64, 0, 56, 3));
    }

    #[test]
    fn long_messages_get_taller_boxes() {
        let area = Rect::new(0, 0, 30, 40);
        let rect = corner_rect(&"x".repeat(60), area);
        assert_eq!(rect.width, 30);
        assert_eq!(rect.height, 5);
    }
}

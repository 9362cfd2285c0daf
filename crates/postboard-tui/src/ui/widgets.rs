//! Small building blocks the pages are composed from: cards, buttons,
//! text fields and message banners.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::styles;

/// Width of the value area in a text field
pub const FIELD_WIDTH: usize = 28;

/// Bordered panel with a title
pub fn card(title: &str, focused: bool) -> Block<'_> {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));
    if title.is_empty() {
        block
    } else {
        block
            .title(format!(" {} ", title))
            .title_style(styles::title_style())
    }
}

/// A button rendered as `[ label ]`, highlighted when focused
pub fn button(label: &str, focused: bool, disabled: bool) -> Span<'static> {
    let text = if focused && !disabled {
        format!(" ▶ {} ◀ ", label)
    } else {
        format!("   {}   ", label)
    };
    Span::styled(text, styles::button_style(focused, disabled))
}

/// Labelled single-line input plus its validation message, if any.
pub fn text_field(
    label: &str,
    value: &str,
    masked: bool,
    focused: bool,
    error: Option<&str>,
) -> Vec<Line<'static>> {
    let shown = if masked { mask(value) } else { value.to_string() };
    let shown = tail(&shown, FIELD_WIDTH);
    let cursor = if focused { "▌" } else { " " };
    let value_style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };

    let mut lines = vec![
        Line::from(Span::styled(label.to_string(), styles::muted_style())),
        Line::from(vec![
            Span::styled("[", styles::border_style(focused)),
            Span::styled(format!("{:<width$}{}", shown, cursor, width = FIELD_WIDTH), value_style),
            Span::styled("]", styles::border_style(focused)),
        ]),
    ];
    match error {
        Some(message) => lines.push(Line::from(Span::styled(message.to_string(), styles::error_style()))),
        None => lines.push(Line::from("")),
    }
    lines
}

/// Full-width message box for errors
pub fn error_banner(message: &str) -> Paragraph<'_> {
    let style = styles::error_style();
    Paragraph::new(Line::from(Span::styled(message, style)))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(style))
}

/// Create a centered rectangle with fixed dimensions
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn mask(value: &str) -> String {
    "*".repeat(value.chars().count())
}

/// Last `max` characters, so the cursor end of a long value stays visible
fn tail(value: &str, max: usize) -> String {
    let count = value.chars().count();
    value.chars().skip(count.saturating_sub(max)).collect()
}

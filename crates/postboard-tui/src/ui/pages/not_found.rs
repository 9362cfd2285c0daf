use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::ui::{styles, widgets};

pub fn render(frame: &mut Frame, path: &str, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("404", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled("Page Not Found", styles::heading_style())),
        Line::from(Span::styled(
            format!("Nothing lives at {}", path),
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("1", styles::help_key_style()),
            Span::styled(" to go home", styles::muted_style()),
        ]),
    ];

    let area = widgets::centered_rect_fixed(48, 11, area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(widgets::card("", false));
    frame.render_widget(paragraph, area);
}

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use postboard_core::router::Route;

use crate::app::{App, AppState};

use super::pages::{dashboard, home, login, not_found};
use super::{styles, widgets};

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session_state();
    let current = app.current_route();

    let mut nav: Vec<(String, bool)> = vec![("[1] Home".to_string(), *current == Route::Home)];
    if session.is_authenticated {
        nav.push(("[2] Dashboard".to_string(), *current == Route::Dashboard));
        let who = session.display_name().unwrap_or("user");
        nav.push((format!("[o] Logout ({})", who), false));
    } else {
        nav.push(("[3] Login".to_string(), *current == Route::Login));
    }

    let title = "  Postboard";
    let nav_width: usize = nav.iter().map(|(label, _)| label.chars().count()).sum::<usize>()
        + nav.len().saturating_sub(1) * 3
        + 2;

    let mut spans = vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + nav_width),
        )),
    ];
    for (i, (label, active)) in nav.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", styles::muted_style()));
        }
        spans.push(Span::styled(label, styles::nav_style(active)));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    match app.current_route() {
        Route::Home => home::render(frame, app, area),
        Route::Login => login::render(frame, app, area),
        Route::Dashboard => {
            // Nothing protected is drawn until the session is known
            if app.session.is_authenticated() {
                dashboard::render(frame, app, area);
            }
        }
        Route::NotFound(path) => not_found::render(frame, path, area),
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = "[?] help | [q]uit";

    let (left_text, left_style) = match app.status_message {
        Some(ref msg) => (format!(" {} ", msg), styles::success_style()),
        None => (format!(" {} ", app.current_route().title()), styles::muted_style()),
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, left_style),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);
    let paragraph = Paragraph::new(status_line).style(styles::status_bar_style());
    frame.render_widget(paragraph, area);
}

fn help_line(key: &'static str, description: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", key), styles::help_key_style()),
        Span::styled(description, styles::help_desc_style()),
    ])
}

fn render_help_overlay(frame: &mut Frame) {
    let area = widgets::centered_rect_fixed(48, 20, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let version = env!("CARGO_PKG_VERSION");

    let help_text = vec![
        Line::from(Span::styled("  Postboard", styles::title_style())),
        Line::from(Span::styled(format!("  version {}", version), styles::muted_style())),
        Line::from(""),
        Line::from(Span::styled(" Navigation", styles::heading_style())),
        help_line("1/2/3", "Home / Dashboard / Login"),
        help_line("Esc", "Go back"),
        help_line("Tab", "Next field (login)"),
        help_line("↑/↓ j/k", "Move through posts"),
        help_line("Enter", "Open post / activate"),
        Line::from(""),
        Line::from(Span::styled(" Actions", styles::heading_style())),
        help_line("r", "Reload posts"),
        help_line("o", "Log out"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled("       Press ", styles::muted_style()),
            Span::styled("?", styles::help_key_style()),
            Span::styled(" or ", styles::muted_style()),
            Span::styled("Esc", styles::help_key_style()),
            Span::styled(" to close", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(help_text).block(block);

    frame.render_widget(paragraph, area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = widgets::centered_rect_fixed(40, 7, frame.area());

    // Clear the area
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::heading_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines).block(block);

    frame.render_widget(paragraph, area);
}

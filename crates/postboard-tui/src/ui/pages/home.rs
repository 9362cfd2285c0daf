use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::{styles, widgets};

const FEATURES: [(&str, &str); 4] = [
    (
        "User Authentication",
        "Sign in once and stay signed in across restarts",
    ),
    (
        "Data Fetching",
        "Posts and authors loaded from the demo API in the background",
    ),
    (
        "Dynamic Rendering",
        "Views follow the session as you sign in and out",
    ),
    (
        "Keyboard Driven",
        "Every page is reachable without leaving the home row",
    ),
];

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(6)])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_features(frame, chunks[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let label = if app.session.is_authenticated() {
        "Go to Dashboard"
    } else {
        "Login to Continue"
    };

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Welcome to Postboard", styles::title_style())),
        Line::from(Span::styled(
            "A small post browser with a demo sign-in",
            styles::muted_style(),
        )),
        Line::from(""),
        Line::from(widgets::button(label, true, false)),
        Line::from(""),
        Line::from(Span::styled("press Enter", styles::muted_style())),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(widgets::card("", false));
    frame.render_widget(paragraph, area);
}

fn render_features(frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((title, description), column) in FEATURES.iter().zip(columns.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(*description, styles::list_item_style())))
            .wrap(Wrap { trim: true })
            .block(widgets::card(title, false));
        frame.render_widget(paragraph, *column);
    }
}

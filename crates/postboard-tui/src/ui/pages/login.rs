use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use crate::app::{App, LoginFocus};
use crate::ui::widgets;
use crate::ui::styles;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let session = app.session_state();
    let busy = session.loading || app.login_in_progress();
    let height = if session.error.is_some() { 20 } else { 17 };
    let area = widgets::centered_rect_fixed(46, height, area);

    frame.render_widget(Clear, area);
    frame.render_widget(widgets::card("Login", true), area);

    let inner = area.inner(ratatui::layout::Margin::new(2, 1));
    let mut constraints = vec![];
    if session.error.is_some() {
        constraints.push(Constraint::Length(3)); // Error banner
    }
    constraints.extend([
        Constraint::Length(3), // Email
        Constraint::Length(3), // Password
        Constraint::Length(2), // Button
        Constraint::Min(2),    // Help
    ]);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut index = 0;
    if let Some(ref error) = session.error {
        frame.render_widget(widgets::error_banner(error), chunks[0]);
        index = 1;
    }

    let form = &app.login_form;
    let email = widgets::text_field(
        "Email",
        &form.email,
        false,
        !busy && app.login_focus == LoginFocus::Email,
        form.errors.email.as_deref(),
    );
    frame.render_widget(Paragraph::new(email), chunks[index]);

    let password = widgets::text_field(
        "Password",
        &form.password,
        true,
        !busy && app.login_focus == LoginFocus::Password,
        form.errors.password.as_deref(),
    );
    frame.render_widget(Paragraph::new(password), chunks[index + 1]);

    let label = if busy { "Logging in..." } else { "Login" };
    let button = Paragraph::new(Line::from(widgets::button(
        label,
        app.login_focus == LoginFocus::Button,
        busy,
    )))
    .alignment(Alignment::Center);
    frame.render_widget(button, chunks[index + 2]);

    let help = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "You can use any email and password combination.",
            styles::muted_style(),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(help, chunks[index + 3]);
}

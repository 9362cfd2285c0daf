use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::widgets;
use crate::ui::styles;
use crate::utils::truncate_string;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;

    let mut area = area;
    if let Some(ref error) = dashboard.error {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)])
            .split(area);
        frame.render_widget(widgets::error_banner(error), chunks[0]);
        area = chunks[1];
    }

    if dashboard.loading {
        let loading = Paragraph::new(Line::from(Span::styled("Loading posts...", styles::muted_style())))
            .alignment(Alignment::Center)
            .block(widgets::card("Dashboard", false));
        frame.render_widget(loading, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(area);

    render_post_list(frame, app, chunks[0]);
    render_post_detail(frame, app, chunks[1]);
}

fn render_post_list(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let block = widgets::card("Recent Posts", true);

    if dashboard.posts.is_empty() {
        let empty = Paragraph::new("No posts available.").block(block);
        frame.render_widget(empty, area);
        return;
    }

    let width = area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = dashboard
        .posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            let marker = if dashboard.selected_post == Some(post.id) { "● " } else { "  " };
            let lines = vec![
                Line::from(vec![
                    Span::styled(marker, styles::title_style()),
                    Span::styled(truncate_string(&post.title, width.saturating_sub(2)), styles::heading_style()),
                ]),
                Line::from(Span::styled(
                    format!("  By: {}", dashboard.author_label(post)),
                    styles::muted_style(),
                )),
                Line::from(Span::raw(format!(
                    "  {}",
                    truncate_string(post.preview(), width.saturating_sub(2))
                ))),
            ];

            let style = if i == dashboard.selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(lines).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default();
    state.select(Some(dashboard.selection));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_post_detail(frame: &mut Frame, app: &App, area: Rect) {
    let dashboard = &app.dashboard;
    let block = widgets::card("Post", false);

    let Some(post) = dashboard.selected() else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Select a post to view details", styles::muted_style())),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(hint, area);
        return;
    };

    let author = dashboard.author_of(post);
    let name = author.map(|a| a.name.as_str()).unwrap_or("Unknown");
    let email = author.map(|a| a.email.as_str()).unwrap_or("Unknown");

    let lines = vec![
        Line::from(Span::styled(post.title.clone(), styles::title_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" Author: ", styles::detail_author_style()),
            Span::styled(format!("{} ", name), styles::detail_author_style()),
        ]),
        Line::from(vec![
            Span::styled(" Email:  ", styles::detail_author_style()),
            Span::styled(format!("{} ", email), styles::detail_author_style()),
        ]),
        Line::from(""),
    ]
    .into_iter()
    .chain(post.body.lines().map(|l| Line::from(l.to_string())))
    .collect::<Vec<_>>();

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    frame.render_widget(paragraph, area);
}

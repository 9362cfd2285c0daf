//! Color palette and text styles shared by every page.

use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const PRIMARY: Color = Color::Rgb(66, 133, 244);
pub const PRIMARY_DARK: Color = Color::Rgb(51, 103, 214);
pub const SECONDARY: Color = Color::Rgb(232, 234, 237);
pub const TEXT: Color = Color::White;
pub const TEXT_LIGHT: Color = Color::Rgb(128, 134, 139);
pub const ERROR: Color = Color::Rgb(217, 48, 37);
pub const SUCCESS: Color = Color::Rgb(15, 157, 88);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn heading_style() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(TEXT_LIGHT)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS)
}

pub fn nav_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(PRIMARY)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(TEXT_LIGHT)
    }
}

pub fn button_style(focused: bool, disabled: bool) -> Style {
    if disabled {
        Style::default().fg(TEXT_LIGHT).bg(HIGHLIGHT)
    } else if focused {
        Style::default()
            .fg(Color::White)
            .bg(PRIMARY_DARK)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White).bg(PRIMARY)
    }
}

pub fn detail_author_style() -> Style {
    Style::default().fg(Color::Black).bg(SECONDARY)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}

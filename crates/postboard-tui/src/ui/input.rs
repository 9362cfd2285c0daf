//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use postboard_core::router::Route;

use crate::app::{App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // The login page owns printable keys
    if *app.current_route() == Route::Login {
        return handle_login_input(app, key);
    }

    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return Ok(false);
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return Ok(false);
        }
        KeyCode::Char('1') => app.navigate(Route::Home),
        KeyCode::Char('2') => app.navigate(Route::Dashboard),
        KeyCode::Char('3') => app.navigate(Route::Login),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Esc => {
            if *app.current_route() == Route::Dashboard && app.dashboard.selected_post.is_some() {
                app.dashboard.selected_post = None;
            } else {
                app.go_back();
            }
        }
        _ => match app.current_route() {
            Route::Home => {
                if key.code == KeyCode::Enter {
                    app.home_action();
                }
            }
            Route::Dashboard => handle_dashboard_input(app, key),
            Route::Login | Route::NotFound(_) => {}
        },
    }

    Ok(false)
}

fn handle_dashboard_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.dashboard.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.dashboard.select_next(),
        KeyCode::Enter => app.dashboard.open_selected(),
        KeyCode::Char('r') => {
            if !app.dashboard.loading {
                app.load_dashboard();
            }
        }
        _ => {}
    }
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Fields are locked while a sign-in is running
    if app.login_in_progress() {
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => app.go_back(),
        KeyCode::Down | KeyCode::Tab => {
            app.login_focus = app.login_focus.next();
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.login_focus = app.login_focus.prev();
        }
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Email => app.login_focus = LoginFocus::Password,
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace => match app.login_focus {
            LoginFocus::Email => {
                app.login_form.email.pop();
            }
            LoginFocus::Password => {
                app.login_form.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) => match app.login_focus {
            LoginFocus::Email => app.login_form.push_email_char(c),
            LoginFocus::Password => app.login_form.push_password_char(c),
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

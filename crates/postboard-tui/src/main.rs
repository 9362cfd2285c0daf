//! Postboard - a terminal client for browsing posts behind a demo sign-in.
//!
//! Runs the interactive TUI by default, optionally opened at a path such
//! as `postboard /dashboard`. `login`, `logout` and `whoami` subcommands
//! manage the stored session from the shell.

mod app;
mod ui;
mod utils;

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postboard_core::api::ApiClient;
use postboard_core::auth::{LoginForm, SessionProvider, SessionService};
use postboard_core::config::Config;
use postboard_core::router::Route;
use postboard_core::store::{FileStore, SessionStore};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const LOG_FILE_PREFIX: &str = "postboard.log";

fn env_filter() -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logging for subcommands goes to stderr
fn init_cli_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter())
        .init();
}

/// The TUI owns the terminal, so logs go to a daily file instead.
/// The returned guard flushes pending lines when dropped.
fn init_tui_tracing(config: &Config) -> Result<WorkerGuard> {
    let log_dir = config.log_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(env_filter())
        .init();
    Ok(guard)
}

/// Wire the API client, origin-scoped storage and session service together.
fn build_session(config: &Config) -> Result<(ApiClient, SessionService)> {
    let api = ApiClient::new(config.base_url())?;
    let store = SessionStore::new(Arc::new(FileStore::new(config.storage_dir()?)));
    let service = SessionService::new(Arc::new(api.clone()), store);
    Ok((api, service))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = Config::load()?;

    // Check for CLI commands
    let args: Vec<String> = std::env::args().collect();
    let start_path = args.get(1).filter(|arg| arg.starts_with('/')).cloned();
    if let Some(command) = args.get(1).filter(|_| start_path.is_none()) {
        init_cli_tracing();
        return match command.as_str() {
            "login" => login_command(config, args.get(2).cloned()).await,
            "logout" => logout_command(&config),
            "whoami" => whoami_command(&config),
            other => anyhow::bail!("Unknown command: {} (expected login, logout or whoami)", other),
        };
    }

    let _log_guard = init_tui_tracing(&config)?;
    info!("Postboard starting");

    let (api, service) = build_session(&config)?;
    let session = SessionProvider::new(service);
    session.initialize();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, session.clone(), api);
    if let Some(path) = start_path {
        app.navigate(Route::parse(&path));
    }

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    session.unmount();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Postboard shutting down");
    Ok(())
}

/// Sign in from the shell, prompting for whatever was not supplied
async fn login_command(mut config: Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| std::env::var(app::EMAIL_ENV).ok()) {
        Some(email) => email,
        None => prompt_email(config.last_email.as_deref())?,
    };
    let password = match std::env::var(app::PASSWORD_ENV) {
        Ok(password) => password,
        Err(_) => rpassword::prompt_password("Password: ")?,
    };

    let mut form = LoginForm::new(email, password);
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            for message in [errors.email, errors.password].into_iter().flatten() {
                eprintln!("{}", message);
            }
            anyhow::bail!("Invalid login details");
        }
    };

    let (_, service) = build_session(&config)?;
    let user = service
        .login(&credentials)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    config.last_email = Some(user.email.clone());
    config.save()?;

    println!("Signed in as {} <{}>", user.name, user.email);
    Ok(())
}

fn prompt_email(last_email: Option<&str>) -> Result<String> {
    match last_email {
        Some(last) => print!("Email [{}]: ", last),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        Ok(last_email.unwrap_or_default().to_string())
    } else {
        Ok(line.to_string())
    }
}

fn logout_command(config: &Config) -> Result<()> {
    let (_, service) = build_session(config)?;
    if service.is_authenticated() {
        service.logout();
        println!("Signed out");
    } else {
        println!("Not signed in");
    }
    Ok(())
}

fn whoami_command(config: &Config) -> Result<()> {
    let (_, service) = build_session(config)?;
    match service.restore() {
        Some(session) => println!("{}", serde_json::to_string_pretty(&session.user)?),
        None => println!("Not signed in"),
    }
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Draw UI
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                // Handle input
                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // Check for completed background tasks
        app.check_background_tasks().await;

        // Check if we should quit
        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

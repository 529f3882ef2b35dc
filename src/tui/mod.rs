//! # Module: TUI Dashboard
//!
//! ## Responsibility
//! A live ratatui terminal dashboard over a shared
//! [`MetricsAggregator`](crate::MetricsAggregator): complexity means, expert
//! utilisation bars, and a rolling complexity sparkline, refreshed four
//! times per second while pipelines keep recording on other threads.
//!
//! ## Guarantees
//! - Terminal state restored on exit, including on panic
//! - Clean shutdown on q, Esc, or Ctrl+C
//! - Read-only over the aggregator; pausing freezes the display, not
//!   collection
//!
//! ## NOT Responsible For
//! - Generating routing traffic (the demo binary drives the pipelines)
//! - Persisting metrics (ephemeral display only)

pub mod app;
pub mod events;
pub mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::metrics::MetricsAggregator;
use self::app::App;
use self::events::{apply_event, poll_event};

/// Input poll / render cadence.
const TICK_RATE: Duration = Duration::from_millis(100);

/// Snapshot refresh cadence: four updates per second.
const REFRESH_RATE: Duration = Duration::from_millis(250);

/// Set up the terminal for dashboard rendering.
///
/// # Errors
///
/// Returns `io::Error` if raw mode or the alternate screen cannot be
/// entered.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>, io::Error> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

/// Restore the terminal to its original state.
///
/// # Errors
///
/// Returns `io::Error` if the terminal cannot be restored.
fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<(), io::Error> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard event loop over a shared aggregator until the user
/// quits.
///
/// Installs a panic hook that restores the terminal before the panic
/// message prints, so a rendering bug never leaves the shell in raw mode.
///
/// # Errors
///
/// Returns `io::Error` if terminal setup, rendering, or restore fails.
pub fn run_dashboard(metrics: Arc<MetricsAggregator>) -> Result<(), io::Error> {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(metrics, REFRESH_RATE);
    let result = run_loop(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), io::Error> {
    let mut last_refresh = Instant::now();
    app.on_tick();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let event = poll_event(TICK_RATE);
        apply_event(app, event);

        if app.should_quit {
            tracing::info!(ticks = app.tick_count, "dashboard shutting down");
            return Ok(());
        }

        if last_refresh.elapsed() >= app.refresh {
            app.on_tick();
            last_refresh = Instant::now();
        }
    }
}

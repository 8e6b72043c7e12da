mod app;
mod config;
mod error;
mod logging;
mod motivation;
mod task;
mod task_board;
mod ui;
mod view;

use app::App;
use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use error::AppError;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{io, sync::Arc, time::Duration};
use tracing::info;

fn main() -> Result<(), AppError> {
    let config = Config::load()?;
    logging::init(&config)?;
    info!(api_url = %config.api_url, model = %config.model, "starting");

    // Quote requests run here while the UI loop owns the main thread.
    let runtime = tokio::runtime::Runtime::new()?;
    let tick = Duration::from_millis(config.tick_ms);
    let mut app = App::new(Arc::new(config), runtime.handle().clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = ui::run_app(&mut terminal, &mut app, tick);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // In-flight requests are dropped with the runtime.
    runtime.shutdown_background();

    if let Err(err) = result {
        eprintln!("{:?}", err);
    }
    info!("exiting");
    Ok(())
}

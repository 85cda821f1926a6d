use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{fs::File, io, sync::Mutex};
use taskboard::{
    config::Config,
    loader::load_initial_data,
    ui::{run_app, App},
    BoardStore, TaskEditController,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // The board owns the screen, so logs go to a file.
    let log_file = File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "taskboard=info".into()),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    info!(?config, "starting");

    let mut store = BoardStore::default();
    load_initial_data(&mut store, &config.source).await;
    let mut app = App::new(store, TaskEditController::new(config.default_list_id.clone()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        error!(%err, "board loop failed");
        eprintln!("{:?}", err);
    }
    Ok(())
}

use dagstertui::app::{AppState, Effect};
use dagstertui::cli::Cli;
use dagstertui::config::{self, Config};
use dagstertui::dagster::{DagsterExecutor, GraphqlExecutor};
use dagstertui::dispatch::{Dispatcher, Request, Submitted};
use dagstertui::events::{AppEvent, EventHandler};
use dagstertui::input::{self, InputContext};
use dagstertui::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

const TICK_RATE: Duration = Duration::from_millis(100);

fn setup_verbose_logging() -> Result<()> {
    let state_dir = dirs_next_or_fallback();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "dagstertui v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn dirs_next_or_fallback() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("dagstertui")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("dagstertui")
    } else {
        std::env::temp_dir().join("dagstertui")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    // Configuration problems are reported on the plain terminal.
    let config_path = match args.config.clone() {
        Some(path) => path,
        None => config::default_path()?,
    };
    let backend_url = Config::load(&config_path)?.resolve(&args.environment)?;
    tracing::info!(environment = %args.environment, url = %backend_url, "resolved environment");

    let executor: Arc<dyn DagsterExecutor> = Arc::new(GraphqlExecutor::new(&backend_url)?);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        SetTitle(format!("dagster {}", args.environment))
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut state = AppState::new(args.environment.clone(), backend_url);
    state.config.version_string = format!(
        "dagstertui v{}+{}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_NUMBER")
    );

    let events = EventHandler::new(TICK_RATE);
    let mut dispatcher = Dispatcher::new(executor, events.sender(), args.limit);
    dispatcher.submit(state.load_repositories());

    let result = run_app(&mut terminal, &mut state, events, &mut dispatcher).await;

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    mut events: EventHandler,
    dispatcher: &mut Dispatcher,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let size = terminal.size()?;
        tui::layout::fit_viewports(state, Rect::new(0, 0, size.width, size.height));
        state.busy = dispatcher.is_busy();

        terminal.draw(|f| tui::render::render(f, state))?;

        state.prune_notifications();
        state.prune_error();

        let Some(event) = events.next().await else {
            return Err(eyre!("event channel closed"));
        };
        match event {
            AppEvent::Key(key) => {
                let ctx = InputContext {
                    focus: state.focus.current(),
                };
                let action = input::map_key(key, &ctx);
                match state.handle_action(action) {
                    Some(Effect::Request(request)) => submit(state, dispatcher, request),
                    Some(Effect::OpenUrl(url)) => {
                        if let Err(e) = dispatcher.executor().open_in_browser(&url) {
                            state.set_error(format!("{e}"));
                        }
                    }
                    None => {}
                }
            }
            AppEvent::Resize => {}
            AppEvent::Tick => {
                if last_tick.elapsed() >= TICK_RATE {
                    state.advance_spinner();
                    state.refresh_live_run_info();
                    last_tick = Instant::now();
                }
            }
            AppEvent::Backend { ticket, result } => {
                dispatcher.finish(ticket);
                // Follow-ups refresh after a mutation; an older identical read is stale.
                if let Some(follow_up) = state.apply_result(result) {
                    dispatcher.refresh(follow_up);
                }
            }
            AppEvent::Fatal(msg) => {
                tracing::error!("{msg}");
                return Err(eyre!(msg));
            }
            AppEvent::Error(msg) => state.set_error(msg),
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

fn submit(state: &mut AppState, dispatcher: &mut Dispatcher, request: Request) {
    let label = request.label();
    if dispatcher.submit(request) == Submitted::Busy {
        state.set_error(format!("{label} is still running, try again shortly"));
    }
}

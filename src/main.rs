mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::live::{LiveMessage, LiveWorker};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let app = App::new();
    let settings = app.settings.clone();
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);
    let (live_tx, live_rx) = mpsc::channel::<LiveMessage>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // History thread
    let network_worker = NetworkWorker::new(&settings, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Live feed thread
    let live_worker = LiveWorker {
        url: settings.live_ws.clone(),
        events: live_tx,
    };
    let live_task = tokio::spawn(live_worker.run());

    // Trigger history load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(
        terminal,
        app,
        settings.history_start.clone(),
        ui_event_rx,
        network_req_tx,
        network_resp_rx,
        live_rx,
    )
    .await;

    input_handler.abort();
    network_task.abort();
    live_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("rpstui {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "rpstui - live and historical rock-paper-scissors results

Usage:
  rpstui
  rpstui --help
  rpstui --version

Environment:
  RPSTUI_API_BASE          History API base URL (default https://bad-api-assignment.reaktor.com)
  RPSTUI_LIVE_WS           Live WebSocket URL (default wss://bad-api-assignment.reaktor.com/rps/live)
  RPSTUI_PAGE_DELAY_MS     Pause between history pages in ms (default 100)
  RPSTUI_HISTORY_RETRIES   Retries per history page before giving up (default 3)
  RPSTUI_PAGE_SIZE         Rows added by load more: 100, 500, 1000 or 5000 (default 100)
  RPSTUI_LOG               Log level: error, warn, info, debug, trace (default error)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    history_start: String,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
    mut live_events: mpsc::Receiver<LiveMessage>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &history_start, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(live_event) = live_events.recv() => {
                let should_redraw = handle_live_message(live_event, &app).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            else => break,
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    history_start: &str,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let _ = network_requests
                .send(NetworkRequest::LoadHistory { cursor: history_start.to_string() })
                .await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_live_message(message: LiveMessage, app: &Arc<Mutex<App>>) -> bool {
    let mut guard = app.lock().await;
    match message {
        LiveMessage::Connected => guard.on_live_connected(),
        LiveMessage::Disconnected => guard.on_live_disconnected(),
        LiveMessage::Event(event) => guard.on_live_event(event),
        LiveMessage::Error(message) => guard.on_live_error(message),
    }
    true
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::HistoryPageLoaded { games } => {
            let mut guard = app.lock().await;
            guard.on_history_page(games);
        }
        NetworkResponse::HistoryFinished { pages, games } => {
            let mut guard = app.lock().await;
            guard.on_history_finished(pages, games);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let event = match tokio::task::spawn_blocking(crossterm_event::read).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                error!("input read failed: {e}");
                continue;
            }
            Err(_) => break,
        };

        let ui_event = match event {
            Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::{AppSettings, DEFAULT_POLL_SECS, DEFAULT_TIMEOUT_SECS};
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::{LevelFilter, info};
use savant_api::client::SavantApi;
use savant_api::stats::SeasonStats;
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc, watch};
use tui::{Terminal, backend::CrosstermBackend};

#[derive(Debug, PartialEq)]
enum CliAction {
    Exit,
    Run { game_pk: Option<u64> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let game_pk = match handle_cli_args() {
        CliAction::Exit => return Ok(()),
        CliAction::Run { game_pk } => game_pk,
    };

    better_panic::install();

    tui_logger::init_logger(LevelFilter::Trace)?;
    tui_logger::set_default_level(LevelFilter::Info);

    let settings = AppSettings::load().with_game(game_pk);
    let season = Arc::new(match settings.stats_dir.as_deref() {
        Some(dir) => SeasonStats::load_dir(dir),
        None => {
            info!("PITCHFX_STATS_DIR not set, stat tables will be empty");
            SeasonStats::default()
        }
    });

    let mut client = SavantApi::new().with_timeout(settings.http_timeout);
    if let Some(path) = settings.pitcher_dump.as_ref() {
        client = client.with_pitcher_dump(path);
    }

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal();

    let (target_tx, target_rx) = watch::channel(None);
    let poll_interval = settings.poll_interval;
    let mut app = App::new(settings, season, target_tx);
    if let Some(game_pk) = app.settings.game_pk {
        app.select_game(game_pk);
    }
    let app = Arc::new(Mutex::new(app));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, network_req_rx, network_resp_tx);
    let in_flight = network_worker.in_flight();
    let network_task = tokio::spawn(network_worker.run());

    // Game refresh thread, follows whichever game is selected
    let periodic_updater =
        PeriodicRefresher::new(network_req_tx.clone(), target_rx, in_flight, poll_interval);
    let periodic_task = tokio::spawn(periodic_updater.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    periodic_task.abort();

    Ok(())
}

fn handle_cli_args() -> CliAction {
    match parse_cli_args(std::env::args().skip(1)) {
        Ok(action) => action,
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn parse_cli_args(mut args: impl Iterator<Item = String>) -> Result<CliAction, String> {
    let mut game_pk = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return Ok(CliAction::Exit);
            }
            "-V" | "--version" => {
                println!("pitchfx {}", env!("CARGO_PKG_VERSION"));
                return Ok(CliAction::Exit);
            }
            "-g" | "--game" => {
                let value = args.next().ok_or("--game needs a gamePk")?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid gamePk: {value}"))?;
                game_pk = Some(parsed);
            }
            _ => return Err(format!("Unknown argument: {arg}")),
        }
    }
    Ok(CliAction::Run { game_pk })
}

fn usage_text() -> String {
    format!(
        "pitchfx - live MLB pitch tracking in the terminal

Usage:
  pitchfx [--game <gamePk>]
  pitchfx --help
  pitchfx --version

Without --game the first game on today's schedule is polled.

Environment:
  PITCHFX_POLL_SECS       Refresh interval in seconds (default {DEFAULT_POLL_SECS})
  PITCHFX_TIMEOUT_SECS    HTTP timeout in seconds, 1-60 (default {DEFAULT_TIMEOUT_SECS})
  PITCHFX_STATS_DIR       Directory with batting.json, pitching.json,
                          team_batting.json and team_pitching.json
  PITCHFX_DUMP_PITCHERS   Write raw pitcher data here after every fetch
  PITCHFX_LOG             Log level: error, warn, info, debug, trace"
    )
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requested = app.lock().await.current_target();
            if let Some(game_pk) = requested {
                let _ = network_requests.send(NetworkRequest::RefreshGame { game_pk }).await;
            }
            let _ = network_requests.send(NetworkRequest::LoadSchedule).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ScheduleLoaded { games } => {
            let mut guard = app.lock().await;
            let picked = guard.on_schedule_loaded(games);
            drop(guard);
            if let Some(game_pk) = picked {
                let _ = network_requests
                    .send(NetworkRequest::RefreshGame { game_pk })
                    .await;
            }
        }
        NetworkResponse::GameRefreshed { game_pk, snapshot } => {
            let mut guard = app.lock().await;
            if !guard.on_game_refreshed(game_pk, snapshot) {
                return false;
            }
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
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
}

fn setup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide).unwrap();
    execute!(stdout, terminal::EnterAlternateScreen).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    terminal::enable_raw_mode().unwrap();
}

pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::MoveTo(0, 0)).unwrap();
    execute!(stdout, terminal::Clear(terminal::ClearType::All)).unwrap();
    execute!(stdout, terminal::LeaveAlternateScreen).unwrap();
    execute!(stdout, cursor::Show).unwrap();
    terminal::disable_raw_mode().unwrap();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

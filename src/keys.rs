use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut fetch_game = None;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Dashboard),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Pitches),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Stats),
        (_, Char('4'), _) => guard.update_tab(MenuItem::Games),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Game list
        (MenuItem::Games, Char('j') | KeyCode::Down, _) => guard.state.schedule.navigate_down(),
        (MenuItem::Games, Char('k') | KeyCode::Up, _) => guard.state.schedule.navigate_up(),
        (MenuItem::Games, KeyCode::Enter, _) => {
            fetch_game = guard.select_highlighted_game();
            if fetch_game.is_some() {
                guard.update_tab(MenuItem::Dashboard);
            }
        }
        (MenuItem::Games, Char('x'), _) => guard.stop_polling(),
        (MenuItem::Games, Char('s'), _) => {
            drop(guard);
            let _ = network_requests.send(NetworkRequest::LoadSchedule).await;
            return;
        }

        // Pitch feed
        (MenuItem::Pitches, Char('j') | KeyCode::Down, _) => guard.scroll_events_down(),
        (MenuItem::Pitches, Char('k') | KeyCode::Up, _) => guard.scroll_events_up(),

        // Pitcher filter
        (MenuItem::Dashboard | MenuItem::Pitches, Char('p'), _) => guard.cycle_pitcher(true),
        (MenuItem::Dashboard | MenuItem::Pitches, Char('P'), _) => guard.cycle_pitcher(false),
        (MenuItem::Dashboard | MenuItem::Pitches, Char('a'), _) => guard.clear_pitcher_filter(),

        // Global
        (_, Char('r'), _) => fetch_game = guard.current_target(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    if let Some(game_pk) = fetch_game {
        drop(guard);
        let _ = network_requests
            .send(NetworkRequest::RefreshGame { game_pk })
            .await;
    }
}

use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use savant_api::{GameSnapshot, ScheduledGame};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSchedule,
    RefreshGame { game_pk: u64 },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { games: Vec<ScheduledGame> },
    /// Tagged with the game the fetch was issued for. `None` means the fetch failed.
    GameRefreshed {
        game_pk: u64,
        snapshot: Option<Box<GameSnapshot>>,
    },
}

impl NetworkResponse {
    pub fn is_ok(&self) -> bool {
        !matches!(self, NetworkResponse::GameRefreshed { snapshot: None, .. })
    }
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}

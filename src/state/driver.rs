use log::{debug, info, warn};
use savant_api::{GameSnapshot, ScheduledGame};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollState {
    #[default]
    Idle,
    Polling(u64),
}

/// What happened to a fetch result handed to [`RefreshDriver::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A fresh snapshot replaced the previous one.
    Published,
    /// The fetch failed; the previous snapshot (if any) is still current.
    Stale,
    /// The result was for a game that is no longer the polling target.
    Discarded,
}

/// Owns the polling target and the latest published snapshot.
///
/// Every fetch is tagged with the game it was issued for. A result whose tag
/// does not match the current target is dropped, so switching games can never
/// be undone by a slow response for the old one.
#[derive(Debug, Default)]
pub struct RefreshDriver {
    state: PollState,
    snapshot: Option<Arc<GameSnapshot>>,
    stale_ticks: u32,
}

impl RefreshDriver {
    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn target(&self) -> Option<u64> {
        match self.state {
            PollState::Idle => None,
            PollState::Polling(game_pk) => Some(game_pk),
        }
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.snapshot.as_deref()
    }

    /// Consecutive failed fetches since the last published snapshot.
    pub fn stale_ticks(&self) -> u32 {
        self.stale_ticks
    }

    /// Point the driver at `game_pk`. Returns `false` if it was already the target.
    pub fn select(&mut self, game_pk: u64) -> bool {
        if self.state == PollState::Polling(game_pk) {
            return false;
        }
        info!("polling game {game_pk}");
        self.state = PollState::Polling(game_pk);
        self.snapshot = None;
        self.stale_ticks = 0;
        true
    }

    /// Pick the first scheduled game, but only when nothing is selected yet.
    pub fn auto_select(&mut self, games: &[ScheduledGame]) -> Option<u64> {
        if self.state != PollState::Idle {
            return None;
        }
        let first = games.first()?;
        self.select(first.game_pk);
        Some(first.game_pk)
    }

    pub fn stop(&mut self) {
        self.state = PollState::Idle;
        self.snapshot = None;
        self.stale_ticks = 0;
    }

    /// Apply the result of a fetch issued for `game_pk`.
    pub fn accept(&mut self, game_pk: u64, snapshot: Option<GameSnapshot>) -> TickOutcome {
        if self.target() != Some(game_pk) {
            debug!("discarding late response for game {game_pk}");
            return TickOutcome::Discarded;
        }
        match snapshot {
            Some(snapshot) => {
                self.snapshot = Some(Arc::new(snapshot));
                self.stale_ticks = 0;
                TickOutcome::Published
            }
            None => {
                self.stale_ticks += 1;
                warn!(
                    "no update for game {game_pk}, keeping previous snapshot ({} stale ticks)",
                    self.stale_ticks
                );
                TickOutcome::Stale
            }
        }
    }
}

use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::driver::TickOutcome;
use savant_api::stats::SeasonStats;
use savant_api::{GameSnapshot, ScheduledGame};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Dashboard,
    Pitches,
    Stats,
    Games,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    poll_target: watch::Sender<Option<u64>>,
}

impl App {
    pub fn new(
        settings: AppSettings,
        season: Arc<SeasonStats>,
        poll_target: watch::Sender<Option<u64>>,
    ) -> Self {
        let app = Self {
            state: AppState::new(season),
            settings,
            poll_target,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    /// Store the schedule. Returns the game to fetch right away when this
    /// load picked the first entry because nothing was selected yet. After an
    /// explicit stop the driver stays idle until a game is chosen by hand.
    pub fn on_schedule_loaded(&mut self, games: Vec<ScheduledGame>) -> Option<u64> {
        self.state.schedule.load(games);
        if let Some(game_pk) = self.state.driver.target() {
            self.state.schedule.highlight(game_pk);
            return None;
        }
        if self.state.polling_stopped {
            return None;
        }
        let game_pk = self.state.driver.auto_select(&self.state.schedule.games)?;
        self.after_target_change(game_pk);
        Some(game_pk)
    }

    /// Returns whether the screen needs a redraw.
    pub fn on_game_refreshed(&mut self, game_pk: u64, snapshot: Option<Box<GameSnapshot>>) -> bool {
        let outcome = self.state.driver.accept(game_pk, snapshot.map(|s| *s));
        if outcome == TickOutcome::Published {
            self.state.refresh_season_views();
        }
        outcome != TickOutcome::Discarded
    }

    // -----------------------------------------------------------------------
    // Polling target
    // -----------------------------------------------------------------------

    /// Switch polling to `game_pk`. Returns `false` when it already was the target.
    pub fn select_game(&mut self, game_pk: u64) -> bool {
        if !self.state.driver.select(game_pk) {
            return false;
        }
        self.after_target_change(game_pk);
        true
    }

    pub fn select_highlighted_game(&mut self) -> Option<u64> {
        let game_pk = self.state.schedule.highlighted()?.game_pk;
        self.select_game(game_pk).then_some(game_pk)
    }

    /// Back to idle: the refresher stops and the dashboard empties.
    pub fn stop_polling(&mut self) {
        self.state.driver.stop();
        self.state.pitcher_filter.clear();
        self.state.clear_season_views();
        self.state.polling_stopped = true;
        self.poll_target.send_replace(None);
    }

    pub fn current_target(&self) -> Option<u64> {
        self.state.driver.target()
    }

    pub fn snapshot(&self) -> Option<&GameSnapshot> {
        self.state.driver.snapshot()
    }

    fn after_target_change(&mut self, game_pk: u64) {
        self.state.pitcher_filter.clear();
        self.state.events_scroll = 0;
        self.state.clear_season_views();
        self.state.polling_stopped = false;
        self.state.schedule.highlight(game_pk);
        self.poll_target.send_replace(Some(game_pk));
    }

    // -----------------------------------------------------------------------
    // Dashboard controls
    // -----------------------------------------------------------------------

    pub fn cycle_pitcher(&mut self, forward: bool) {
        let names = self
            .state
            .driver
            .snapshot()
            .map(|s| s.pitcher_names.clone())
            .unwrap_or_default();
        self.state.pitcher_filter.cycle(&names, forward);
    }

    pub fn clear_pitcher_filter(&mut self) {
        self.state.pitcher_filter.clear();
    }

    pub fn scroll_events_down(&mut self) {
        let len = self.snapshot().map_or(0, |s| s.events.len());
        if self.state.events_scroll + 1 < len {
            self.state.events_scroll += 1;
        }
    }

    pub fn scroll_events_up(&mut self) {
        self.state.events_scroll = self.state.events_scroll.saturating_sub(1);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

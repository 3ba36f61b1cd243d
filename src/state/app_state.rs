use crate::app::MenuItem;
use crate::state::driver::RefreshDriver;
use savant_api::normalize::fold_pitcher_name;
use savant_api::stats::{FormattedRow, SeasonStats, StatLine};
use savant_api::{GameSnapshot, ScheduledGame};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct ScheduleState {
    pub games: Vec<ScheduledGame>,
    pub selected: usize,
    pub loaded: bool,
}

impl ScheduleState {
    /// Replace the list, keeping the highlight on the same game when it is still listed.
    pub fn load(&mut self, games: Vec<ScheduledGame>) {
        let highlighted = self.highlighted().map(|g| g.game_pk);
        self.games = games;
        self.loaded = true;
        self.selected = highlighted
            .and_then(|pk| self.games.iter().position(|g| g.game_pk == pk))
            .unwrap_or(0);
    }

    pub fn navigate_down(&mut self) {
        if self.selected + 1 < self.games.len() {
            self.selected += 1;
        }
    }

    pub fn navigate_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn highlighted(&self) -> Option<&ScheduledGame> {
        self.games.get(self.selected)
    }

    pub fn highlight(&mut self, game_pk: u64) {
        if let Some(idx) = self.games.iter().position(|g| g.game_pk == game_pk) {
            self.selected = idx;
        }
    }
}

// ---------------------------------------------------------------------------
// Pitcher filter
// ---------------------------------------------------------------------------

/// Narrows the strike-zone chart to one pitcher. `None` shows everyone.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PitcherFilter {
    pub name: Option<String>,
}

impl PitcherFilter {
    pub fn as_deref(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn clear(&mut self) {
        self.name = None;
    }

    /// Step through `names` and back to "all pitchers" after the last one.
    pub fn cycle(&mut self, names: &[String], forward: bool) {
        if names.is_empty() {
            self.name = None;
            return;
        }
        let current = self.name.as_deref().and_then(|name| {
            let wanted = fold_pitcher_name(name);
            names.iter().position(|n| fold_pitcher_name(n) == wanted)
        });
        let next = match (current, forward) {
            (None, true) => Some(0),
            (None, false) => Some(names.len() - 1),
            (Some(i), true) if i + 1 < names.len() => Some(i + 1),
            (Some(i), false) if i > 0 => Some(i - 1),
            (Some(_), _) => None,
        };
        self.name = next.map(|i| names[i].clone());
    }
}

// ---------------------------------------------------------------------------
// Season stats for the game on screen
// ---------------------------------------------------------------------------

/// Season lines for the current at-bat, looked up once per at-bat rather than per frame.
#[derive(Debug, Default)]
pub struct MatchupStats {
    at_bat: Option<(u64, Option<String>, Option<String>)>,
    pub pitcher: Option<StatLine>,
    pub batter: Option<StatLine>,
}

impl MatchupStats {
    /// Returns whether a lookup ran.
    pub fn refresh(&mut self, season: &SeasonStats, snapshot: &GameSnapshot) -> bool {
        let play = &snapshot.current_play;
        let at_bat = (snapshot.game_pk, play.pitcher_name.clone(), play.batter_name.clone());
        if self.at_bat.as_ref() == Some(&at_bat) {
            return false;
        }
        self.pitcher = play.pitcher_name.as_deref().and_then(|n| season.pitcher_statline(n));
        self.batter = play.batter_name.as_deref().and_then(|n| season.batter_statline(n));
        self.at_bat = Some(at_bat);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// League and team averages plus the home roster, rebuilt when the teams change.
#[derive(Debug, Default)]
pub struct TeamStats {
    teams: Option<(Option<String>, Option<String>)>,
    pub batting: Vec<FormattedRow>,
    pub pitching: Vec<FormattedRow>,
    pub roster_team: String,
    pub roster: Vec<FormattedRow>,
}

impl TeamStats {
    /// Returns whether the rows were rebuilt.
    pub fn refresh(&mut self, season: &SeasonStats, snapshot: &GameSnapshot) -> bool {
        let teams = (snapshot.away_team.clone(), snapshot.home_team.clone());
        if self.teams.as_ref() == Some(&teams) {
            return false;
        }
        // League row first, then whichever teams the feed named.
        let rows: Vec<Option<&str>> = std::iter::once(None)
            .chain([teams.0.as_deref(), teams.1.as_deref()].into_iter().flatten().map(Some))
            .collect();
        self.batting = rows.iter().map(|t| season.league_batting_averages(*t)).collect();
        self.pitching = rows.iter().map(|t| season.league_pitching_averages(*t)).collect();
        self.roster_team = teams.1.clone().unwrap_or_else(|| "-".to_string());
        self.roster = season.team_player_stats(&self.roster_team);
        self.teams = Some(teams);
        true
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub schedule: ScheduleState,
    pub driver: RefreshDriver,
    pub pitcher_filter: PitcherFilter,
    pub events_scroll: usize,
    pub season: Arc<SeasonStats>,
    pub matchup: MatchupStats,
    pub team_stats: TeamStats,
    /// Set by an explicit stop, so a schedule reload does not start polling again.
    pub polling_stopped: bool,
}

impl AppState {
    pub fn new(season: Arc<SeasonStats>) -> Self {
        Self {
            season,
            ..Self::default()
        }
    }

    /// Recompute the season-stat views for a newly published snapshot.
    pub fn refresh_season_views(&mut self) {
        let Some(snapshot) = self.driver.snapshot() else {
            return;
        };
        self.matchup.refresh(&self.season, snapshot);
        self.team_stats.refresh(&self.season, snapshot);
    }

    pub fn clear_season_views(&mut self) {
        self.matchup.clear();
        self.team_stats.clear();
    }
}

pub mod client;
pub mod normalize;
pub mod schedule;
pub mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Placeholder for text fields the feed left out.
pub const UNKNOWN: &str = "Unknown";

// ---------------------------------------------------------------------------
// Domain types: flat records, independent of the Savant wire format
// ---------------------------------------------------------------------------

/// One delivery with a known plate location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitchRecord {
    /// Horizontal plate-crossing coordinate (feet, catcher's view).
    pub px: f64,
    /// Vertical plate-crossing coordinate (feet above ground).
    pub pz: f64,
    pub pitch_type: String,
    pub pitch_name: String,
    pub start_speed: Option<f64>,
    pub end_speed: Option<f64>,
    pub spin_rate: Option<f64>,
    pub result: String,
    pub description: String,
    pub call: String,
    pub batter_name: String,
    pub pitcher_name: String,
    pub ab_number: Option<u32>,
    pub inning: Option<u32>,
    /// Running pitch counter across the whole game, when the feed has one.
    pub game_pitch_number: Option<u32>,
}

impl PitchRecord {
    pub fn at(px: f64, pz: f64) -> Self {
        Self {
            px,
            pz,
            pitch_type: UNKNOWN.into(),
            pitch_name: UNKNOWN.into(),
            start_speed: None,
            end_speed: None,
            spin_rate: None,
            result: UNKNOWN.into(),
            description: UNKNOWN.into(),
            call: UNKNOWN.into(),
            batter_name: UNKNOWN.into(),
            pitcher_name: UNKNOWN.into(),
            ab_number: None,
            inning: None,
            game_pitch_number: None,
        }
    }
}

/// Re-order records merged from several pitchers by the game pitch counter.
/// Records without a counter keep their relative order at the end.
pub fn sort_chronologically(records: &mut [PitchRecord]) {
    records.sort_by_key(|r| r.game_pitch_number.unwrap_or(u32::MAX));
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
    pub outs: u8,
}

/// A single sub-event of the at-bat in progress.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayEvent {
    pub description: Option<String>,
    pub is_pitch: bool,
    pub pitch_name: Option<String>,
    pub start_speed: Option<f64>,
    pub location: Option<(f64, f64)>,
}

/// The at-bat in progress at the time of the last fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentPlayState {
    pub batter_name: Option<String>,
    pub pitcher_name: Option<String>,
    pub count: Count,
    pub play_events: Vec<PlayEvent>,
}

impl CurrentPlayState {
    pub fn is_empty(&self) -> bool {
        self.batter_name.is_none() && self.pitcher_name.is_none() && self.play_events.is_empty()
    }
}

/// Vertical strike zone bounds in feet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeZone {
    pub top: f64,
    pub bottom: f64,
}

impl Default for StrikeZone {
    fn default() -> Self {
        Self { top: 3.5, bottom: 1.5 }
    }
}

/// Home/away win probabilities in [0, 1], one entry per recorded game state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WinProbabilitySeries {
    pub home: Vec<f64>,
    pub away: Vec<f64>,
    pub home_team: String,
    pub away_team: String,
}

impl WinProbabilitySeries {
    pub fn len(&self) -> usize {
        self.home.len()
    }

    pub fn is_empty(&self) -> bool {
        self.home.is_empty()
    }

    /// Latest (home, away) pair.
    pub fn latest(&self) -> Option<(f64, f64)> {
        Some((*self.home.last()?, *self.away.last()?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Base {
    First,
    Second,
    Third,
}

impl Base {
    pub const ALL: [Base; 3] = [Base::First, Base::Second, Base::Third];

    pub fn key(&self) -> &'static str {
        match self {
            Base::First => "first",
            Base::Second => "second",
            Base::Third => "third",
        }
    }

    /// Parse the "1B"/"2B"/"3B" notation used by play movements.
    pub fn from_movement(s: &str) -> Option<Self> {
        match s {
            "1B" => Some(Base::First),
            "2B" => Some(Base::Second),
            "3B" => Some(Base::Third),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRunner {
    pub name: String,
    pub base: Base,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPosition {
    Pitcher,
    Catcher,
    First,
    Second,
    Third,
    Shortstop,
    Left,
    Center,
    Right,
}

impl FieldPosition {
    pub const ALL: [FieldPosition; 9] = [
        FieldPosition::Pitcher,
        FieldPosition::Catcher,
        FieldPosition::First,
        FieldPosition::Second,
        FieldPosition::Third,
        FieldPosition::Shortstop,
        FieldPosition::Left,
        FieldPosition::Center,
        FieldPosition::Right,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FieldPosition::Pitcher => "pitcher",
            FieldPosition::Catcher => "catcher",
            FieldPosition::First => "first",
            FieldPosition::Second => "second",
            FieldPosition::Third => "third",
            FieldPosition::Shortstop => "shortstop",
            FieldPosition::Left => "left",
            FieldPosition::Center => "center",
            FieldPosition::Right => "right",
        }
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            FieldPosition::Pitcher => "P",
            FieldPosition::Catcher => "C",
            FieldPosition::First => "1B",
            FieldPosition::Second => "2B",
            FieldPosition::Third => "3B",
            FieldPosition::Shortstop => "SS",
            FieldPosition::Left => "LF",
            FieldPosition::Center => "CF",
            FieldPosition::Right => "RF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defender {
    pub name: String,
    pub position: FieldPosition,
}

/// One row of the recent-events table.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchingEvent {
    pub pitch_type: String,
    pub batter: String,
    pub pitcher: String,
    pub outs: Option<u32>,
    pub count: String, // "B-S"
    pub spin_rate: Option<f64>,
    pub result: String,
    pub pitcher_pitch_count: Option<u32>,
    pub game_pitch_number: Option<u32>,
    pub score: String, // "home-away"
}

/// An entry from today's schedule. Status is informational only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduledGame {
    pub game_pk: u64,
    pub away_team: String,
    pub home_team: String,
    pub status: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
}

/// All located pitches thrown by one pitcher, in feed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitcherPitches {
    pub pitcher_id: String,
    /// Name on the pitcher's first recorded pitch.
    pub name: Option<String>,
    pub pitches: Vec<PitchRecord>,
}

impl PitcherPitches {
    pub fn is_named(&self, wanted: &str) -> bool {
        self.name
            .as_deref()
            .is_some_and(|n| normalize::fold_pitcher_name(n) == normalize::fold_pitcher_name(wanted))
    }
}

/// Everything the dashboard draws for one game, built from a single fetch.
#[derive(Debug, Clone, Default)]
pub struct GameSnapshot {
    pub game_pk: u64,
    pub pitchers: Vec<PitcherPitches>,
    pub pitcher_names: Vec<String>,
    pub current_play: CurrentPlayState,
    pub current_pitches: Vec<PitchRecord>,
    pub current_result: Option<String>,
    pub strike_zone: StrikeZone,
    pub win_probability: Option<WinProbabilitySeries>,
    pub runners: Vec<BaseRunner>,
    pub defenders: Vec<Defender>,
    pub events: Vec<PitchingEvent>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub score: (u32, u32), // (home, away)
}

impl GameSnapshot {
    /// Pitches for one pitcher (case-insensitive, trimmed), or all of them.
    /// An unknown name yields nothing.
    pub fn pitches_for(&self, pitcher: Option<&str>) -> Vec<&PitchRecord> {
        self.pitchers
            .iter()
            .filter(|group| pitcher.is_none_or(|name| group.is_named(name)))
            .flat_map(|group| group.pitches.iter())
            .collect()
    }

    pub fn pitch_count(&self) -> usize {
        self.pitchers.iter().map(|g| g.pitches.len()).sum()
    }
}

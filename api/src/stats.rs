//! Season stat tables and player/league/team statlines.
//!
//! Tables are supplied externally (records-oriented JSON, one object per
//! row with `Name`/`Team` plus numeric columns), loaded once at startup and
//! read-only afterwards.
use crate::client::{ApiError, ApiResult};
use log::{info, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

pub const BATTING_FIELDS: &[&str] = &[
    "AVG", "SLG", "OBP", "OPS", "BABIP", "ISO", "BB%", "K%", "wOBA", "wRC+",
];
pub const PITCHING_FIELDS: &[&str] = &[
    "K/9", "H/9", "BB%", "BABIP", "ERA", "FIP", "WHIP", "SIERA", "xFIP",
];
pub const TEAM_PLAYER_FIELDS: &[&str] = &[
    "AVG", "BABIP", "BB", "Balls", "HR", "OBP", "OPS", "PA", "R", "RBI", "SLG", "SO", "WAR",
    "wOBA", "wRC+", "ISO", "K%", "BB%",
];
pub const TEAM_BATTING_FIELDS: &[&str] = &[
    "AVG", "BABIP", "BB", "Balls", "HR", "OBP", "OPS", "PA", "R", "RBI", "SLG", "SO", "WAR",
    "wOBA",
];
pub const TEAM_PITCHING_FIELDS: &[&str] = &[
    "AVG", "BABIP", "Balls", "Strikes", "BB", "ER", "ERA", "FIP", "WHIP", "H", "HR", "WAR",
    "xFIP",
];

/// Counting stats shown as whole numbers.
const INTEGER_FIELDS: &[&str] = &["Age", "G", "BB", "HR", "PA", "H", "RBI", "SO", "ER", "HBP", "IP"];

const NAME_COLUMN: &str = "Name";
const TEAM_COLUMN: &str = "Team";

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatRow {
    pub name: String,
    pub team: String,
    pub values: HashMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    pub rows: Vec<StatRow>,
}

impl StatTable {
    pub fn from_records(records: Vec<Map<String, Value>>) -> Self {
        let rows = records
            .into_iter()
            .map(|record| {
                let mut row = StatRow::default();
                for (key, value) in record {
                    match value {
                        Value::String(s) if key == NAME_COLUMN => row.name = s,
                        Value::String(s) if key == TEAM_COLUMN => row.team = s,
                        Value::Number(n) => {
                            if let Some(n) = n.as_f64() {
                                row.values.insert(key, n);
                            }
                        }
                        _ => {}
                    }
                }
                row
            })
            .collect();
        Self { rows }
    }

    pub fn from_json(body: &str) -> ApiResult<Self> {
        let records: Vec<Map<String, Value>> = serde_json::from_str(body)
            .map_err(|e| ApiError::Other(format!("invalid stat table: {e}")))?;
        Ok(Self::from_records(records))
    }

    pub fn load(path: &Path) -> ApiResult<Self> {
        let body = std::fs::read_to_string(path)
            .map_err(|e| ApiError::NotFound(format!("could not read {}: {e}", path.display())))?;
        Self::from_json(&body)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose name matches, ignoring case, accents and surrounding space.
    pub fn find_player(&self, name: &str) -> Option<&StatRow> {
        let wanted = fold_name(name);
        self.rows.iter().find(|row| fold_name(&row.name) == wanted)
    }

    /// Arithmetic mean of each field, over the whole table or one team's rows.
    pub fn mean(&self, fields: &[&str], team: Option<&str>) -> Vec<(String, Option<f64>)> {
        let rows: Vec<&StatRow> = self
            .rows
            .iter()
            .filter(|row| team.is_none_or(|t| row.team == t))
            .collect();

        fields
            .iter()
            .map(|field| {
                let present: Vec<f64> = rows.iter().filter_map(|r| r.values.get(*field).copied()).collect();
                let mean = (!present.is_empty()).then(|| present.iter().sum::<f64>() / present.len() as f64);
                (field.to_string(), mean)
            })
            .collect()
    }
}

/// Lowercased, trimmed, with diacritics removed: "José Ramírez" → "jose ramirez".
pub fn fold_name(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.trim().nfd().filter(|c| !is_combining_mark(*c)) {
        match fold_letter(c) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.extend(c.to_lowercase()),
        }
    }
    folded
}

/// Letters NFD leaves whole, spelled the way stat tables write them.
fn fold_letter(c: char) -> Option<&'static str> {
    let ascii = match c {
        'ø' | 'Ø' => "o",
        'ł' | 'Ł' => "l",
        'đ' | 'Đ' | 'ð' | 'Ð' => "d",
        'ß' => "ss",
        'æ' | 'Æ' => "ae",
        'œ' | 'Œ' => "oe",
        'þ' | 'Þ' => "th",
        'ı' => "i",
        _ => return None,
    };
    Some(ascii)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// A presentation-ready stat cell.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Integer(i64),
    Decimal(f64),
    Percent(String),
    Missing,
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Integer(n) => write!(f, "{n}"),
            StatValue::Decimal(x) if x.fract() == 0.0 => write!(f, "{x:.1}"),
            StatValue::Decimal(x) => write!(f, "{x}"),
            StatValue::Percent(s) => f.write_str(s),
            StatValue::Missing => f.write_str("-"),
        }
    }
}

/// Round or format one value according to its column name.
pub fn format_stat(key: &str, value: f64) -> StatValue {
    if INTEGER_FIELDS.contains(&key) {
        StatValue::Integer(value.round_ties_even() as i64)
    } else if key.ends_with('%') {
        StatValue::Percent(format_percent(value))
    } else {
        StatValue::Decimal(round_to(value, 3))
    }
}

/// 0.256 → "25.6%", 0.25 → "25.0%".
pub fn format_percent(value: f64) -> String {
    let pct = round_to(value * 100.0, 2);
    if pct.fract() == 0.0 {
        format!("{pct:.1}%")
    } else {
        format!("{pct}%")
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// A labelled row of formatted stats, in field order.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRow {
    pub label: String,
    pub values: Vec<(String, StatValue)>,
}

impl FormattedRow {
    fn build(label: impl Into<String>, values: impl IntoIterator<Item = (String, Option<f64>)>) -> Self {
        let values = values
            .into_iter()
            .map(|(key, v)| {
                let cell = v.map(|v| format_stat(&key, v)).unwrap_or(StatValue::Missing);
                (key, cell)
            })
            .collect();
        Self { label: label.into(), values }
    }

    pub fn get(&self, key: &str) -> Option<&StatValue> {
        self.values.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(k, _)| k.as_str())
    }
}

/// A player's season line next to the league and team averages.
#[derive(Debug, Clone, PartialEq)]
pub struct StatLine {
    pub team: String,
    pub player: FormattedRow,
    pub league_average: FormattedRow,
    pub team_average: FormattedRow,
}

impl StatLine {
    pub fn rows(&self) -> [&FormattedRow; 3] {
        [&self.player, &self.league_average, &self.team_average]
    }
}

/// Look up `name` in `players` and pair it with averages from `teams`.
/// `None` means the player is not in the table.
pub fn lookup_statline(
    name: &str,
    players: &StatTable,
    teams: &StatTable,
    fields: &[&str],
) -> Option<StatLine> {
    let Some(row) = players.find_player(name) else {
        info!("no stats found for {name}");
        return None;
    };

    let player = FormattedRow::build(
        name.trim(),
        fields.iter().map(|f| (f.to_string(), row.values.get(*f).copied())),
    );
    let league_average = FormattedRow::build("League Average", teams.mean(fields, None));
    let team_average = FormattedRow::build(
        format!("{} Average", row.team),
        teams.mean(fields, Some(row.team.as_str())),
    );

    Some(StatLine { team: row.team.clone(), player, league_average, team_average })
}

/// Averages across `table` (league-wide when `team` is `None`).
pub fn team_averages(table: &StatTable, fields: &[&str], team: Option<&str>) -> FormattedRow {
    let label = match team {
        Some(team) => format!("{team} Average"),
        None => "League Average".to_string(),
    };
    FormattedRow::build(label, table.mean(fields, team))
}

// ---------------------------------------------------------------------------
// Season context
// ---------------------------------------------------------------------------

/// Season aggregates shared read-only by every lookup.
#[derive(Debug, Clone, Default)]
pub struct SeasonStats {
    pub batting: StatTable,
    pub pitching: StatTable,
    pub team_batting: StatTable,
    pub team_pitching: StatTable,
}

impl SeasonStats {
    /// Load `batting.json`, `pitching.json`, `team_batting.json` and
    /// `team_pitching.json` from `dir`. A missing or broken file leaves that
    /// table empty, so lookups against it miss.
    pub fn load_dir(dir: &Path) -> Self {
        let load = |file: &str| {
            StatTable::load(&dir.join(file)).unwrap_or_else(|e| {
                warn!("{e}");
                StatTable::default()
            })
        };
        let stats = Self {
            batting: load("batting.json"),
            pitching: load("pitching.json"),
            team_batting: load("team_batting.json"),
            team_pitching: load("team_pitching.json"),
        };
        info!(
            "loaded season stats: {} batters, {} pitchers, {} batting teams, {} pitching teams",
            stats.batting.rows.len(),
            stats.pitching.rows.len(),
            stats.team_batting.rows.len(),
            stats.team_pitching.rows.len(),
        );
        stats
    }

    pub fn batter_statline(&self, name: &str) -> Option<StatLine> {
        lookup_statline(name, &self.batting, &self.team_batting, BATTING_FIELDS)
    }

    pub fn pitcher_statline(&self, name: &str) -> Option<StatLine> {
        lookup_statline(name, &self.pitching, &self.team_pitching, PITCHING_FIELDS)
    }

    /// Formatted batting rows for every player on `team`, in table order.
    pub fn team_player_stats(&self, team: &str) -> Vec<FormattedRow> {
        self.batting
            .rows
            .iter()
            .filter(|row| row.team == team)
            .map(|row| {
                FormattedRow::build(
                    row.name.clone(),
                    TEAM_PLAYER_FIELDS
                        .iter()
                        .map(|f| (f.to_string(), row.values.get(*f).copied())),
                )
            })
            .collect()
    }

    pub fn league_batting_averages(&self, team: Option<&str>) -> FormattedRow {
        team_averages(&self.team_batting, TEAM_BATTING_FIELDS, team)
    }

    pub fn league_pitching_averages(&self, team: Option<&str>) -> FormattedRow {
        team_averages(&self.team_pitching, TEAM_PITCHING_FIELDS, team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table(rows: Value) -> StatTable {
        StatTable::from_json(&rows.to_string()).unwrap()
    }

    fn batting() -> StatTable {
        table(json!([
            {"Name": "José Ramírez", "Team": "CLE", "AVG": 0.2791, "K%": 0.256, "HR": 39.0, "wRC+": 140.0},
            {"Name": "Steven Kwan", "Team": "CLE", "AVG": 0.292, "K%": 0.1, "HR": 14.0},
            {"Name": "Riley Greene", "Team": "DET", "AVG": 0.262, "K%": 0.25, "HR": 24.0}
        ]))
    }

    fn team_batting() -> StatTable {
        table(json!([
            {"Team": "CLE", "AVG": 0.240, "K%": 0.2, "HR": 185.0},
            {"Team": "DET", "AVG": 0.234, "K%": 0.24, "HR": 162.0}
        ]))
    }

    #[test]
    fn names_match_regardless_of_accents_and_case() {
        let players = batting();
        let teams = team_batting();
        let fields = ["AVG", "K%"];
        let accented = lookup_statline("José Ramírez", &players, &teams, &fields).unwrap();
        let plain = lookup_statline("  jose ramirez ", &players, &teams, &fields).unwrap();
        assert_eq!(accented.player.values, plain.player.values);
        assert_eq!(accented.team, "CLE");
    }

    #[test]
    fn fold_name_strips_diacritics() {
        assert_eq!(fold_name("José Ramírez"), "jose ramirez");
        assert_eq!(fold_name(" Ronald Acuña Jr. "), "ronald acuna jr.");
    }

    #[test]
    fn fold_name_spells_out_undecomposed_letters() {
        assert_eq!(fold_name("Søren Łukasz Đorđević"), "soren lukasz dordevic");
        let players = table(json!([{"Name": "Soren Lukasz", "Team": "MIN", "AVG": 0.25}]));
        assert!(players.find_player("Søren Łukasz").is_some());
    }

    #[test]
    fn missing_player_is_none() {
        assert!(lookup_statline("Nobody", &batting(), &team_batting(), BATTING_FIELDS).is_none());
        assert!(lookup_statline("Nobody", &StatTable::default(), &StatTable::default(), BATTING_FIELDS).is_none());
    }

    #[test]
    fn percent_fields_format_as_strings() {
        assert_eq!(format_stat("K%", 0.256), StatValue::Percent("25.6%".into()));
        assert_eq!(format_percent(0.25), "25.0%");
        assert_eq!(format_percent(0.12346), "12.35%");
    }

    #[test]
    fn counting_fields_round_to_whole_numbers() {
        assert_eq!(format_stat("HR", 38.6), StatValue::Integer(39));
        assert_eq!(format_stat("IP", 180.2), StatValue::Integer(180));
        assert_eq!(format_stat("AVG", 0.27914), StatValue::Decimal(0.279));
        assert_eq!(StatValue::Decimal(3.0).to_string(), "3.0");
        assert_eq!(StatValue::Missing.to_string(), "-");
    }

    #[test]
    fn statline_has_league_and_team_rows() {
        let line = lookup_statline("Steven Kwan", &batting(), &team_batting(), &["AVG", "HR", "wRC+"]).unwrap();
        assert_eq!(line.player.label, "Steven Kwan");
        assert_eq!(line.player.get("AVG"), Some(&StatValue::Decimal(0.292)));
        assert_eq!(line.player.get("wRC+"), Some(&StatValue::Missing));

        assert_eq!(line.league_average.label, "League Average");
        assert_eq!(line.league_average.get("AVG"), Some(&StatValue::Decimal(0.237)));
        assert_eq!(line.league_average.get("HR"), Some(&StatValue::Integer(174)));

        assert_eq!(line.team_average.label, "CLE Average");
        assert_eq!(line.team_average.get("HR"), Some(&StatValue::Integer(185)));
        let keys: Vec<_> = line.player.keys().collect();
        assert_eq!(keys, vec!["AVG", "HR", "wRC+"]);
    }

    #[test]
    fn duplicate_names_take_first_row() {
        let players = table(json!([
            {"Name": "Will Smith", "Team": "LAD", "AVG": 0.248},
            {"Name": "Will Smith", "Team": "KCR", "AVG": 0.0}
        ]));
        let line = lookup_statline("will smith", &players, &StatTable::default(), &["AVG"]).unwrap();
        assert_eq!(line.team, "LAD");
        assert_eq!(line.league_average.get("AVG"), Some(&StatValue::Missing));
    }

    #[test]
    fn team_player_stats_filters_by_team() {
        let stats = SeasonStats { batting: batting(), ..Default::default() };
        let rows = stats.team_player_stats("CLE");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "José Ramírez");
        assert_eq!(rows[0].get("K%"), Some(&StatValue::Percent("25.6%".into())));
        assert!(stats.team_player_stats("NYY").is_empty());
    }

    #[test]
    fn league_averages_over_whole_table() {
        let stats = SeasonStats { team_batting: team_batting(), ..Default::default() };
        let league = stats.league_batting_averages(None);
        assert_eq!(league.label, "League Average");
        assert_eq!(league.get("AVG"), Some(&StatValue::Decimal(0.237)));
        assert_eq!(stats.league_batting_averages(Some("DET")).label, "DET Average");
    }

    #[test]
    fn missing_stats_dir_yields_empty_tables() {
        let stats = SeasonStats::load_dir(Path::new("/definitely/not/here"));
        assert!(stats.batting.is_empty());
        assert!(stats.pitcher_statline("Anyone").is_none());
    }

    #[test]
    fn non_numeric_columns_are_ignored() {
        let t = table(json!([{"Name": "A", "Team": "X", "Pos": "SS", "AVG": 0.3}]));
        assert_eq!(t.rows[0].values.len(), 1);
    }
}

//! Pure extraction functions over the loosely-typed game feed.
//!
//! Every function here is total: a missing or oddly-shaped key produces an
//! empty/default result, never an error. The feed is kept as a generic
//! `serde_json::Value` because its shape drifts between revisions.
use crate::{
    Base, BaseRunner, Count, CurrentPlayState, Defender, FieldPosition, GameSnapshot,
    PitchRecord, PitcherPitches, PitchingEvent, PlayEvent, StrikeZone, UNKNOWN,
    WinProbabilitySeries,
};
use log::debug;
use serde_json::Value;

const PITCHER_GROUPS: [&str; 2] = ["home_pitchers", "away_pitchers"];

/// Canonical form used when matching pitcher names typed by the user.
pub fn fold_pitcher_name(name: &str) -> String {
    name.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Pitch records
// ---------------------------------------------------------------------------

/// Located pitches for every pitcher, home group first, each pitcher in feed order.
pub fn extract_pitcher_groups(raw: &Value) -> Vec<PitcherPitches> {
    let mut groups = Vec::new();
    for key in PITCHER_GROUPS {
        let Some(pitchers) = raw.get(key).and_then(Value::as_object) else {
            continue;
        };
        for (pitcher_id, pitches) in pitchers {
            let entries = pitch_entries(pitches);
            let name = entries
                .first()
                .and_then(|first| first.get("pitcher_name"))
                .and_then(text);
            groups.push(PitcherPitches {
                pitcher_id: pitcher_id.clone(),
                name,
                pitches: extract_pitch_details(&entries),
            });
        }
    }
    groups
}

/// Every located pitch in the game. Entries without `px`/`pz` are dropped.
pub fn extract_pitch_records(raw: &Value) -> Vec<PitchRecord> {
    get_pitcher_data(raw, None)
}

/// All located pitches, or only those of the pitcher whose first recorded
/// pitch carries `pitcher_name` (case-insensitive, trimmed).
pub fn get_pitcher_data(raw: &Value, pitcher_name: Option<&str>) -> Vec<PitchRecord> {
    extract_pitcher_groups(raw)
        .into_iter()
        .filter(|group| pitcher_name.is_none_or(|name| group.is_named(name)))
        .flat_map(|group| group.pitches)
        .collect()
}

/// One name per pitcher id, taken from the pitcher's first recorded pitch.
pub fn extract_pitcher_names(raw: &Value) -> Vec<String> {
    let mut names = Vec::new();
    for key in PITCHER_GROUPS {
        let Some(pitchers) = raw.get(key).and_then(Value::as_object) else {
            continue;
        };
        for pitches in pitchers.values() {
            if let Some(name) = pitch_entries(pitches)
                .first()
                .and_then(|first| first.get("pitcher_name"))
                .and_then(text)
            {
                names.push(name);
            }
        }
    }
    names
}

fn extract_pitch_details(entries: &[&Value]) -> Vec<PitchRecord> {
    entries
        .iter()
        .filter_map(|pitch| {
            let record = located_pitch(pitch);
            if record.is_none() {
                debug!("dropping pitch without px/pz: {pitch}");
            }
            record
        })
        .collect()
}

/// A pitcher's list is normally an array, but single dicts turn up too.
fn pitch_entries(pitches: &Value) -> Vec<&Value> {
    match pitches {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![pitches],
        _ => Vec::new(),
    }
}

fn located_pitch(pitch: &Value) -> Option<PitchRecord> {
    let px = pitch.get("px").and_then(number)?;
    let pz = pitch.get("pz").and_then(number)?;
    Some(pitch_record(pitch, px, pz))
}

fn pitch_record(pitch: &Value, px: f64, pz: f64) -> PitchRecord {
    let label = |keys: &[&str]| field(pitch, keys).and_then(text).unwrap_or_else(|| UNKNOWN.into());
    let measure = |keys: &[&str]| field(pitch, keys).and_then(number);
    let count = |keys: &[&str]| field(pitch, keys).and_then(integer);

    PitchRecord {
        px,
        pz,
        pitch_type: label(&["pitch_type"]),
        pitch_name: label(&["pitch_name"]),
        start_speed: measure(&["start_speed", "startSpeed"]),
        end_speed: measure(&["end_speed", "endSpeed"]),
        spin_rate: measure(&["spin_rate", "spinRate"]),
        result: label(&["result"]),
        description: label(&["des"]),
        call: label(&["call_name"]),
        batter_name: label(&["batter_name"]),
        pitcher_name: label(&["pitcher_name"]),
        ab_number: count(&["ab_number"]),
        inning: count(&["inning"]),
        game_pitch_number: count(&["game_total_pitches"]),
    }
}

// ---------------------------------------------------------------------------
// Current at-bat
// ---------------------------------------------------------------------------

fn current_play(raw: &Value) -> Option<&Value> {
    raw.pointer("/scoreboard/currentPlay")
        .filter(|cp| cp.as_object().is_some_and(|o| !o.is_empty()))
}

fn play_events(raw: &Value) -> &[Value] {
    current_play(raw)
        .and_then(|cp| cp.get("playEvents"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// The at-bat in progress, or an empty state when there is none.
pub fn extract_current_play(raw: &Value) -> CurrentPlayState {
    let Some(cp) = current_play(raw) else {
        debug!("no current play in feed");
        return CurrentPlayState::default();
    };

    let small = |ptr: &str| {
        cp.pointer(ptr)
            .and_then(integer)
            .map(|n| n.min(u32::from(u8::MAX)) as u8)
            .unwrap_or_default()
    };

    CurrentPlayState {
        batter_name: cp.pointer("/matchup/batter/fullName").and_then(text),
        pitcher_name: cp.pointer("/matchup/pitcher/fullName").and_then(text),
        count: Count {
            balls: small("/count/balls"),
            strikes: small("/count/strikes"),
            outs: small("/count/outs"),
        },
        play_events: play_events(raw).iter().map(play_event).collect(),
    }
}

fn play_event(event: &Value) -> PlayEvent {
    PlayEvent {
        description: event.pointer("/details/description").and_then(text),
        is_pitch: event.get("isPitch").and_then(Value::as_bool).unwrap_or(false),
        pitch_name: event.pointer("/details/type/description").and_then(text),
        start_speed: event.pointer("/pitchData/startSpeed").and_then(number),
        location: event_location(event),
    }
}

fn event_location(event: &Value) -> Option<(f64, f64)> {
    let coords = event.pointer("/pitchData/coordinates")?;
    Some((coords.get("pX").and_then(number)?, coords.get("pZ").and_then(number)?))
}

/// Pitch records for the current at-bat, built from each event's `pitchData`.
pub fn extract_current_pitches(raw: &Value) -> Vec<PitchRecord> {
    play_events(raw)
        .iter()
        .filter_map(|event| {
            let (px, pz) = event_location(event)?;
            let pitch_data = event.get("pitchData")?;
            let mut record = pitch_record(pitch_data, px, pz);

            let detail = |ptr: &str| event.pointer(ptr).and_then(text);
            if record.pitch_name == UNKNOWN
                && let Some(name) = detail("/details/type/description")
            {
                record.pitch_name = name;
            }
            if record.pitch_type == UNKNOWN
                && let Some(code) = detail("/details/type/code")
            {
                record.pitch_type = code;
            }
            if record.description == UNKNOWN
                && let Some(des) = detail("/details/description")
            {
                record.description = des;
            }
            if record.call == UNKNOWN
                && let Some(call) = detail("/details/call/description")
            {
                record.call = call;
            }
            Some(record)
        })
        .collect()
}

/// Description of the last event of the current at-bat.
pub fn extract_current_result(raw: &Value) -> Option<String> {
    play_events(raw)
        .last()?
        .pointer("/details/description")
        .and_then(text)
}

/// Strike zone from the first play event only; defaults when anything is missing.
pub fn extract_strike_zone(raw: &Value) -> StrikeZone {
    let Some(first) = play_events(raw).first() else {
        debug!("no play events for the current play, using default strike zone");
        return StrikeZone::default();
    };
    let top = first.pointer("/pitchData/strikeZoneTop").and_then(number);
    let bottom = first.pointer("/pitchData/strikeZoneBottom").and_then(number);
    match (top, bottom) {
        (Some(top), Some(bottom)) => StrikeZone { top, bottom },
        _ => {
            debug!("strike zone missing from first play event, using default");
            StrikeZone::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Win probability
// ---------------------------------------------------------------------------

/// Home/away win probability series. All-or-nothing: any missing key yields `None`.
pub fn extract_win_probabilities(raw: &Value) -> Option<WinProbabilitySeries> {
    let wpa = raw.pointer("/scoreboard/stats/wpa/gameWpa")?.as_array()?;
    let series = |key: &str| -> Option<Vec<f64>> {
        wpa.iter().map(|entry| entry.get(key).and_then(number)).collect()
    };
    let mut home = series("homeTeamWinProbability")?;
    let mut away = series("awayTeamWinProbability")?;
    let home_team = raw.pointer("/home_team_data/abbreviation").and_then(text)?;
    let away_team = raw.pointer("/away_team_data/abbreviation").and_then(text)?;

    // Savant reports percentages; bring them into [0, 1].
    if home.iter().chain(away.iter()).any(|p| *p > 1.0) {
        for p in home.iter_mut().chain(away.iter_mut()) {
            *p /= 100.0;
        }
    }
    for p in home.iter_mut().chain(away.iter_mut()) {
        *p = p.clamp(0.0, 1.0);
    }

    Some(WinProbabilitySeries { home, away, home_team, away_team })
}

// ---------------------------------------------------------------------------
// Runners and defense
// ---------------------------------------------------------------------------

/// Runners on base. Reads `linescore.offense` when the feed has it, otherwise
/// the starting base of each runner in `currentPlay.runners`.
pub fn extract_base_runners(raw: &Value) -> Vec<BaseRunner> {
    if let Some(offense) = raw.pointer("/scoreboard/linescore/offense").and_then(Value::as_object) {
        return Base::ALL
            .into_iter()
            .filter_map(|base| {
                let name = offense.get(base.key())?.get("fullName").and_then(text)?;
                Some(BaseRunner { name, base })
            })
            .collect();
    }

    let Some(runners) = current_play(raw)
        .and_then(|cp| cp.get("runners"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut found: Vec<BaseRunner> = Vec::new();
    for runner in runners {
        let Some(base) = runner
            .pointer("/movement/start")
            .and_then(Value::as_str)
            .and_then(Base::from_movement)
        else {
            continue;
        };
        let Some(name) = runner.pointer("/details/runner/fullName").and_then(text) else {
            continue;
        };
        if !found.iter().any(|r| r.base == base) {
            found.push(BaseRunner { name, base });
        }
    }
    found.sort_by_key(|r| r.base);
    found
}

/// Fielders by position from `linescore.defense`. Older feeds without it
/// only give us the pitcher, via the current matchup.
pub fn extract_defenders(raw: &Value) -> Vec<Defender> {
    if let Some(defense) = raw.pointer("/scoreboard/linescore/defense").and_then(Value::as_object) {
        return FieldPosition::ALL
            .into_iter()
            .filter_map(|position| {
                let name = defense.get(position.key())?.get("fullName").and_then(text)?;
                Some(Defender { name, position })
            })
            .collect();
    }

    current_play(raw)
        .and_then(|cp| cp.pointer("/matchup/pitcher/fullName"))
        .and_then(text)
        .map(|name| vec![Defender { name, position: FieldPosition::Pitcher }])
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Event table
// ---------------------------------------------------------------------------

/// (home, away) runs from the linescore, zero when absent.
pub fn extract_score(raw: &Value) -> (u32, u32) {
    let runs = |side: &str| {
        raw.pointer(&format!("/scoreboard/linescore/teams/{side}/runs"))
            .and_then(integer)
            .unwrap_or(0)
    };
    (runs("home"), runs("away"))
}

/// Every recorded pitch as an event-table row, newest first.
pub fn extract_pitching_events(raw: &Value) -> Vec<PitchingEvent> {
    let (home_runs, away_runs) = extract_score(raw);
    let score = format!("{home_runs}-{away_runs}");

    let mut events = Vec::new();
    for key in PITCHER_GROUPS {
        let Some(pitchers) = raw.get(key).and_then(Value::as_object) else {
            continue;
        };
        for pitch in pitchers.values().flat_map(pitch_entries) {
            let label = |k: &str| pitch.get(k).and_then(text).unwrap_or_else(|| UNKNOWN.into());
            let tally = |k: &str| pitch.get(k).and_then(integer);
            events.push(PitchingEvent {
                pitch_type: label("pitch_type"),
                batter: label("batter_name"),
                pitcher: label("pitcher_name"),
                outs: tally("outs"),
                count: format!("{}-{}", tally("balls").unwrap_or(0), tally("strikes").unwrap_or(0)),
                spin_rate: pitch.get("spin_rate").and_then(number),
                result: label("result"),
                pitcher_pitch_count: tally("player_total_pitches"),
                game_pitch_number: tally("game_total_pitches"),
                score: score.clone(),
            });
        }
    }
    events.sort_by(|a, b| b.game_pitch_number.cmp(&a.game_pitch_number));
    events
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

impl GameSnapshot {
    /// Run every extraction over one fetched document.
    pub fn from_raw(game_pk: u64, raw: &Value) -> Self {
        let pitchers = extract_pitcher_groups(raw);
        Self {
            game_pk,
            pitcher_names: extract_pitcher_names(raw),
            pitchers,
            current_play: extract_current_play(raw),
            current_pitches: extract_current_pitches(raw),
            current_result: extract_current_result(raw),
            strike_zone: extract_strike_zone(raw),
            win_probability: extract_win_probabilities(raw),
            runners: extract_base_runners(raw),
            defenders: extract_defenders(raw),
            events: extract_pitching_events(raw),
            home_team: team_label(raw, "home_team_data"),
            away_team: team_label(raw, "away_team_data"),
            score: extract_score(raw),
        }
    }
}

fn team_label(raw: &Value, key: &str) -> Option<String> {
    let team = raw.get(key)?;
    field(team, &["abbreviation", "name"]).and_then(text)
}

// ---------------------------------------------------------------------------
// Value helpers
// ---------------------------------------------------------------------------

fn field<'a>(obj: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k).filter(|v| !v.is_null()))
}

fn number(v: &Value) -> Option<f64> {
    let n: f64 = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn integer(v: &Value) -> Option<u32> {
    number(v).filter(|n| *n >= 0.0).map(|n| n.round() as u32)
}

fn text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pitch(px: f64, pz: f64, name: &str, n: u32) -> Value {
        json!({
            "px": px,
            "pz": pz,
            "pitcher_name": name,
            "batter_name": "B. Hitter",
            "pitch_type": "FF",
            "pitch_name": "4-Seam Fastball",
            "start_speed": 95.1,
            "spin_rate": 2301,
            "des": "Called Strike",
            "call_name": "Strike",
            "result": "S",
            "inning": 1,
            "ab_number": 3,
            "game_total_pitches": n,
            "player_total_pitches": n,
            "balls": 1,
            "strikes": 2,
            "outs": 1
        })
    }

    fn game() -> Value {
        json!({
            "home_pitchers": {
                "123": [pitch(0.1, 2.5, "A. Smith", 2), pitch(-0.4, 1.9, "A. Smith", 4)],
                "456": [{"pitcher_name": "C. Reliever", "pz": 2.0}, pitch(0.9, 3.1, "C. Reliever", 9)]
            },
            "away_pitchers": {
                "789": [pitch(0.3, 2.2, "D. Visitor", 1)]
            },
            "home_team_data": {"abbreviation": "CLE"},
            "away_team_data": {"abbreviation": "DET"},
            "scoreboard": {
                "linescore": {
                    "teams": {"home": {"runs": 3}, "away": {"runs": 1}},
                    "offense": {
                        "first": {"id": 1, "fullName": "José Ramírez"},
                        "third": {"id": 2, "fullName": "Steven Kwan"}
                    },
                    "defense": {
                        "pitcher": {"fullName": "D. Visitor"},
                        "catcher": {"fullName": "J. Catcher"},
                        "shortstop": {"fullName": "S. Stop"}
                    }
                },
                "currentPlay": {
                    "matchup": {
                        "batter": {"fullName": "B. Hitter"},
                        "pitcher": {"fullName": "D. Visitor"}
                    },
                    "count": {"balls": 2, "strikes": 1, "outs": 1},
                    "playEvents": [
                        {
                            "isPitch": true,
                            "details": {"description": "Ball", "type": {"code": "SL", "description": "Slider"}},
                            "pitchData": {
                                "startSpeed": 86.2,
                                "strikeZoneTop": 3.41,
                                "strikeZoneBottom": 1.62,
                                "coordinates": {"pX": 1.2, "pZ": 0.8}
                            }
                        },
                        {
                            "isPitch": false,
                            "details": {"description": "Mound visit"}
                        },
                        {
                            "isPitch": true,
                            "details": {"description": "Foul"},
                            "pitchData": {"strikeZoneTop": 9.9, "coordinates": {"pX": 0.0, "pZ": 2.4}}
                        }
                    ]
                },
                "stats": {
                    "wpa": {
                        "gameWpa": [
                            {"homeTeamWinProbability": 50.0, "awayTeamWinProbability": 50.0},
                            {"homeTeamWinProbability": 62.5, "awayTeamWinProbability": 37.5}
                        ]
                    }
                }
            }
        })
    }

    #[test]
    fn pitches_without_location_are_dropped() {
        let records = extract_pitch_records(&game());
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(|r| r.pitcher_name != "C. Reliever" || r.px == 0.9));
    }

    #[test]
    fn missing_fields_default_to_unknown() {
        let raw = json!({"home_pitchers": {"1": [{"px": 0.0, "pz": 2.0}]}});
        let records = extract_pitch_records(&raw);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pitch_name, UNKNOWN);
        assert_eq!(records[0].batter_name, UNKNOWN);
        assert_eq!(records[0].start_speed, None);
    }

    #[test]
    fn pitch_order_follows_feed_within_each_pitcher() {
        let records = extract_pitch_records(&game());
        let smith: Vec<_> = records.iter().filter(|r| r.pitcher_name == "A. Smith").collect();
        assert_eq!(smith[0].px, 0.1);
        assert_eq!(smith[1].px, -0.4);
    }

    #[test]
    fn merged_records_sort_by_game_pitch_counter() {
        let mut records = extract_pitch_records(&game());
        crate::sort_chronologically(&mut records);
        let order: Vec<_> = records.iter().filter_map(|r| r.game_pitch_number).collect();
        assert_eq!(order, vec![1, 2, 4, 9]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let raw = game();
        let first = serde_json::to_string(&extract_pitch_records(&raw)).unwrap();
        let second = serde_json::to_string(&extract_pitch_records(&raw)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn single_pitcher_scenario() {
        let raw = json!({
            "home_pitchers": {"123": [{"px": 0.1, "pz": 2.5, "pitcher_name": "A. Smith"}]},
            "away_pitchers": {}
        });
        assert_eq!(extract_pitcher_names(&raw), vec!["A. Smith".to_string()]);
        let data = get_pitcher_data(&raw, Some("a. smith"));
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].px, 0.1);
        assert_eq!(data[0].pz, 2.5);
    }

    #[test]
    fn pitcher_names_follow_feed_order() {
        assert_eq!(
            extract_pitcher_names(&game()),
            vec!["A. Smith", "C. Reliever", "D. Visitor"]
        );
    }

    #[test]
    fn pitcher_filter_trims_and_ignores_case() {
        let raw = game();
        assert_eq!(get_pitcher_data(&raw, Some("  D. VISITOR ")).len(), 1);
        assert!(get_pitcher_data(&raw, Some("Nobody")).is_empty());
    }

    #[test]
    fn single_dict_pitch_list_is_accepted() {
        let raw = json!({"away_pitchers": {"9": {"px": 0.5, "pz": 2.0, "pitcher_name": "Solo"}}});
        assert_eq!(extract_pitch_records(&raw).len(), 1);
        assert_eq!(extract_pitcher_names(&raw), vec!["Solo"]);
    }

    #[test]
    fn current_play_is_typed() {
        let cp = extract_current_play(&game());
        assert_eq!(cp.batter_name.as_deref(), Some("B. Hitter"));
        assert_eq!(cp.pitcher_name.as_deref(), Some("D. Visitor"));
        assert_eq!(cp.count, Count { balls: 2, strikes: 1, outs: 1 });
        assert_eq!(cp.play_events.len(), 3);
        assert!(cp.play_events[0].is_pitch);
        assert_eq!(cp.play_events[0].location, Some((1.2, 0.8)));
    }

    #[test]
    fn missing_current_play_is_empty() {
        assert!(extract_current_play(&json!({})).is_empty());
        assert!(extract_current_play(&json!({"scoreboard": {"currentPlay": {}}})).is_empty());
        assert_eq!(extract_current_result(&json!({})), None);
    }

    #[test]
    fn current_pitches_fill_from_event_details() {
        let pitches = extract_current_pitches(&game());
        assert_eq!(pitches.len(), 2);
        assert_eq!(pitches[0].pitch_name, "Slider");
        assert_eq!(pitches[0].pitch_type, "SL");
        assert_eq!(pitches[0].start_speed, Some(86.2));
        assert_eq!(pitches[1].description, "Foul");
    }

    #[test]
    fn current_result_is_last_event() {
        assert_eq!(extract_current_result(&game()).as_deref(), Some("Foul"));
    }

    #[test]
    fn strike_zone_reads_first_event_only() {
        let zone = extract_strike_zone(&game());
        assert_eq!(zone, StrikeZone { top: 3.41, bottom: 1.62 });
    }

    #[test]
    fn strike_zone_defaults_without_events() {
        let empty = json!({"scoreboard": {"currentPlay": {"playEvents": []}}});
        assert_eq!(extract_strike_zone(&empty), StrikeZone { top: 3.5, bottom: 1.5 });
        assert_eq!(extract_strike_zone(&json!({})), StrikeZone { top: 3.5, bottom: 1.5 });

        let partial = json!({"scoreboard": {"currentPlay": {"playEvents": [
            {"pitchData": {"strikeZoneTop": 3.3}}
        ]}}});
        assert_eq!(extract_strike_zone(&partial), StrikeZone::default());
    }

    #[test]
    fn win_probabilities_are_scaled_to_unit_interval() {
        let series = extract_win_probabilities(&game()).unwrap();
        assert_eq!(series.home, vec![0.5, 0.625]);
        assert_eq!(series.away, vec![0.5, 0.375]);
        assert_eq!(series.home_team, "CLE");
        assert_eq!(series.away_team, "DET");
        assert_eq!(series.latest(), Some((0.625, 0.375)));
    }

    #[test]
    fn win_probabilities_are_all_or_nothing() {
        let mut no_wpa = game();
        no_wpa["scoreboard"]["stats"] = json!({});
        assert_eq!(extract_win_probabilities(&no_wpa), None);

        let mut no_home = game();
        no_home["home_team_data"] = json!({});
        assert_eq!(extract_win_probabilities(&no_home), None);

        let mut no_away = game();
        no_away.as_object_mut().unwrap().remove("away_team_data");
        assert_eq!(extract_win_probabilities(&no_away), None);

        let mut bad_entry = game();
        bad_entry["scoreboard"]["stats"]["wpa"]["gameWpa"][1] = json!({"homeTeamWinProbability": 40.0});
        assert_eq!(extract_win_probabilities(&bad_entry), None);
    }

    #[test]
    fn runners_come_from_linescore_offense() {
        let runners = extract_base_runners(&game());
        assert_eq!(
            runners,
            vec![
                BaseRunner { name: "José Ramírez".into(), base: Base::First },
                BaseRunner { name: "Steven Kwan".into(), base: Base::Third },
            ]
        );
    }

    #[test]
    fn runners_fall_back_to_play_movements() {
        let raw = json!({"scoreboard": {"currentPlay": {"runners": [
            {"movement": {"start": "2B", "end": "3B"}, "details": {"runner": {"fullName": "R. Two"}}},
            {"movement": {"start": null, "end": "1B"}, "details": {"runner": {"fullName": "Batter"}}},
            {"movement": {"start": "1B", "end": "2B"}, "details": {"runner": {"fullName": "R. One"}}}
        ]}}});
        let runners = extract_base_runners(&raw);
        assert_eq!(runners.len(), 2);
        assert_eq!(runners[0], BaseRunner { name: "R. One".into(), base: Base::First });
        assert_eq!(runners[1].base, Base::Second);
    }

    #[test]
    fn defenders_follow_position_order() {
        let defenders = extract_defenders(&game());
        let positions: Vec<_> = defenders.iter().map(|d| d.position).collect();
        assert_eq!(
            positions,
            vec![FieldPosition::Pitcher, FieldPosition::Catcher, FieldPosition::Shortstop]
        );
    }

    #[test]
    fn defenders_fall_back_to_matchup_pitcher() {
        let mut raw = game();
        raw["scoreboard"]["linescore"].as_object_mut().unwrap().remove("defense");
        let defenders = extract_defenders(&raw);
        assert_eq!(defenders, vec![Defender { name: "D. Visitor".into(), position: FieldPosition::Pitcher }]);
        assert!(extract_defenders(&json!({})).is_empty());
    }

    #[test]
    fn events_are_newest_first_with_score() {
        let events = extract_pitching_events(&game());
        assert_eq!(events.len(), 5);
        assert_eq!(events[0].game_pitch_number, Some(9));
        assert_eq!(events[0].score, "3-1");
        assert_eq!(events[0].count, "1-2");
        // the unlocated entry has no counter and sinks to the bottom
        assert_eq!(events[4].game_pitch_number, None);
    }

    #[test]
    fn snapshot_of_empty_document_is_empty() {
        let snap = GameSnapshot::from_raw(7, &json!({}));
        assert_eq!(snap.game_pk, 7);
        assert_eq!(snap.pitch_count(), 0);
        assert!(snap.current_play.is_empty());
        assert_eq!(snap.strike_zone, StrikeZone::default());
        assert!(snap.win_probability.is_none());
        assert_eq!(snap.score, (0, 0));
    }

    #[test]
    fn snapshot_filters_by_pitcher() {
        let snap = GameSnapshot::from_raw(1, &game());
        assert_eq!(snap.pitches_for(None).len(), 4);
        assert_eq!(snap.pitches_for(Some("a. smith")).len(), 2);
        assert!(snap.pitches_for(Some("missing")).is_empty());
        assert_eq!(snap.home_team.as_deref(), Some("CLE"));
    }
}

use crate::ScheduledGame;
use crate::schedule::{ScheduleGame, ScheduleResponse};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use reqwest::Client;
use serde_json::{Value, json};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const SAVANT_BASE: &str = "https://baseballsavant.mlb.com";
const STATSAPI_BASE: &str = "https://statsapi.mlb.com";
const MLB_SPORT_ID: u32 = 1;

/// Client for the Baseball Savant game feed and the MLB schedule.
///
/// The public fetch methods never fail: transport and parse errors are
/// logged and surface as `None` / an empty list, so a polling loop can
/// simply try again on its next tick.
#[derive(Debug, Clone)]
pub struct SavantApi {
    client: Client,
    timeout: Duration,
    savant_base: String,
    statsapi_base: String,
    pitcher_dump: Option<PathBuf>,
}

impl Default for SavantApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("pitchfx/0.1 (terminal pitch tracker)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            savant_base: SAVANT_BASE.into(),
            statsapi_base: STATSAPI_BASE.into(),
            pitcher_dump: None,
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl SavantApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point both endpoints somewhere else (a local mock server, a proxy).
    pub fn with_base_urls(mut self, savant: impl Into<String>, statsapi: impl Into<String>) -> Self {
        self.savant_base = savant.into();
        self.statsapi_base = statsapi.into();
        self
    }

    /// Write `{home_pitchers, away_pitchers}` to `path` after every successful fetch.
    pub fn with_pitcher_dump(mut self, path: impl Into<PathBuf>) -> Self {
        self.pitcher_dump = Some(path.into());
        self
    }

    /// Fetch the live game document for `game_pk`. One attempt, no retry.
    pub async fn fetch_game_state(&self, game_pk: u64) -> Option<Value> {
        match self.get_game_state(game_pk).await {
            Ok(raw) => {
                self.dump_pitchers(&raw);
                Some(raw)
            }
            Err(e) => {
                warn!("game {game_pk}: {e}");
                None
            }
        }
    }

    /// Every game on today's schedule, in feed order, regardless of status.
    pub async fn list_games_today(&self) -> Vec<ScheduledGame> {
        match self.get_schedule().await {
            Ok(raw) => map_schedule(raw),
            Err(e) => {
                warn!("schedule: {e}");
                Vec::new()
            }
        }
    }

    async fn get_game_state(&self, game_pk: u64) -> ApiResult<Value> {
        let url = format!("{}/gf?game_pk={game_pk}", self.savant_base);
        let raw: Value = self.get(&url).await?;
        if !raw.is_object() {
            return Err(ApiError::Other(format!("expected a JSON object from {url}")));
        }
        Ok(raw)
    }

    async fn get_schedule(&self) -> ApiResult<ScheduleResponse> {
        let url = format!("{}/api/v1/schedule?sportId={MLB_SPORT_ID}", self.statsapi_base);
        self.get(&url).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }

    fn dump_pitchers(&self, raw: &Value) {
        let Some(path) = self.pitcher_dump.as_ref() else {
            return;
        };
        let pitchers = json!({
            "home_pitchers": raw.get("home_pitchers").cloned().unwrap_or_else(|| json!({})),
            "away_pitchers": raw.get("away_pitchers").cloned().unwrap_or_else(|| json!({})),
        });
        let written = serde_json::to_string_pretty(&pitchers)
            .map_err(|e| e.to_string())
            .and_then(|body| std::fs::write(path, body).map_err(|e| e.to_string()));
        if let Err(e) = written {
            warn!("could not write pitcher dump to {}: {e}", path.display());
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: schedule wire types → domain types
// ---------------------------------------------------------------------------

fn map_schedule(raw: ScheduleResponse) -> Vec<ScheduledGame> {
    raw.dates
        .into_iter()
        .flat_map(|d| d.games)
        .filter_map(|g| map_schedule_game(&g))
        .collect()
}

fn map_schedule_game(game: &ScheduleGame) -> Option<ScheduledGame> {
    let game_pk = game.game_pk?;
    let teams = game.teams.as_ref();
    let team_name = |side: Option<&crate::schedule::ScheduleSide>| {
        side.and_then(|s| s.team_name())
            .unwrap_or("TBD")
            .to_owned()
    };

    Some(ScheduledGame {
        game_pk,
        away_team: team_name(teams.and_then(|t| t.away.as_ref())),
        home_team: team_name(teams.and_then(|t| t.home.as_ref())),
        status: game.status.as_ref().and_then(|s| s.detailed_state.clone()),
        start_time: game
            .game_date
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc)),
    })
}

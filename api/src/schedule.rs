/// Wire types for the MLB Stats API schedule endpoint.
/// Endpoint: https://statsapi.mlb.com/api/v1/schedule?sportId=1
use serde::Deserialize;

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    #[serde(default)]
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    #[serde(default)]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    pub game_pk: Option<u64>,
    pub game_date: Option<String>, // ISO 8601
    pub status: Option<ScheduleStatus>,
    pub teams: Option<ScheduleTeams>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleStatus {
    pub detailed_state: Option<String>, // "Scheduled", "In Progress", "Final"
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleTeams {
    pub home: Option<ScheduleSide>,
    pub away: Option<ScheduleSide>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleSide {
    pub team: Option<ScheduleTeam>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScheduleTeam {
    pub name: Option<String>,
}

impl ScheduleSide {
    pub fn team_name(&self) -> Option<&str> {
        self.team.as_ref()?.name.as_deref()
    }
}

//! Serde models for the provider's response envelope.
//!
//! Every numeric id and score arrives as a string; parsing happens in the
//! poll service where a failure can be attributed to a specific game.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Top-level response: everything sits under an `API` wrapper object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    /// The provider's envelope.
    #[serde(rename = "API")]
    pub api: ScheduleEnvelope,
}

/// Envelope carrying request metadata and the games list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEnvelope {
    /// Provider-side status code.
    pub status: i64,
    /// Echo of the requested operation.
    #[serde(default)]
    pub message: String,
    /// Number of games in the payload.
    pub results: i64,
    /// Filters the provider applied.
    #[serde(default)]
    pub filters: Vec<String>,
    /// The scheduled games for the requested date.
    pub games: Vec<ProviderGame>,
}

/// One game as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderGame {
    /// Season the game belongs to ("2019").
    pub season_year: String,
    /// Game id as a numeric string.
    pub game_id: String,
    /// UTC tip-off.
    #[serde(rename = "startTimeUTC", with = "time::serde::rfc3339")]
    pub start_time_utc: OffsetDateTime,
    /// Arena name.
    #[serde(default)]
    pub arena: String,
    /// Host city.
    #[serde(default)]
    pub city: String,
    /// Host country.
    #[serde(default)]
    pub country: String,
    /// Season stage marker.
    #[serde(default)]
    pub season_stage: String,
    /// Game status string ("Scheduled", "Finished", ...).
    pub status_game: String,
    /// Visiting side.
    pub v_team: ProviderTeam,
    /// Home side.
    pub h_team: ProviderTeam,
}

/// One side of a provider game.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTeam {
    /// Team id as a numeric string.
    pub team_id: String,
    /// Abbreviation ("NOP").
    #[serde(default)]
    pub short_name: String,
    /// Full display name.
    #[serde(default)]
    pub full_name: String,
    /// Short display name.
    #[serde(default)]
    pub nick_name: String,
    /// Logo URL.
    #[serde(default)]
    pub logo: String,
    /// Score block; points stay a string until the game is finished.
    #[serde(default)]
    pub score: ProviderScore,
}

/// Score block of one side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderScore {
    /// Points as a numeric string; empty while the game is not finished.
    #[serde(default)]
    pub points: String,
}

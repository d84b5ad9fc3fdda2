use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};

use crate::dao::models::{DayReportEntity, GameReportEntity, TeamSnapshot, Venue};

/// Query parameters for the day report endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct DayQuery {
    /// Day key to fetch; defaults to the current game day.
    pub date: Option<String>,
}

/// One side of a game as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    /// Provider-assigned team id.
    pub id: i64,
    /// Full display name.
    pub name: String,
    /// Short display name.
    pub nickname: String,
    /// Logo URL.
    pub logo: String,
    /// Points; zero until the game finishes.
    pub score: i64,
}

impl From<TeamSnapshot> for TeamDto {
    fn from(value: TeamSnapshot) -> Self {
        Self {
            id: value.id,
            name: value.name,
            nickname: value.nickname,
            logo: value.logo,
            score: value.score,
        }
    }
}

/// Venue details of a game.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VenueDto {
    /// Arena name.
    pub name: String,
    /// Host city.
    pub city: String,
    /// Host country.
    pub country: String,
}

impl From<Venue> for VenueDto {
    fn from(value: Venue) -> Self {
        Self {
            name: value.name,
            city: value.city,
            country: value.country,
        }
    }
}

/// One game inside a day report.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GameReportDto {
    /// Home side.
    pub home_team: TeamDto,
    /// Away side.
    pub away_team: TeamDto,
    /// Venue details.
    pub venue: VenueDto,
    /// Scheduled UTC start.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub date: OffsetDateTime,
    /// Winning team id once evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<i64>,
}

impl From<GameReportEntity> for GameReportDto {
    fn from(value: GameReportEntity) -> Self {
        Self {
            home_team: value.home_team.into(),
            away_team: value.away_team.into(),
            venue: value.venue.into(),
            date: value.date,
            winner_id: value.winner_id,
        }
    }
}

/// Full day report: the slate of games users pick against.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayReportDto {
    /// Day key.
    pub id: String,
    /// Games keyed by game id, in start-time order.
    pub games: IndexMap<i64, GameReportDto>,
    /// Cutoff for accepting picks.
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub deadline: OffsetDateTime,
    /// Whether winners have been computed.
    pub evaluated: bool,
}

impl From<DayReportEntity> for DayReportDto {
    fn from(value: DayReportEntity) -> Self {
        Self {
            id: value.id,
            games: value
                .games
                .into_iter()
                .map(|(id, game)| (id, game.into()))
                .collect(),
            deadline: value.deadline,
            evaluated: value.evaluated,
        }
    }
}

//! Document shapes persisted by the MongoDB backend.
//!
//! Documents mirror the dao entities but flatten the id-keyed maps into
//! arrays of embedded documents (BSON keys are strings, and the key order of
//! a map is part of the entity contract), and carry timestamps as BSON
//! datetimes.

use mongodb::bson::DateTime;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dao::models::{
    DayReportEntity, DayResultsEntity, GameEntity, GameReportEntity, GameStatus,
    LeaderboardEntity, PickEntity, PickSetEntity, PickStatus, TeamSnapshot, UserScore, Venue,
};

fn to_bson_date(value: OffsetDateTime) -> DateTime {
    DateTime::from_system_time(SystemTime::from(value))
}

fn from_bson_date(value: DateTime) -> OffsetDateTime {
    OffsetDateTime::from(value.to_system_time())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDocument {
    #[serde(rename = "_id")]
    id: i64,
    season_id: String,
    status: GameStatus,
    game_day_id: String,
    season_stage: String,
    start_date: DateTime,
    winner_id: Option<i64>,
    home_team: TeamSnapshot,
    away_team: TeamSnapshot,
    venue: Venue,
}

impl From<GameEntity> for GameDocument {
    fn from(value: GameEntity) -> Self {
        Self {
            id: value.id,
            season_id: value.season_id,
            status: value.status,
            game_day_id: value.game_day_id,
            season_stage: value.season_stage,
            start_date: to_bson_date(value.start_date),
            winner_id: value.winner_id,
            home_team: value.home_team,
            away_team: value.away_team,
            venue: value.venue,
        }
    }
}

impl From<GameDocument> for GameEntity {
    fn from(value: GameDocument) -> Self {
        Self {
            id: value.id,
            season_id: value.season_id,
            status: value.status,
            game_day_id: value.game_day_id,
            season_stage: value.season_stage,
            start_date: from_bson_date(value.start_date),
            winner_id: value.winner_id,
            home_team: value.home_team,
            away_team: value.away_team,
            venue: value.venue,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameReportDocument {
    game_id: i64,
    home_team: TeamSnapshot,
    away_team: TeamSnapshot,
    venue: Venue,
    date: DateTime,
    winner_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReportDocument {
    #[serde(rename = "_id")]
    id: String,
    games: Vec<GameReportDocument>,
    deadline: DateTime,
    evaluated: bool,
}

impl From<DayReportEntity> for DayReportDocument {
    fn from(value: DayReportEntity) -> Self {
        let games = value
            .games
            .into_iter()
            .map(|(game_id, report)| GameReportDocument {
                game_id,
                home_team: report.home_team,
                away_team: report.away_team,
                venue: report.venue,
                date: to_bson_date(report.date),
                winner_id: report.winner_id,
            })
            .collect();

        Self {
            id: value.id,
            games,
            deadline: to_bson_date(value.deadline),
            evaluated: value.evaluated,
        }
    }
}

impl From<DayReportDocument> for DayReportEntity {
    fn from(value: DayReportDocument) -> Self {
        let games = value
            .games
            .into_iter()
            .map(|game| {
                (
                    game.game_id,
                    GameReportEntity {
                        home_team: game.home_team,
                        away_team: game.away_team,
                        venue: game.venue,
                        date: from_bson_date(game.date),
                        winner_id: game.winner_id,
                    },
                )
            })
            .collect();

        Self {
            id: value.id,
            games,
            deadline: from_bson_date(value.deadline),
            evaluated: value.evaluated,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickDocument {
    game_id: i64,
    selection_id: Option<i64>,
    status: PickStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickSetDocument {
    #[serde(rename = "_id")]
    id: Uuid,
    user_id: i64,
    season_id: String,
    game_day_id: String,
    picks: Vec<PickDocument>,
    evaluated: bool,
    score: i64,
    submitted_at: DateTime,
}

impl PickSetDocument {
    /// Identity of the pick set this document describes.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Owning user, half of the upsert key.
    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    /// Day key, the other half of the upsert key.
    pub fn game_day_id(&self) -> &str {
        &self.game_day_id
    }
}

impl From<PickSetEntity> for PickSetDocument {
    fn from(value: PickSetEntity) -> Self {
        let picks = value
            .picks
            .into_iter()
            .map(|(game_id, pick)| PickDocument {
                game_id,
                selection_id: pick.selection_id,
                status: pick.status,
            })
            .collect();

        Self {
            id: value.id,
            user_id: value.user_id,
            season_id: value.season_id,
            game_day_id: value.game_day_id,
            picks,
            evaluated: value.evaluated,
            score: value.score,
            submitted_at: to_bson_date(value.submitted_at),
        }
    }
}

impl From<PickSetDocument> for PickSetEntity {
    fn from(value: PickSetDocument) -> Self {
        let picks = value
            .picks
            .into_iter()
            .map(|pick| {
                (
                    pick.game_id,
                    PickEntity {
                        selection_id: pick.selection_id,
                        status: pick.status,
                    },
                )
            })
            .collect();

        Self {
            id: value.id,
            user_id: value.user_id,
            season_id: value.season_id,
            game_day_id: value.game_day_id,
            picks,
            evaluated: value.evaluated,
            score: value.score,
            submitted_at: from_bson_date(value.submitted_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayResultsDocument {
    #[serde(rename = "_id")]
    id: String,
    scores: Vec<UserScore>,
}

impl From<DayResultsEntity> for DayResultsDocument {
    fn from(value: DayResultsEntity) -> Self {
        Self {
            id: value.id,
            scores: value.scores,
        }
    }
}

impl From<DayResultsDocument> for DayResultsEntity {
    fn from(value: DayResultsDocument) -> Self {
        Self {
            id: value.id,
            scores: value.scores,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardDocument {
    #[serde(rename = "_id")]
    id: String,
    standings: Vec<UserScore>,
}

impl From<LeaderboardEntity> for LeaderboardDocument {
    fn from(value: LeaderboardEntity) -> Self {
        Self {
            id: value.id,
            standings: value.standings,
        }
    }
}

impl From<LeaderboardDocument> for LeaderboardEntity {
    fn from(value: LeaderboardDocument) -> Self {
        Self {
            id: value.id,
            standings: value.standings,
        }
    }
}

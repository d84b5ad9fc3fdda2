use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dao::models::{DayResultsEntity, LeaderboardEntity, UserScore};

/// Query parameters for the daily results endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ResultsQuery {
    /// Day key to fetch; defaults to yesterday's game day.
    pub date: Option<String>,
}

/// Query parameters for the leaderboard endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct LeaderboardQuery {
    /// Season id to fetch; defaults to the configured season.
    pub season: Option<String>,
}

/// One ranked row of a daily result list or leaderboard.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserScoreDto {
    /// Ranked user.
    pub user_id: i64,
    /// Score for the ranked period.
    pub score: i64,
}

impl From<UserScore> for UserScoreDto {
    fn from(value: UserScore) -> Self {
        Self {
            user_id: value.user_id,
            score: value.score,
        }
    }
}

/// Ranked results of one game day.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DayResultsDto {
    /// Day key.
    pub id: String,
    /// Rows descending by score.
    pub scores: Vec<UserScoreDto>,
}

impl From<DayResultsEntity> for DayResultsDto {
    fn from(value: DayResultsEntity) -> Self {
        Self {
            id: value.id,
            scores: value.scores.into_iter().map(Into::into).collect(),
        }
    }
}

/// Season-wide cumulative standings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaderboardDto {
    /// Season id.
    pub id: String,
    /// Rows descending by cumulative score.
    pub standings: Vec<UserScoreDto>,
}

impl From<LeaderboardEntity> for LeaderboardDto {
    fn from(value: LeaderboardEntity) -> Self {
        Self {
            id: value.id,
            standings: value.standings.into_iter().map(Into::into).collect(),
        }
    }
}

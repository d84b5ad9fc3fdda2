//! Storage-layer entities shared across the dao, service, and dto layers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of a game as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameStatus {
    /// Tip-off has not happened yet.
    Scheduled,
    /// Currently being played.
    InProgress,
    /// Final score is known.
    Finished,
    /// Anything else the provider reports (postponed, cancelled, ...).
    Other,
}

impl GameStatus {
    /// Map the provider's `statusGame` string onto the internal enum.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "Scheduled" => GameStatus::Scheduled,
            "In Play" => GameStatus::InProgress,
            "Finished" => GameStatus::Finished,
            _ => GameStatus::Other,
        }
    }

    /// Whether the game has reached a terminal state with a final score.
    pub fn is_finished(self) -> bool {
        matches!(self, GameStatus::Finished)
    }
}

/// Embedded snapshot of one side of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    /// Provider-assigned team id.
    pub id: i64,
    /// Full display name ("New Orleans Pelicans").
    pub name: String,
    /// Short display name ("Pelicans").
    pub nickname: String,
    /// Logo URL.
    pub logo: String,
    /// Final points; zero until the parent game is finished.
    pub score: i64,
}

/// Where a game is played. Embedded, informational only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    /// Arena name.
    pub name: String,
    /// Host city.
    pub city: String,
    /// Host country.
    pub country: String,
}

/// One scheduled or played match, upserted on every provider poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEntity {
    /// Stable provider-assigned id; the upsert key.
    pub id: i64,
    /// Season the game belongs to ("2019").
    pub season_id: String,
    /// Current lifecycle state.
    pub status: GameStatus,
    /// Day key the game is attributed to; derived once at ingestion and
    /// stable across re-ingestion.
    pub game_day_id: String,
    /// Provider's season stage marker (regular season, playoffs, ...).
    pub season_stage: String,
    /// UTC tip-off time.
    pub start_date: OffsetDateTime,
    /// Winning team id once the game is finished.
    pub winner_id: Option<i64>,
    /// Home side snapshot.
    pub home_team: TeamSnapshot,
    /// Away side snapshot.
    pub away_team: TeamSnapshot,
    /// Venue snapshot.
    pub venue: Venue,
}

/// Projection of a single game inside a day report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReportEntity {
    /// Home side snapshot.
    pub home_team: TeamSnapshot,
    /// Away side snapshot.
    pub away_team: TeamSnapshot,
    /// Venue snapshot.
    pub venue: Venue,
    /// Scheduled UTC start.
    pub date: OffsetDateTime,
    /// Winning team id, set during evaluation for finished games.
    pub winner_id: Option<i64>,
}

/// Per-day report: the slate users pick against, keyed by its day key.
///
/// The games map preserves insertion order, which is start-time ascending
/// from the builder, so derived listings stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReportEntity {
    /// Day key, also the storage identity.
    pub id: String,
    /// Game id to game projection, in start-time order.
    pub games: IndexMap<i64, GameReportEntity>,
    /// Earliest tip-off of the day; the cutoff for accepting picks.
    pub deadline: OffsetDateTime,
    /// Flipped exactly once when winners are computed.
    pub evaluated: bool,
}

/// Outcome of a single pick after evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(missing_docs)]
pub enum PickStatus {
    Pending,
    Correct,
    Incorrect,
}

/// One user's prediction for one game.
///
/// `selection_id` is `None` for games the user left unpicked; an absent
/// selection never matches a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickEntity {
    /// Team the user picked to win, if any.
    pub selection_id: Option<i64>,
    /// Evaluation outcome.
    pub status: PickStatus,
}

impl PickEntity {
    /// Placeholder entry for a game the user did not select.
    pub fn unselected() -> Self {
        Self {
            selection_id: None,
            status: PickStatus::Pending,
        }
    }

    /// Pending pick for the given team.
    pub fn pending(team_id: i64) -> Self {
        Self {
            selection_id: Some(team_id),
            status: PickStatus::Pending,
        }
    }
}

/// One user's complete pick set for one game day. Upserted by (user, day).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickSetEntity {
    /// Synthetic identity of this pick set.
    pub id: Uuid,
    /// Owning user.
    pub user_id: i64,
    /// Season the day belongs to, denormalized for the leaderboard scan.
    pub season_id: String,
    /// Day key the picks apply to.
    pub game_day_id: String,
    /// One entry per game in the owning day report.
    pub picks: IndexMap<i64, PickEntity>,
    /// Flipped exactly once when the day's winners are known.
    pub evaluated: bool,
    /// Count of CORRECT picks; zero until evaluated.
    pub score: i64,
    /// When the user submitted this set.
    pub submitted_at: OffsetDateTime,
}

/// One (user, score) row in a derived ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserScore {
    /// Ranked user.
    pub user_id: i64,
    /// Score for the ranked period.
    pub score: i64,
}

/// Ranked daily results, fully recomputed after each evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayResultsEntity {
    /// Day key, also the storage identity.
    pub id: String,
    /// Descending by score; ties ordered by ascending user id.
    pub scores: Vec<UserScore>,
}

/// Season-wide cumulative standings, fully recomputed each pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntity {
    /// Season id, also the storage identity.
    pub id: String,
    /// Descending by cumulative score; ties ordered by ascending user id.
    pub standings: Vec<UserScore>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_statuses_map_onto_the_enum() {
        assert_eq!(
            GameStatus::from_provider("Scheduled"),
            GameStatus::Scheduled
        );
        assert_eq!(GameStatus::from_provider("In Play"), GameStatus::InProgress);
        assert_eq!(GameStatus::from_provider("Finished"), GameStatus::Finished);
        assert_eq!(GameStatus::from_provider("Postponed"), GameStatus::Other);
        assert!(GameStatus::from_provider("Finished").is_finished());
        assert!(!GameStatus::from_provider("In Play").is_finished());
    }

    #[test]
    fn pick_statuses_serialize_screaming() {
        let json = serde_json::to_string(&PickStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let json = serde_json::to_string(&PickEntity::pending(23)).unwrap();
        assert_eq!(json, "{\"selection_id\":23,\"status\":\"PENDING\"}");
    }
}

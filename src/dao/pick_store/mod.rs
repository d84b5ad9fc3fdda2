/// Deterministic in-memory backend used by the test-suite and storage-free runs.
pub mod memory;
#[cfg(feature = "mongo-store")]
/// MongoDB-backed implementation.
pub mod mongodb;

use futures::future::BoxFuture;

use crate::dao::models::{
    DayReportEntity, DayResultsEntity, GameEntity, LeaderboardEntity, PickSetEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for games, reports, picks, and
/// derived rankings.
///
/// Every write is a full-document upsert keyed as documented on the entity;
/// there are no cross-document transactions, so callers rely on each write
/// being idempotent on repetition.
pub trait PickStore: Send + Sync {
    /// Upsert a game by its provider-assigned id.
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// All games attributed to a day key, start time ascending.
    fn find_games_by_day(&self, day: &str) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>>;
    /// Upsert a day report by its day key.
    fn save_day_report(&self, report: DayReportEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Day report for a day key, if one has been built.
    fn find_day_report(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayReportEntity>>>;
    /// Upsert a pick set keyed by its (user, day) pair.
    fn save_pick_set(&self, picks: PickSetEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Every pick set submitted for a day key.
    fn find_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>>;
    /// Evaluated pick sets for a day key, input to the daily ranking.
    fn find_evaluated_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>>;
    /// Every evaluated pick set of a season, input to the leaderboard scan.
    fn find_evaluated_pick_sets_by_season(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>>;
    /// Replace the derived daily results for their day key.
    fn save_day_results(&self, results: DayResultsEntity)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Derived daily results for a day key.
    fn find_day_results(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayResultsEntity>>>;
    /// Replace the season leaderboard.
    fn save_leaderboard(&self, board: LeaderboardEntity)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Season leaderboard, if one has been aggregated.
    fn find_leaderboard(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Option<LeaderboardEntity>>>;
    /// Cheap liveness probe against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}

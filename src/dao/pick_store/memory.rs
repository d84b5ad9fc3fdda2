//! In-memory [`PickStore`] backend.
//!
//! Keeps every collection in plain maps behind one lock. Used by the unit
//! tests and by local runs that do not have a database at hand; behavior
//! mirrors the MongoDB backend (full-replace upserts, keyed queries) so the
//! services cannot tell the two apart.

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use futures::future::BoxFuture;

use crate::dao::{
    models::{DayReportEntity, DayResultsEntity, GameEntity, LeaderboardEntity, PickSetEntity},
    pick_store::PickStore,
    storage::{StorageError, StorageResult},
};

#[derive(Default)]
struct Collections {
    games: HashMap<i64, GameEntity>,
    day_reports: HashMap<String, DayReportEntity>,
    /// Keyed by (user id, day key), the upsert identity of a pick set.
    pick_sets: HashMap<(i64, String), PickSetEntity>,
    day_results: HashMap<String, DayResultsEntity>,
    leaderboards: HashMap<String, LeaderboardEntity>,
}

/// Deterministic, always-available store.
#[derive(Clone, Default)]
pub struct MemoryPickStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryPickStore {
    /// Fresh, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, op: &str, f: impl FnOnce(&Collections) -> T) -> StorageResult<T> {
        match self.inner.read() {
            Ok(guard) => Ok(f(&guard)),
            Err(_) => Err(StorageError::corrupted(format!("{op}: store lock poisoned"))),
        }
    }

    fn write<T>(&self, op: &str, f: impl FnOnce(&mut Collections) -> T) -> StorageResult<T> {
        match self.inner.write() {
            Ok(mut guard) => Ok(f(&mut guard)),
            Err(_) => Err(StorageError::corrupted(format!("{op}: store lock poisoned"))),
        }
    }
}

impl PickStore for MemoryPickStore {
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.write("save_game", |c| {
                c.games.insert(game.id, game);
            })
        })
    }

    fn find_games_by_day(&self, day: &str) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move {
            store.read("find_games_by_day", |c| {
                let mut games: Vec<GameEntity> = c
                    .games
                    .values()
                    .filter(|game| game.game_day_id == day)
                    .cloned()
                    .collect();
                games.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.id.cmp(&b.id)));
                games
            })
        })
    }

    fn save_day_report(&self, report: DayReportEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.write("save_day_report", |c| {
                c.day_reports.insert(report.id.clone(), report);
            })
        })
    }

    fn find_day_report(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayReportEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move { store.read("find_day_report", |c| c.day_reports.get(&day).cloned()) })
    }

    fn save_pick_set(&self, picks: PickSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.write("save_pick_set", |c| {
                c.pick_sets
                    .insert((picks.user_id, picks.game_day_id.clone()), picks);
            })
        })
    }

    fn find_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move {
            store.read("find_pick_sets_by_day", |c| {
                let mut sets: Vec<PickSetEntity> = c
                    .pick_sets
                    .values()
                    .filter(|set| set.game_day_id == day)
                    .cloned()
                    .collect();
                sets.sort_by_key(|set| set.user_id);
                sets
            })
        })
    }

    fn find_evaluated_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move {
            store.read("find_evaluated_pick_sets_by_day", |c| {
                let mut sets: Vec<PickSetEntity> = c
                    .pick_sets
                    .values()
                    .filter(|set| set.game_day_id == day && set.evaluated)
                    .cloned()
                    .collect();
                sets.sort_by_key(|set| set.user_id);
                sets
            })
        })
    }

    fn find_evaluated_pick_sets_by_season(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let season = season.to_owned();
        Box::pin(async move {
            store.read("find_evaluated_pick_sets_by_season", |c| {
                let mut sets: Vec<PickSetEntity> = c
                    .pick_sets
                    .values()
                    .filter(|set| set.season_id == season && set.evaluated)
                    .cloned()
                    .collect();
                sets.sort_by(|a, b| {
                    a.user_id
                        .cmp(&b.user_id)
                        .then_with(|| a.game_day_id.cmp(&b.game_day_id))
                });
                sets
            })
        })
    }

    fn save_day_results(
        &self,
        results: DayResultsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.write("save_day_results", |c| {
                c.day_results.insert(results.id.clone(), results);
            })
        })
    }

    fn find_day_results(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayResultsEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move { store.read("find_day_results", |c| c.day_results.get(&day).cloned()) })
    }

    fn save_leaderboard(
        &self,
        board: LeaderboardEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.write("save_leaderboard", |c| {
                c.leaderboards.insert(board.id.clone(), board);
            })
        })
    }

    fn find_leaderboard(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Option<LeaderboardEntity>>> {
        let store = self.clone();
        let season = season.to_owned();
        Box::pin(async move {
            store.read("find_leaderboard", |c| c.leaderboards.get(&season).cloned())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;
    use crate::dao::models::{GameStatus, TeamSnapshot, Venue};

    fn game(id: i64, day: &str, start: time::OffsetDateTime) -> GameEntity {
        GameEntity {
            id,
            season_id: "2019".into(),
            status: GameStatus::Scheduled,
            game_day_id: day.into(),
            season_stage: "2".into(),
            start_date: start,
            winner_id: None,
            home_team: TeamSnapshot {
                id: 1,
                name: "Home".into(),
                nickname: "Home".into(),
                logo: String::new(),
                score: 0,
            },
            away_team: TeamSnapshot {
                id: 2,
                name: "Away".into(),
                nickname: "Away".into(),
                logo: String::new(),
                score: 0,
            },
            venue: Venue {
                name: "Arena".into(),
                city: "City".into(),
                country: "Country".into(),
            },
        }
    }

    #[tokio::test]
    async fn games_are_upserted_by_id_and_sorted_by_start() {
        let store = MemoryPickStore::new();
        store
            .save_game(game(2, "2020-01-18", datetime!(2020-01-19 01:00 UTC)))
            .await
            .unwrap();
        store
            .save_game(game(1, "2020-01-18", datetime!(2020-01-18 20:30 UTC)))
            .await
            .unwrap();
        store
            .save_game(game(3, "2020-01-19", datetime!(2020-01-19 20:00 UTC)))
            .await
            .unwrap();

        let games = store.find_games_by_day("2020-01-18").await.unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].id, 1);
        assert_eq!(games[1].id, 2);

        // Re-saving the same id replaces rather than duplicates.
        store
            .save_game(game(1, "2020-01-18", datetime!(2020-01-18 20:30 UTC)))
            .await
            .unwrap();
        assert_eq!(store.find_games_by_day("2020-01-18").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn pick_sets_upsert_by_user_and_day() {
        let store = MemoryPickStore::new();
        let mut set = PickSetEntity {
            id: Uuid::new_v4(),
            user_id: 12345,
            season_id: "2019".into(),
            game_day_id: "2020-01-18".into(),
            picks: IndexMap::new(),
            evaluated: false,
            score: 0,
            submitted_at: datetime!(2020-01-18 12:00 UTC),
        };
        store.save_pick_set(set.clone()).await.unwrap();

        // Same user and day replaces the earlier submission.
        set.id = Uuid::new_v4();
        set.score = 3;
        set.evaluated = true;
        store.save_pick_set(set.clone()).await.unwrap();

        let sets = store.find_pick_sets_by_day("2020-01-18").await.unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].score, 3);

        let evaluated = store
            .find_evaluated_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        assert_eq!(evaluated.len(), 1);

        let by_season = store
            .find_evaluated_pick_sets_by_season("2019")
            .await
            .unwrap();
        assert_eq!(by_season.len(), 1);
        assert!(
            store
                .find_evaluated_pick_sets_by_season("2020")
                .await
                .unwrap()
                .is_empty()
        );
    }
}

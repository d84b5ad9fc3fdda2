use std::sync::Arc;

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    options::IndexOptions,
};
use tokio::sync::RwLock;

use super::{
    config::MongoConfig,
    connection::establish_connection,
    error::{MongoDaoError, MongoResult},
    models::{
        DayReportDocument, DayResultsDocument, GameDocument, LeaderboardDocument,
        PickSetDocument,
    },
};
use crate::dao::{
    models::{DayReportEntity, DayResultsEntity, GameEntity, LeaderboardEntity, PickSetEntity},
    pick_store::PickStore,
    storage::StorageResult,
};

const GAMES_COLLECTION: &str = "games";
const DAY_REPORTS_COLLECTION: &str = "game_days";
const PICKS_COLLECTION: &str = "picks";
const DAY_RESULTS_COLLECTION: &str = "game_day_results";
const LEADERBOARDS_COLLECTION: &str = "leaderboards";

/// MongoDB-backed pick store.
#[derive(Clone)]
pub struct MongoPickStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

impl MongoInner {
    async fn ping(&self) -> MongoResult<()> {
        let database = {
            let guard = self.state.read().await;
            guard.database.clone()
        };

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) =
            establish_connection(&self.config.options, &self.config.database_name).await?;
        let mut guard = self.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }
}

impl MongoPickStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) =
            establish_connection(&config.options, &config.database_name).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    /// Create the indexes every keyed query in the trait relies on.
    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let games = database.collection::<Document>(GAMES_COLLECTION);
        let game_day_index = IndexModel::builder()
            .keys(doc! {"game_day_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("game_day_idx".to_owned()))
                    .build(),
            )
            .build();
        games
            .create_index(game_day_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: GAMES_COLLECTION,
                index: "game_day_id",
                source,
            })?;

        let picks = database.collection::<Document>(PICKS_COLLECTION);
        // A user owns at most one pick set per game day.
        let owner_index = IndexModel::builder()
            .keys(doc! {"user_id": 1, "game_day_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("pick_owner_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        picks
            .create_index(owner_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PICKS_COLLECTION,
                index: "user_id,game_day_id",
                source,
            })?;

        let day_evaluated_index = IndexModel::builder()
            .keys(doc! {"game_day_id": 1, "evaluated": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("pick_day_evaluated_idx".to_owned()))
                    .build(),
            )
            .build();
        picks
            .create_index(day_evaluated_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PICKS_COLLECTION,
                index: "game_day_id,evaluated",
                source,
            })?;

        let season_evaluated_index = IndexModel::builder()
            .keys(doc! {"season_id": 1, "evaluated": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("pick_season_evaluated_idx".to_owned()))
                    .build(),
            )
            .build();
        picks
            .create_index(season_evaluated_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: PICKS_COLLECTION,
                index: "season_id,evaluated",
                source,
            })?;

        Ok(())
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn games(&self) -> Collection<GameDocument> {
        self.database().await.collection(GAMES_COLLECTION)
    }

    async fn day_reports(&self) -> Collection<DayReportDocument> {
        self.database().await.collection(DAY_REPORTS_COLLECTION)
    }

    async fn picks(&self) -> Collection<PickSetDocument> {
        self.database().await.collection(PICKS_COLLECTION)
    }

    async fn day_results(&self) -> Collection<DayResultsDocument> {
        self.database().await.collection(DAY_RESULTS_COLLECTION)
    }

    async fn leaderboards(&self) -> Collection<LeaderboardDocument> {
        self.database().await.collection(LEADERBOARDS_COLLECTION)
    }

    async fn save_game(&self, game: GameEntity) -> MongoResult<()> {
        let id = game.id;
        let document: GameDocument = game.into();
        self.games()
            .await
            .replace_one(doc! {"_id": id}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveGame { id, source })?;
        Ok(())
    }

    async fn find_games_by_day(&self, day: String) -> MongoResult<Vec<GameEntity>> {
        let documents: Vec<GameDocument> = self
            .games()
            .await
            .find(doc! {"game_day_id": &day})
            .sort(doc! {"start_date": 1})
            .await
            .map_err(|source| MongoDaoError::ListGames {
                day: day.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListGames { day, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_day_report(&self, report: DayReportEntity) -> MongoResult<()> {
        let day = report.id.clone();
        let document: DayReportDocument = report.into();
        self.day_reports()
            .await
            .replace_one(doc! {"_id": &day}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDayReport { day, source })?;
        Ok(())
    }

    async fn find_day_report(&self, day: String) -> MongoResult<Option<DayReportEntity>> {
        let document = self
            .day_reports()
            .await
            .find_one(doc! {"_id": &day})
            .await
            .map_err(|source| MongoDaoError::LoadDayReport { day, source })?;
        Ok(document.map(Into::into))
    }

    async fn save_pick_set(&self, picks: PickSetEntity) -> MongoResult<()> {
        let document: PickSetDocument = picks.into();
        let filter = doc! {
            "user_id": document.user_id(),
            "game_day_id": document.game_day_id(),
        };
        let id = document.id();
        let day = document.game_day_id().to_owned();
        self.picks()
            .await
            .replace_one(filter, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SavePickSet { id, day, source })?;
        Ok(())
    }

    async fn find_pick_sets(&self, filter: Document, day: String) -> MongoResult<Vec<PickSetEntity>> {
        let documents: Vec<PickSetDocument> = self
            .picks()
            .await
            .find(filter)
            .sort(doc! {"user_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListPickSets {
                day: day.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListPickSets { day, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn find_evaluated_pick_sets_by_season(
        &self,
        season: String,
    ) -> MongoResult<Vec<PickSetEntity>> {
        let documents: Vec<PickSetDocument> = self
            .picks()
            .await
            .find(doc! {"season_id": &season, "evaluated": true})
            .sort(doc! {"user_id": 1, "game_day_id": 1})
            .await
            .map_err(|source| MongoDaoError::ListSeasonPickSets {
                season: season.clone(),
                source,
            })?
            .try_collect()
            .await
            .map_err(|source| MongoDaoError::ListSeasonPickSets { season, source })?;

        Ok(documents.into_iter().map(Into::into).collect())
    }

    async fn save_day_results(&self, results: DayResultsEntity) -> MongoResult<()> {
        let day = results.id.clone();
        let document: DayResultsDocument = results.into();
        self.day_results()
            .await
            .replace_one(doc! {"_id": &day}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveDayResults { day, source })?;
        Ok(())
    }

    async fn find_day_results(&self, day: String) -> MongoResult<Option<DayResultsEntity>> {
        let document = self
            .day_results()
            .await
            .find_one(doc! {"_id": &day})
            .await
            .map_err(|source| MongoDaoError::LoadDayResults { day, source })?;
        Ok(document.map(Into::into))
    }

    async fn save_leaderboard(&self, board: LeaderboardEntity) -> MongoResult<()> {
        let season = board.id.clone();
        let document: LeaderboardDocument = board.into();
        self.leaderboards()
            .await
            .replace_one(doc! {"_id": &season}, &document)
            .upsert(true)
            .await
            .map_err(|source| MongoDaoError::SaveLeaderboard { season, source })?;
        Ok(())
    }

    async fn find_leaderboard(&self, season: String) -> MongoResult<Option<LeaderboardEntity>> {
        let document = self
            .leaderboards()
            .await
            .find_one(doc! {"_id": &season})
            .await
            .map_err(|source| MongoDaoError::LoadLeaderboard { season, source })?;
        Ok(document.map(Into::into))
    }
}

impl PickStore for MongoPickStore {
    fn save_game(&self, game: GameEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_game(game).await.map_err(Into::into) })
    }

    fn find_games_by_day(&self, day: &str) -> BoxFuture<'static, StorageResult<Vec<GameEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move { store.find_games_by_day(day).await.map_err(Into::into) })
    }

    fn save_day_report(&self, report: DayReportEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_day_report(report).await.map_err(Into::into) })
    }

    fn find_day_report(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayReportEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move { store.find_day_report(day).await.map_err(Into::into) })
    }

    fn save_pick_set(&self, picks: PickSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_pick_set(picks).await.map_err(Into::into) })
    }

    fn find_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move {
            let filter = doc! {"game_day_id": &day};
            store.find_pick_sets(filter, day).await.map_err(Into::into)
        })
    }

    fn find_evaluated_pick_sets_by_day(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move {
            let filter = doc! {"game_day_id": &day, "evaluated": true};
            store.find_pick_sets(filter, day).await.map_err(Into::into)
        })
    }

    fn find_evaluated_pick_sets_by_season(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<PickSetEntity>>> {
        let store = self.clone();
        let season = season.to_owned();
        Box::pin(async move {
            store
                .find_evaluated_pick_sets_by_season(season)
                .await
                .map_err(Into::into)
        })
    }

    fn save_day_results(
        &self,
        results: DayResultsEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_day_results(results).await.map_err(Into::into) })
    }

    fn find_day_results(
        &self,
        day: &str,
    ) -> BoxFuture<'static, StorageResult<Option<DayResultsEntity>>> {
        let store = self.clone();
        let day = day.to_owned();
        Box::pin(async move { store.find_day_results(day).await.map_err(Into::into) })
    }

    fn save_leaderboard(
        &self,
        board: LeaderboardEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.save_leaderboard(board).await.map_err(Into::into) })
    }

    fn find_leaderboard(
        &self,
        season: &str,
    ) -> BoxFuture<'static, StorageResult<Option<LeaderboardEntity>>> {
        let store = self.clone();
        let season = season.to_owned();
        Box::pin(async move { store.find_leaderboard(season).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.ping().await.map_err(Into::into) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.inner.reconnect().await.map_err(Into::into) })
    }
}

//! Derived rankings: per-day results and the season leaderboard.
//!
//! Both aggregations are full recomputations over evaluated pick sets and
//! replace their stored document wholesale. That keeps repeated or
//! out-of-order evaluation triggers harmless: running an aggregation twice
//! yields byte-identical output, and nothing is ever double-counted.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use tracing::info;

use crate::{
    dao::{
        models::{DayResultsEntity, LeaderboardEntity, UserScore},
        pick_store::PickStore,
    },
    error::ServiceError,
    state::SharedState,
};

/// Ranking order: score descending, ties broken by ascending user id so the
/// output is stable.
fn ranking_order(a: &UserScore, b: &UserScore) -> Ordering {
    b.score.cmp(&a.score).then(a.user_id.cmp(&b.user_id))
}

/// Collapse a day's evaluated pick sets into its ranked result list.
pub async fn build_day_results(
    store: &Arc<dyn PickStore>,
    day: &str,
) -> Result<DayResultsEntity, ServiceError> {
    let pick_sets = store.find_evaluated_pick_sets_by_day(day).await?;

    let mut scores: Vec<UserScore> = pick_sets
        .into_iter()
        .map(|set| UserScore {
            user_id: set.user_id,
            score: set.score,
        })
        .collect();
    scores.sort_by(ranking_order);

    let results = DayResultsEntity {
        id: day.to_owned(),
        scores,
    };
    store.save_day_results(results.clone()).await?;
    info!(day, users = results.scores.len(), "aggregated day results");
    Ok(results)
}

/// Recompute a season's cumulative standings from every evaluated pick set.
///
/// Deliberately a whole-season scan rather than an incremental merge: the
/// cost is one indexed query, and the result stays correct no matter how
/// many times or in what order evaluation passes run.
pub async fn build_leaderboard(
    store: &Arc<dyn PickStore>,
    season: &str,
) -> Result<LeaderboardEntity, ServiceError> {
    let pick_sets = store.find_evaluated_pick_sets_by_season(season).await?;

    let mut totals: HashMap<i64, i64> = HashMap::new();
    for set in pick_sets {
        *totals.entry(set.user_id).or_insert(0) += set.score;
    }

    let mut standings: Vec<UserScore> = totals
        .into_iter()
        .map(|(user_id, score)| UserScore { user_id, score })
        .collect();
    standings.sort_by(ranking_order);

    let board = LeaderboardEntity {
        id: season.to_owned(),
        standings,
    };
    store.save_leaderboard(board.clone()).await?;
    info!(
        season,
        users = board.standings.len(),
        "aggregated leaderboard"
    );
    Ok(board)
}

/// Fetch the stored results for a day.
pub async fn get_day_results(
    state: &SharedState,
    day: &str,
) -> Result<DayResultsEntity, ServiceError> {
    let store = state.require_pick_store().await?;
    store
        .find_day_results(day)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("could not find game day for date {day}")))
}

/// Fetch the stored leaderboard for a season.
pub async fn get_leaderboard(
    state: &SharedState,
    season: &str,
) -> Result<LeaderboardEntity, ServiceError> {
    let store = state.require_pick_store().await?;
    store.find_leaderboard(season).await?.ok_or_else(|| {
        ServiceError::NotFound(format!("could not find leaderboard for season {season}"))
    })
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use time::macros::datetime;
    use uuid::Uuid;

    use super::*;
    use crate::{dao::models::PickSetEntity, services::testing};

    fn evaluated_set(user_id: i64, day: &str, score: i64) -> PickSetEntity {
        PickSetEntity {
            id: Uuid::new_v4(),
            user_id,
            season_id: "2019".to_owned(),
            game_day_id: day.to_owned(),
            picks: IndexMap::new(),
            evaluated: true,
            score,
            submitted_at: datetime!(2020-01-18 12:00 UTC),
        }
    }

    #[tokio::test]
    async fn day_results_rank_users_by_score() {
        let harness = testing::TestHarness::at(datetime!(2020-01-19 09:00 UTC));
        let store: Arc<dyn PickStore> = Arc::new(harness.store.clone());

        for set in [
            evaluated_set(12345, "2020-01-18", 7),
            evaluated_set(67890, "2020-01-18", 9),
            evaluated_set(13579, "2020-01-18", 4),
        ] {
            store.save_pick_set(set).await.unwrap();
        }

        // An unevaluated set must not appear in the ranking.
        let mut pending = evaluated_set(99999, "2020-01-18", 0);
        pending.evaluated = false;
        store.save_pick_set(pending).await.unwrap();

        let results = build_day_results(&store, "2020-01-18").await.unwrap();
        assert_eq!(results.id, "2020-01-18");
        assert_eq!(results.scores.len(), 3);
        assert_eq!(results.scores[0].user_id, 67890);
        assert_eq!(results.scores[0].score, 9);
        assert_eq!(results.scores[1].user_id, 12345);
        assert_eq!(results.scores[2].user_id, 13579);
    }

    #[tokio::test]
    async fn tied_scores_order_by_user_id() {
        let harness = testing::TestHarness::at(datetime!(2020-01-19 09:00 UTC));
        let store: Arc<dyn PickStore> = Arc::new(harness.store.clone());

        for set in [
            evaluated_set(222, "2020-01-18", 5),
            evaluated_set(111, "2020-01-18", 5),
            evaluated_set(333, "2020-01-18", 5),
        ] {
            store.save_pick_set(set).await.unwrap();
        }

        let results = build_day_results(&store, "2020-01-18").await.unwrap();
        let users: Vec<i64> = results.scores.iter().map(|row| row.user_id).collect();
        assert_eq!(users, vec![111, 222, 333]);
    }

    #[tokio::test]
    async fn leaderboard_sums_scores_across_the_season() {
        let harness = testing::TestHarness::at(datetime!(2020-01-21 09:00 UTC));
        let store: Arc<dyn PickStore> = Arc::new(harness.store.clone());

        // 12345: 7 + 9 + 4 = 20; 67890: 4 + 7 = 11.
        for set in [
            evaluated_set(12345, "2020-01-18", 7),
            evaluated_set(12345, "2020-01-19", 9),
            evaluated_set(12345, "2020-01-20", 4),
            evaluated_set(67890, "2020-01-18", 4),
            evaluated_set(67890, "2020-01-19", 7),
        ] {
            store.save_pick_set(set).await.unwrap();
        }

        let board = build_leaderboard(&store, "2019").await.unwrap();
        assert_eq!(board.id, "2019");
        assert_eq!(board.standings.len(), 2);
        assert_eq!(board.standings[0].user_id, 12345);
        assert_eq!(board.standings[0].score, 20);
        assert_eq!(board.standings[1].user_id, 67890);
        assert_eq!(board.standings[1].score, 11);
    }

    #[tokio::test]
    async fn rebuilding_the_leaderboard_changes_nothing() {
        let harness = testing::TestHarness::at(datetime!(2020-01-21 09:00 UTC));
        let store: Arc<dyn PickStore> = Arc::new(harness.store.clone());

        for set in [
            evaluated_set(12345, "2020-01-18", 7),
            evaluated_set(67890, "2020-01-18", 4),
        ] {
            store.save_pick_set(set).await.unwrap();
        }

        let first = build_leaderboard(&store, "2019").await.unwrap();
        let second = build_leaderboard(&store, "2019").await.unwrap();
        assert_eq!(first, second);

        let stored = store.find_leaderboard("2019").await.unwrap().unwrap();
        assert_eq!(stored, second);
    }

    #[tokio::test]
    async fn other_seasons_do_not_leak_into_the_scan() {
        let harness = testing::TestHarness::at(datetime!(2020-01-21 09:00 UTC));
        let store: Arc<dyn PickStore> = Arc::new(harness.store.clone());

        store
            .save_pick_set(evaluated_set(12345, "2020-01-18", 7))
            .await
            .unwrap();
        let mut other_season = evaluated_set(12345, "2020-11-01", 9);
        other_season.season_id = "2020".to_owned();
        store.save_pick_set(other_season).await.unwrap();

        let board = build_leaderboard(&store, "2019").await.unwrap();
        assert_eq!(board.standings.len(), 1);
        assert_eq!(board.standings[0].score, 7);
    }

    #[tokio::test]
    async fn missing_derived_documents_are_not_found() {
        let harness = testing::TestHarness::at(datetime!(2020-01-19 09:00 UTC));
        let err = get_day_results(&harness.state, "2020-01-18")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err = get_leaderboard(&harness.state, "2019").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(
            err.to_string(),
            "could not find leaderboard for season 2019"
        );
    }
}

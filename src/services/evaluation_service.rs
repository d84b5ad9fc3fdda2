//! The game-day evaluation pipeline.
//!
//! A day moves through three states: no report yet, report built but
//! unevaluated, and evaluated. Evaluation reloads the day's games, writes
//! final scores and winners into the report, flips its evaluated flag, scores
//! every outstanding pick set, and triggers the derived aggregations. Every
//! step is a full-replace write recomputed from fresh state, so the whole
//! pass can be re-run safely at any time; already-scored pick sets are
//! skipped rather than re-counted.

use std::sync::Arc;

use time::Duration;
use tracing::{error, info, warn};

use crate::{
    dao::{
        models::{DayReportEntity, PickStatus},
        pick_store::PickStore,
    },
    error::ServiceError,
    gameday,
    services::{poll_service, report_service, results_service},
    state::SharedState,
};

/// Evaluate one game day end to end.
///
/// With no report stored yet the day is still in the future: the report is
/// built from whatever games exist and nothing is scored. Aggregation
/// failures are logged but do not fail the evaluation itself; the next pass
/// recomputes them from scratch.
pub async fn evaluate_day(state: &SharedState, day: &str) -> Result<(), ServiceError> {
    let store = state.require_pick_store().await?;

    let Some(mut report) = store.find_day_report(day).await? else {
        report_service::create_day_report(&store, day).await?;
        info!(day, "no report to evaluate yet; created a fresh one");
        return Ok(());
    };

    refresh_report_from_games(&store, &mut report).await?;
    report.evaluated = true;
    store.save_day_report(report.clone()).await?;

    score_pick_sets(&store, &report).await?;
    info!(day, "evaluated game day");

    let season = state.config().provider.season.clone();
    if let Err(err) = results_service::build_day_results(&store, day).await {
        warn!(day, error = %err, "failed to aggregate day results");
    }
    if let Err(err) = results_service::build_leaderboard(&store, &season).await {
        warn!(%season, error = %err, "failed to aggregate leaderboard");
    }

    Ok(())
}

/// Overwrite the report's scores and winners from the freshly stored games.
async fn refresh_report_from_games(
    store: &Arc<dyn PickStore>,
    report: &mut DayReportEntity,
) -> Result<(), ServiceError> {
    let games = store.find_games_by_day(&report.id).await?;

    for game in games {
        let winner_id = game
            .status
            .is_finished()
            .then(|| poll_service::winner_of(&game.home_team, &game.away_team));

        match report.games.get_mut(&game.id) {
            Some(entry) => {
                entry.home_team.score = game.home_team.score;
                entry.away_team.score = game.away_team.score;
                entry.winner_id = winner_id;
            }
            None => {
                // Scheduled after the report was built; fold it in whole.
                report
                    .games
                    .insert(game.id, report_service::project_game(game));
            }
        }
    }

    Ok(())
}

/// Score every not-yet-evaluated pick set of the report's day.
///
/// One full-replace write per pick set; a crash mid-loop leaves the remainder
/// unevaluated, and the next pass picks them up because evaluated sets are
/// skipped here.
async fn score_pick_sets(
    store: &Arc<dyn PickStore>,
    report: &DayReportEntity,
) -> Result<(), ServiceError> {
    let pick_sets = store.find_pick_sets_by_day(&report.id).await?;

    for mut pick_set in pick_sets {
        if pick_set.evaluated {
            continue;
        }

        let mut score = 0;
        for (game_id, pick) in pick_set.picks.iter_mut() {
            let winner_id = report.games.get(game_id).and_then(|game| game.winner_id);
            // An unselected pick never matches, even while a winner is unset.
            let correct = matches!(
                (pick.selection_id, winner_id),
                (Some(selection), Some(winner)) if selection == winner
            );

            pick.status = if correct {
                score += 1;
                PickStatus::Correct
            } else {
                PickStatus::Incorrect
            };
        }

        pick_set.score = score;
        pick_set.evaluated = true;
        store.save_pick_set(pick_set).await?;
    }

    Ok(())
}

/// The once-daily pipeline: poll the dates around now, settle yesterday,
/// and stage today's slate.
///
/// Each day is an independent unit of failure; an error on one is logged and
/// the remaining steps still run.
pub async fn run_daily(state: &SharedState) {
    let now = state.clock().now();
    let today = gameday::format_day(now.date());
    let yesterday = gameday::format_day(now.date() - Duration::days(1));
    let tomorrow = gameday::format_day(now.date() + Duration::days(1));

    info!(%yesterday, %today, %tomorrow, "running daily game pipeline");

    // One game night straddles UTC midnight, so all three dates are fetched.
    for date in [&yesterday, &today, &tomorrow] {
        if let Err(err) = poll_service::poll_game_day(state, date).await {
            error!(%date, error = %err, "daily poll failed for date");
        }
    }

    if let Err(err) = evaluate_day(state, &yesterday).await {
        error!(day = %yesterday, error = %err, "daily evaluation failed");
    }

    if let Err(err) = report_service::ensure_day_report(state, &today).await {
        error!(day = %today, error = %err, "failed to stage today's report");
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use time::macros::datetime;

    use super::*;
    use crate::{
        dao::pick_store::PickStore,
        dto::picks::SubmitPicksRequest,
        services::{pick_service, testing},
    };

    async fn polled_harness() -> testing::TestHarness {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        harness.load_scheduled_slate();
        for date in ["2020-01-17", "2020-01-18", "2020-01-19"] {
            poll_service::poll_game_day(&harness.state, date)
                .await
                .unwrap();
        }
        report_service::ensure_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap();
        harness
    }

    fn all_home_picks() -> IndexMap<i64, i64> {
        (7015..=7025)
            .map(|game_id| (game_id, testing::slate_teams(game_id).0))
            .collect()
    }

    async fn submit_home_picks(harness: &testing::TestHarness) {
        pick_service::submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks: all_home_picks(),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn evaluation_scores_the_report_and_picks() {
        let harness = polled_harness().await;
        submit_home_picks(&harness).await;

        // The next morning the provider reports finals; re-poll and evaluate.
        harness.load_finished_slate();
        for date in ["2020-01-18", "2020-01-19"] {
            poll_service::poll_game_day(&harness.state, date)
                .await
                .unwrap();
        }
        evaluate_day(&harness.state, "2020-01-18").await.unwrap();

        let report = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        assert!(report.evaluated);
        for (game_id, game) in &report.games {
            assert_ne!(game.home_team.score, 0);
            assert_ne!(game.away_team.score, 0);
            let expected = if testing::home_wins(*game_id) {
                game.home_team.id
            } else {
                game.away_team.id
            };
            assert_eq!(game.winner_id, Some(expected));
        }

        // Home picks across the slate: seven of eleven homes won.
        let sets = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        assert_eq!(sets.len(), 1);
        let set = &sets[0];
        assert!(set.evaluated);
        assert_eq!(set.score, 7);
        let correct = set
            .picks
            .values()
            .filter(|pick| pick.status == PickStatus::Correct)
            .count();
        assert_eq!(correct, 7);
    }

    #[tokio::test]
    async fn evaluation_is_idempotent() {
        let harness = polled_harness().await;
        submit_home_picks(&harness).await;

        harness.load_finished_slate();
        for date in ["2020-01-18", "2020-01-19"] {
            poll_service::poll_game_day(&harness.state, date)
                .await
                .unwrap();
        }

        evaluate_day(&harness.state, "2020-01-18").await.unwrap();
        let report_first = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        let sets_first = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        let results_first = harness
            .store
            .find_day_results("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        let board_first = harness
            .store
            .find_leaderboard("2019")
            .await
            .unwrap()
            .unwrap();

        evaluate_day(&harness.state, "2020-01-18").await.unwrap();
        let report_second = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        let sets_second = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        let results_second = harness
            .store
            .find_day_results("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        let board_second = harness
            .store
            .find_leaderboard("2019")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(report_first, report_second);
        assert_eq!(sets_first, sets_second);
        assert_eq!(results_first, results_second);
        assert_eq!(board_first, board_second);
        // In particular the score did not double.
        assert_eq!(sets_second[0].score, 7);
    }

    #[tokio::test]
    async fn unselected_picks_never_score_even_without_a_winner() {
        let harness = polled_harness().await;

        // Submit only one real selection; the other ten stay unselected.
        let mut picks = IndexMap::new();
        picks.insert(7015, 23);
        pick_service::submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks,
            },
        )
        .await
        .unwrap();

        // Evaluate while every game is still scheduled: no winners anywhere.
        evaluate_day(&harness.state, "2020-01-18").await.unwrap();

        let sets = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        let set = &sets[0];
        assert!(set.evaluated);
        assert_eq!(set.score, 0);
        for pick in set.picks.values() {
            assert_eq!(pick.status, PickStatus::Incorrect);
        }
    }

    #[tokio::test]
    async fn evaluating_a_day_without_a_report_creates_the_scaffold() {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        harness.load_scheduled_slate();
        for date in ["2020-01-18", "2020-01-19"] {
            poll_service::poll_game_day(&harness.state, date)
                .await
                .unwrap();
        }

        evaluate_day(&harness.state, "2020-01-18").await.unwrap();

        // The report exists but nothing was scored or flagged evaluated.
        let report = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        assert!(!report.evaluated);
        assert_eq!(report.games.len(), 11);
    }

    #[tokio::test]
    async fn evaluating_an_empty_day_fails() {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        let err = evaluate_day(&harness.state, "2020-03-01")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn the_daily_pipeline_settles_yesterday_and_stages_today() {
        // 09:00 on the 19th: yesterday is the 18th's slate.
        let harness = testing::TestHarness::at(datetime!(2020-01-19 09:00 UTC));
        harness.load_scheduled_slate();
        for date in ["2020-01-17", "2020-01-18", "2020-01-19"] {
            poll_service::poll_game_day(&harness.state, date)
                .await
                .unwrap();
        }
        report_service::ensure_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap();

        // Users picked before the night's games; here, after them, but the
        // fixed clock keeps the deadline in the future from the 18th's noon.
        let picks_harness_clock = datetime!(2020-01-18 12:00 UTC);
        let report = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        let picks =
            pick_service::verify_picks(&report, &all_home_picks(), picks_harness_clock).unwrap();
        harness
            .store
            .save_pick_set(crate::dao::models::PickSetEntity {
                id: uuid::Uuid::new_v4(),
                user_id: 12345,
                season_id: "2019".to_owned(),
                game_day_id: "2020-01-18".to_owned(),
                picks,
                evaluated: false,
                score: 0,
                submitted_at: picks_harness_clock,
            })
            .await
            .unwrap();

        // Overnight the games finished.
        harness.load_finished_slate();

        run_daily(&harness.state).await;

        let report = harness
            .store
            .find_day_report("2020-01-18")
            .await
            .unwrap()
            .unwrap();
        assert!(report.evaluated);

        let sets = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        assert!(sets[0].evaluated);
        assert_eq!(sets[0].score, 7);

        // Today's slate (the 19th) was staged for the coming night.
        let today = harness
            .store
            .find_day_report("2020-01-19")
            .await
            .unwrap()
            .unwrap();
        assert!(!today.evaluated);
        assert_eq!(today.games.len(), 2);

        // Derived rankings were produced.
        assert!(
            harness
                .store
                .find_day_results("2020-01-18")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            harness
                .store
                .find_leaderboard("2019")
                .await
                .unwrap()
                .is_some()
        );
    }
}

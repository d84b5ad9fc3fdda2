//! Day report construction and retrieval.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use crate::{
    dao::{
        models::{DayReportEntity, GameEntity, GameReportEntity},
        pick_store::PickStore,
    },
    error::ServiceError,
    state::SharedState,
};

/// Build (or rebuild) the report for a day from its currently stored games
/// and persist it, replacing any previous version.
///
/// Pre-evaluation reports are pure derivations of the game set, so a rebuild
/// resets the report to match the latest poll. Fails when the day has no
/// stored games at all.
pub async fn create_day_report(
    store: &Arc<dyn PickStore>,
    day: &str,
) -> Result<DayReportEntity, ServiceError> {
    let games = store.find_games_by_day(day).await?;

    let Some(first) = games.first() else {
        return Err(ServiceError::InvalidInput(format!(
            "no games found for game day {day}"
        )));
    };

    // Games arrive start-time ascending, so the first one fixes the deadline
    // and the map keeps tip-off order.
    let deadline = first.start_date;
    let report_games: IndexMap<i64, GameReportEntity> = games
        .into_iter()
        .map(|game| (game.id, project_game(game)))
        .collect();

    let report = DayReportEntity {
        id: day.to_owned(),
        games: report_games,
        deadline,
        evaluated: false,
    };

    store.save_day_report(report.clone()).await?;
    info!(day, games = report.games.len(), "created game day report");
    Ok(report)
}

/// Project a stored game into its report entry.
pub(crate) fn project_game(game: GameEntity) -> GameReportEntity {
    GameReportEntity {
        home_team: game.home_team,
        away_team: game.away_team,
        venue: game.venue,
        date: game.start_date,
        winner_id: game.winner_id,
    }
}

/// Report builder entry point for callers holding only the shared state.
pub async fn ensure_day_report(
    state: &SharedState,
    day: &str,
) -> Result<DayReportEntity, ServiceError> {
    let store = state.require_pick_store().await?;
    create_day_report(&store, day).await
}

/// Fetch the stored report for a day.
pub async fn get_day_report(
    state: &SharedState,
    day: &str,
) -> Result<DayReportEntity, ServiceError> {
    let store = state.require_pick_store().await?;
    store
        .find_day_report(day)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("could not find game day for date {day}")))
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::services::{poll_service, testing};

    #[tokio::test]
    async fn builds_the_report_from_both_provider_dates() {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        harness.load_scheduled_slate();
        poll_service::poll_game_day(&harness.state, "2020-01-18")
            .await
            .unwrap();
        poll_service::poll_game_day(&harness.state, "2020-01-19")
            .await
            .unwrap();

        let report = ensure_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap();

        assert_eq!(report.id, "2020-01-18");
        assert_eq!(report.games.len(), 11);
        assert!(!report.evaluated);
        // Deadline is the earliest tip-off of the day.
        assert_eq!(report.deadline, datetime!(2020-01-18 20:30 UTC));
        // Insertion order follows start time.
        let first = report.games.keys().next().copied();
        assert_eq!(first, Some(7015));

        let stored = get_day_report(&harness.state, "2020-01-18").await.unwrap();
        assert_eq!(stored, report);
    }

    #[tokio::test]
    async fn refuses_to_build_an_empty_day() {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        let err = ensure_day_report(&harness.state, "2020-03-01")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert_eq!(
            err.to_string(),
            "no games found for game day 2020-03-01"
        );
    }

    #[tokio::test]
    async fn missing_reports_are_not_found() {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        let err = get_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}

//! Pick validation and submission.

use indexmap::IndexMap;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::{
        models::{DayReportEntity, PickEntity, PickSetEntity},
        pick_store::PickStore,
    },
    dto::picks::SubmitPicksRequest,
    error::ServiceError,
    state::SharedState,
};

// TODO: take the user from the session once authentication lands.
const PLACEHOLDER_USER_ID: i64 = 12345;

/// Validate a user's proposed picks against a day report.
///
/// The returned map has exactly one entry per game in the report: proposed
/// selections become pending picks, everything else an unselected
/// placeholder. Rejects picks past the deadline (submitting at the deadline
/// instant counts as missed), for games not on the slate, or for teams not
/// playing in the selected game.
pub fn verify_picks(
    report: &DayReportEntity,
    proposed: &IndexMap<i64, i64>,
    now: OffsetDateTime,
) -> Result<IndexMap<i64, PickEntity>, ServiceError> {
    if report.deadline <= now {
        let deadline = report
            .deadline
            .format(&Rfc3339)
            .unwrap_or_else(|_| report.deadline.to_string());
        return Err(ServiceError::InvalidInput(format!(
            "missed deadline: {deadline}"
        )));
    }

    let mut picks: IndexMap<i64, PickEntity> = report
        .games
        .keys()
        .map(|game_id| (*game_id, PickEntity::unselected()))
        .collect();

    for (game_id, team_id) in proposed {
        let Some(game) = report.games.get(game_id) else {
            return Err(ServiceError::InvalidInput(format!(
                "game with id {game_id} is not being played on this game day"
            )));
        };

        if game.home_team.id != *team_id && game.away_team.id != *team_id {
            return Err(ServiceError::InvalidInput(format!(
                "team {team_id} is not playing in game {game_id}"
            )));
        }

        picks.insert(*game_id, PickEntity::pending(*team_id));
    }

    Ok(picks)
}

/// Validate and store a pick submission, replacing any earlier set the user
/// submitted for the same day.
pub async fn submit_picks(
    state: &SharedState,
    request: SubmitPicksRequest,
) -> Result<PickSetEntity, ServiceError> {
    let store = state.require_pick_store().await?;

    let report = store
        .find_day_report(&request.game_day_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!(
                "could not find game day for date {}",
                request.game_day_id
            ))
        })?;

    let now = state.clock().now();
    let picks = verify_picks(&report, &request.picks, now)?;

    let pick_set = PickSetEntity {
        id: Uuid::new_v4(),
        user_id: PLACEHOLDER_USER_ID,
        season_id: state.config().provider.season.clone(),
        game_day_id: request.game_day_id,
        picks,
        evaluated: false,
        score: 0,
        submitted_at: now,
    };

    store.save_pick_set(pick_set.clone()).await?;
    info!(
        user_id = pick_set.user_id,
        day = %pick_set.game_day_id,
        selections = request.picks.len(),
        "stored pick set"
    );
    Ok(pick_set)
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::{
        dao::{models::PickStatus, pick_store::PickStore},
        services::{poll_service, report_service, testing},
    };

    async fn harness_with_report() -> testing::TestHarness {
        let harness = testing::TestHarness::at(datetime!(2020-01-18 12:00 UTC));
        harness.load_scheduled_slate();
        poll_service::poll_game_day(&harness.state, "2020-01-18")
            .await
            .unwrap();
        poll_service::poll_game_day(&harness.state, "2020-01-19")
            .await
            .unwrap();
        report_service::ensure_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap();
        harness
    }

    fn full_picks() -> IndexMap<i64, i64> {
        // Home team of every game on the 18th's slate.
        (7015..=7025)
            .map(|game_id| (game_id, testing::slate_teams(game_id).0))
            .collect()
    }

    #[tokio::test]
    async fn a_full_submission_stores_eleven_pending_picks() {
        let harness = harness_with_report().await;

        let stored = submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks: full_picks(),
            },
        )
        .await
        .unwrap();

        assert_eq!(stored.user_id, 12345);
        assert_eq!(stored.game_day_id, "2020-01-18");
        assert_eq!(stored.picks.len(), 11);
        assert!(!stored.evaluated);
        assert_eq!(stored.score, 0);
        for pick in stored.picks.values() {
            assert!(pick.selection_id.is_some());
            assert_eq!(pick.status, PickStatus::Pending);
        }

        let sets = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].picks.len(), 11);
    }

    #[tokio::test]
    async fn partial_submissions_are_completed_with_unselected_picks() {
        let harness = harness_with_report().await;

        let mut picks = IndexMap::new();
        picks.insert(7015, 23);
        let stored = submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks,
            },
        )
        .await
        .unwrap();

        // One entry per slate game regardless of how few were selected.
        assert_eq!(stored.picks.len(), 11);
        assert_eq!(stored.picks[&7015].selection_id, Some(23));
        let unselected = stored
            .picks
            .values()
            .filter(|pick| pick.selection_id.is_none())
            .count();
        assert_eq!(unselected, 10);
    }

    #[tokio::test]
    async fn picks_for_an_unknown_game_are_rejected() {
        let harness = harness_with_report().await;

        let mut picks = IndexMap::new();
        picks.insert(12345, 23);
        let err = submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "game with id 12345 is not being played on this game day"
        );
    }

    #[tokio::test]
    async fn picks_for_a_team_not_in_the_game_are_rejected() {
        let harness = harness_with_report().await;

        let mut picks = IndexMap::new();
        picks.insert(7015, 999);
        let err = submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "team 999 is not playing in game 7015");
    }

    #[tokio::test]
    async fn submitting_at_the_deadline_instant_misses_it() {
        let harness = harness_with_report().await;
        let report = report_service::get_day_report(&harness.state, "2020-01-18")
            .await
            .unwrap();

        // Exactly at the deadline: already too late.
        let err = verify_picks(&report, &full_picks(), datetime!(2020-01-18 20:30 UTC))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "missed deadline: 2020-01-18T20:30:00Z"
        );

        // One second earlier is still accepted.
        let picks = verify_picks(
            &report,
            &full_picks(),
            datetime!(2020-01-18 20:29:59 UTC),
        )
        .unwrap();
        assert_eq!(picks.len(), 11);
    }

    #[tokio::test]
    async fn submissions_for_unknown_days_are_not_found() {
        let harness = harness_with_report().await;
        let err = submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-02-01".to_owned(),
                picks: IndexMap::new(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn resubmission_replaces_the_previous_set() {
        let harness = harness_with_report().await;

        submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks: full_picks(),
            },
        )
        .await
        .unwrap();

        // Second submission flips one selection to the away side.
        let mut picks = full_picks();
        picks.insert(7015, 16);
        submit_picks(
            &harness.state,
            SubmitPicksRequest {
                game_day_id: "2020-01-18".to_owned(),
                picks,
            },
        )
        .await
        .unwrap();

        let sets = harness
            .store
            .find_pick_sets_by_day("2020-01-18")
            .await
            .unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].picks[&7015].selection_id, Some(16));
    }
}

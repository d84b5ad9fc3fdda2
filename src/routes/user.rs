//! User-facing routes: the day's slate, pick submission, and rankings.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use axum_valid::Valid;
use time::Duration;

use crate::{
    dto::{
        common::ApiEnvelope,
        picks::{PickSetDto, SubmitPicksRequest},
        report::{DayQuery, DayReportDto},
        results::{DayResultsDto, LeaderboardDto, LeaderboardQuery, ResultsQuery},
    },
    error::AppError,
    gameday,
    services::{pick_service, report_service, results_service},
    state::SharedState,
};

/// Routes under `/v1/user`.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/v1/user/games", get(get_day_report))
        .route("/v1/user/results", get(get_day_results))
        .route("/v1/user/leaderboards", get(get_leaderboard))
        .route("/v1/user/picks", post(submit_picks))
}

/// Validate an explicit `date` query parameter, or fall back to a default.
fn resolve_day(date: Option<String>, default: impl FnOnce() -> String) -> Result<String, AppError> {
    match date {
        Some(day) => {
            gameday::parse_day(&day)
                .map_err(|_| AppError::BadRequest(format!("invalid date `{day}`")))?;
            Ok(day)
        }
        None => Ok(default()),
    }
}

/// Fetch the day report for a date (default: the current game day).
#[utoipa::path(
    get,
    path = "/v1/user/games",
    tag = "user",
    params(DayQuery),
    responses(
        (status = 200, description = "Day report", body = DayReportDto),
        (status = 404, description = "No report for the requested day")
    )
)]
pub async fn get_day_report(
    State(state): State<SharedState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<ApiEnvelope<DayReportDto>>, AppError> {
    let day = resolve_day(query.date, || {
        gameday::current_game_day(state.clock().now())
    })?;
    let report = report_service::get_day_report(&state, &day).await?;
    Ok(Json(ApiEnvelope::ok(report.into())))
}

/// Fetch the ranked results for a date (default: yesterday's game day).
#[utoipa::path(
    get,
    path = "/v1/user/results",
    tag = "user",
    params(ResultsQuery),
    responses(
        (status = 200, description = "Day results", body = DayResultsDto),
        (status = 404, description = "No results for the requested day")
    )
)]
pub async fn get_day_results(
    State(state): State<SharedState>,
    Query(query): Query<ResultsQuery>,
) -> Result<Json<ApiEnvelope<DayResultsDto>>, AppError> {
    let day = resolve_day(query.date, || {
        gameday::current_game_day(state.clock().now() - Duration::days(1))
    })?;
    let results = results_service::get_day_results(&state, &day).await?;
    Ok(Json(ApiEnvelope::ok(results.into())))
}

/// Fetch a season leaderboard (default: the configured season).
#[utoipa::path(
    get,
    path = "/v1/user/leaderboards",
    tag = "user",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Season leaderboard", body = LeaderboardDto),
        (status = 404, description = "No leaderboard for the requested season")
    )
)]
pub async fn get_leaderboard(
    State(state): State<SharedState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<ApiEnvelope<LeaderboardDto>>, AppError> {
    let season = query
        .season
        .unwrap_or_else(|| state.config().provider.season.clone());
    let board = results_service::get_leaderboard(&state, &season).await?;
    Ok(Json(ApiEnvelope::ok(board.into())))
}

/// Validate and store the caller's picks for a game day.
#[utoipa::path(
    post,
    path = "/v1/user/picks",
    tag = "user",
    request_body = SubmitPicksRequest,
    responses(
        (status = 200, description = "Picks stored", body = PickSetDto),
        (status = 400, description = "Deadline passed or invalid selection")
    )
)]
pub async fn submit_picks(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<SubmitPicksRequest>>,
) -> Result<Json<ApiEnvelope<PickSetDto>>, AppError> {
    let stored = pick_service::submit_picks(&state, payload).await?;
    Ok(Json(ApiEnvelope::ok(stored.into())))
}

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the pick-and-play backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::user::get_day_report,
        crate::routes::user::get_day_results,
        crate::routes::user::get_leaderboard,
        crate::routes::user::submit_picks,
        crate::routes::admin::force_evaluation,
        crate::routes::admin::force_poll,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::report::DayReportDto,
            crate::dto::report::GameReportDto,
            crate::dto::report::TeamDto,
            crate::dto::report::VenueDto,
            crate::dto::results::DayResultsDto,
            crate::dto::results::LeaderboardDto,
            crate::dto::results::UserScoreDto,
            crate::dto::picks::SubmitPicksRequest,
            crate::dto::picks::PickSetDto,
            crate::dto::picks::PickDto,
            crate::dto::admin::EvaluateRequest,
            crate::dto::admin::PollRequest,
            crate::dto::admin::ActionResponse,
            crate::dao::models::PickStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "user", description = "Game day reports, picks, results, and leaderboards"),
        (name = "admin", description = "Forced polling and evaluation"),
    )
)]
pub struct ApiDoc;

//! Admin-only force endpoints.
//!
//! These bypass the scheduler: re-fetch a date from the provider or force the
//! evaluation pipeline for an arbitrary day. Unlike the user routes they
//! return raw error reasons, since their caller is the operator debugging the
//! pipeline.

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::{
        admin::{ActionResponse, EvaluateRequest, PollRequest},
        common::ApiEnvelope,
    },
    error::AppError,
    services::{evaluation_service, poll_service},
    state::SharedState,
};

const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Routes under `/v1/admin`, guarded by the admin token middleware.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/v1/admin/evaluate", post(force_evaluation))
        .route("/v1/admin/poll", post(force_poll))
        .route_layer(middleware::from_fn_with_state(state, require_admin_token))
}

/// Reject requests whose `x-admin-token` header does not match the configured
/// token. Deployments without a configured token skip the check.
async fn require_admin_token(
    State(state): State<SharedState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config().admin_token.as_deref() {
        let presented = request
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if presented != Some(expected) {
            return Err(AppError::Unauthorized("invalid admin token".into()));
        }
    }
    Ok(next.run(request).await)
}

/// Force the evaluation pipeline for an arbitrary game day.
#[utoipa::path(
    post,
    path = "/v1/admin/evaluate",
    tag = "admin",
    request_body = EvaluateRequest,
    params(("x-admin-token" = String, Header, description = "Admin token")),
    responses(
        (status = 200, description = "Day evaluated", body = ActionResponse),
        (status = 400, description = "Evaluation failed; raw reason in the body")
    )
)]
pub async fn force_evaluation(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<EvaluateRequest>>,
) -> Result<Json<ApiEnvelope<ActionResponse>>, AppError> {
    evaluation_service::evaluate_day(&state, &payload.date)
        .await
        .map_err(AppError::raw)?;
    Ok(Json(ApiEnvelope::ok(ActionResponse { date: payload.date })))
}

/// Force a provider re-fetch for an arbitrary schedule date.
#[utoipa::path(
    post,
    path = "/v1/admin/poll",
    tag = "admin",
    request_body = PollRequest,
    params(("x-admin-token" = String, Header, description = "Admin token")),
    responses(
        (status = 200, description = "Date polled", body = ActionResponse),
        (status = 400, description = "Poll failed; raw reason in the body")
    )
)]
pub async fn force_poll(
    State(state): State<SharedState>,
    Valid(Json(payload)): Valid<Json<PollRequest>>,
) -> Result<Json<ApiEnvelope<ActionResponse>>, AppError> {
    poll_service::poll_game_day(&state, &payload.date)
        .await
        .map_err(AppError::raw)?;
    Ok(Json(ApiEnvelope::ok(ActionResponse { date: payload.date })))
}

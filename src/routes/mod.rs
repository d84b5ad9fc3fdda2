use axum::Router;

use crate::state::SharedState;

/// Admin-only force endpoints.
pub mod admin;
/// Swagger UI and OpenAPI document.
pub mod docs;
/// Health check route.
pub mod health;
/// User-facing game, pick, and ranking routes.
pub mod user;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(user::router())
        .merge(admin::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

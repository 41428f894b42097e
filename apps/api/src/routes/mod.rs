pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::care::handlers as care;
use crate::catalog::handlers as catalog;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Plant dataset
        .route("/api/v1/plants/search", get(catalog::handle_search))
        .route(
            "/api/v1/plants/search/status",
            get(catalog::handle_search_status),
        )
        .route("/api/v1/plants/:id", get(catalog::handle_get_record))
        // Care guides
        .route("/api/v1/guides/resolve", get(catalog::handle_resolve_guide))
        .route("/api/v1/guides/sources", get(catalog::handle_list_sources))
        .route(
            "/api/v1/guides/providers",
            get(catalog::handle_list_providers),
        )
        .route(
            "/api/v1/guides/providers/:id",
            get(catalog::handle_get_provider),
        )
        // Care scheduling
        .route("/api/v1/care/next", post(care::handle_next_care))
        .route("/api/v1/care/logs", post(care::handle_prepare_care_log))
        // Idle sessions
        .route("/api/v1/sessions", post(session::handle_start_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_session_status).delete(session::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:id/activity",
            post(session::handle_activity),
        )
        .route(
            "/api/v1/sessions/:id/visibility",
            post(session::handle_visibility),
        )
        .route("/api/v1/sessions/:id/confirm", post(session::handle_confirm))
        .route("/api/v1/sessions/:id/decline", post(session::handle_decline))
        .with_state(state)
}

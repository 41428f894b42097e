use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;

use crate::catalog::sources::{find_provider, GuideProvider, GUIDE_PROVIDERS};
use crate::errors::AppError;
use crate::state::AppState;

/// Hard ceiling on `limit`, whatever the caller asks for.
const MAX_SEARCH_LIMIT: usize = 200;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub name: Option<String>,
    pub species: Option<String>,
}

/// GET /api/v1/plants/search
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let limit = params
        .limit
        .unwrap_or(state.config.search_limit)
        .min(MAX_SEARCH_LIMIT);
    let hits = state.catalog.search(&params.q, limit);
    tracing::debug!("search q={:?} limit={limit} hits={}", params.q, hits.len());
    Json(&hits).into_response()
}

/// GET /api/v1/plants/search/status
pub async fn handle_search_status(State(state): State<AppState>) -> Response {
    Json(state.catalog.status()).into_response()
}

/// GET /api/v1/plants/:id
pub async fn handle_get_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let record = state
        .catalog
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Plant record '{id}' not found")))?;
    Ok(Json(record).into_response())
}

/// GET /api/v1/guides/resolve
pub async fn handle_resolve_guide(
    State(state): State<AppState>,
    Query(params): Query<ResolveQuery>,
) -> Response {
    let resolution = state
        .catalog
        .resolve_guide(params.name.as_deref(), params.species.as_deref());
    Json(&resolution).into_response()
}

/// GET /api/v1/guides/sources
pub async fn handle_list_sources(State(state): State<AppState>) -> Response {
    let sources = state.catalog.all_sources();
    Json(sources).into_response()
}

/// GET /api/v1/guides/providers
pub async fn handle_list_providers() -> Json<&'static [GuideProvider]> {
    Json(GUIDE_PROVIDERS)
}

/// GET /api/v1/guides/providers/:id
pub async fn handle_get_provider(
    Path(id): Path<String>,
) -> Result<Json<&'static GuideProvider>, AppError> {
    find_provider(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Guide provider '{id}' not found")))
}

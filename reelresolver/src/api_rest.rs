//! Endpoints API REST pour la recherche
//!
//! Ce module définit le handler HTTP de `GET /api/search` et son router.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::error::Error;
use crate::models::SearchResponse;
use crate::reelserver_ext::ResolverState;

// ============ Gestion des erreurs ============

pub(crate) struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.1
        }));
        (self.0, body).into_response()
    }
}

impl From<Error> for AppError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::NegotiationTimeout => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self(status, err.to_string())
    }
}

impl AppError {
    pub(crate) fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }
}

/// Crée le router pour l'API de recherche
pub fn create_router(state: ResolverState) -> Router {
    Router::new()
        .route("/search", get(search))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: Option<String>,
}

/// GET /api/search?q=<text>
/// Runs a (possibly cached) backend search and returns the candidate list
async fn search(
    State(state): State<ResolverState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let query = params.q.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(AppError::bad_request("missing query parameter 'q'"));
    }

    let results = state.resolver.search(&query).await?;
    Ok(Json(SearchResponse {
        query: query.trim().to_string(),
        total: results.len(),
        results,
        success: true,
    }))
}

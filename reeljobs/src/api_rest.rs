//! Endpoints API REST pour les jobs
//!
//! Ce module définit les handlers de `POST /api/stream`,
//! `GET /api/job/{job_id}` et `DELETE /api/cache`.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;
use tracing::info;

use crate::config_ext::JobsConfigExt;
use crate::models::Job;
use crate::reelserver_ext::JobsState;
use crate::worker::spawn_worker;

// ============ Gestion des erreurs ============

struct AppError(StatusCode, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({
            "error": self.1
        }));
        (self.0, body).into_response()
    }
}

impl AppError {
    fn bad_request(msg: impl Into<String>) -> Self {
        Self(StatusCode::BAD_REQUEST, msg.into())
    }

    fn not_found(msg: impl Into<String>) -> Self {
        Self(StatusCode::NOT_FOUND, msg.into())
    }
}

/// Crée le router pour l'API des jobs
pub fn create_router(state: JobsState) -> Router {
    Router::new()
        .route("/stream", post(create_stream_job))
        .route("/job/{job_id}", get(get_job))
        .route("/cache", delete(clear_cache))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct StreamRequest {
    item_id: String,
    #[serde(default)]
    option_index: usize,
}

/// POST /api/stream
/// Registers a resolution job and returns immediately
async fn create_stream_job(
    State(state): State<JobsState>,
    Json(req): Json<StreamRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.item_id.trim().is_empty() {
        return Err(AppError::bad_request("missing item_id"));
    }

    let job_id = state.registry.create(&req.item_id, req.option_index).await;
    info!("created job {} for {}", job_id, req.item_id);

    spawn_worker(
        state.registry.clone(),
        state.resolver.clone(),
        job_id.clone(),
    );

    Ok(Json(serde_json::json!({
        "job_id": job_id,
        "status": "pending",
        "message": "Resolution started, poll /api/job/{job_id}"
    })))
}

/// GET /api/job/{job_id}
/// Returns the current snapshot of a job
async fn get_job(
    State(state): State<JobsState>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, AppError> {
    match state.registry.get(&job_id).await {
        Some(job) => Ok(Json(job)),
        None => Err(AppError::not_found(format!("job not found: {}", job_id))),
    }
}

/// DELETE /api/cache
/// Clears the search cache and sweeps out old jobs
async fn clear_cache(
    State(state): State<JobsState>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.resolver.clear_cache();

    let max_age = reelconfig::get_config()
        .get_jobs_cleanup_max_age_secs()
        .unwrap_or(crate::config_ext::DEFAULT_CLEANUP_MAX_AGE_SECS);
    let removed = state.registry.cleanup(max_age).await;

    info!("cache cleared, {} job(s) removed", removed);
    Ok(Json(serde_json::json!({
        "success": true,
        "removed_jobs": removed
    })))
}

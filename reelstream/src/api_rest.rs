//! Endpoint REST de streaming
//!
//! Ce module définit le handler de `GET /media/{source_ref}?size=<bytes>`
//! avec la sémantique partial-content complète (200/206/416).

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use futures::TryStreamExt;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::RangeError;
use crate::proxy::stream_range;
use crate::range::parse_range;
use crate::reelserver_ext::StreamState;

#[derive(Debug, Deserialize)]
struct MediaParams {
    #[serde(default)]
    size: Option<u64>,
}

/// Crée le router pour le streaming
pub fn create_router(state: StreamState) -> Router {
    Router::new()
        .route("/{source_ref}", get(stream_media))
        .with_state(state)
}

/// GET /media/{source_ref}?size=<bytes>
async fn stream_media(
    State(state): State<StreamState>,
    Path(source_ref): Path<String>,
    Query(params): Query<MediaParams>,
    headers: axum::http::HeaderMap,
) -> Response {
    let total_size = match params.size {
        Some(s) if s > 0 => s,
        _ => {
            let body = Json(serde_json::json!({
                "error": "missing or zero 'size' parameter"
            }));
            return (StatusCode::BAD_REQUEST, body).into_response();
        }
    };

    let range_header = headers
        .get(header::RANGE)
        .and_then(|v| v.to_str().ok());

    let (start, end, partial) = match range_header {
        None => (0, total_size - 1, false),
        Some(raw) => match parse_range(raw, total_size) {
            Ok((start, end)) => (start, end, true),
            Err(RangeError::InvalidSyntax) => {
                warn!("malformed Range header: {:?}", raw);
                let body = Json(serde_json::json!({
                    "error": format!("malformed Range header: {}", raw)
                }));
                return (StatusCode::RANGE_NOT_SATISFIABLE, body).into_response();
            }
            Err(RangeError::Unsatisfiable { total }) => {
                return Response::builder()
                    .status(StatusCode::RANGE_NOT_SATISFIABLE)
                    .header(header::CONTENT_RANGE, format!("bytes */{}", total))
                    .body(Body::empty())
                    .unwrap_or_else(|_| StatusCode::RANGE_NOT_SATISFIABLE.into_response());
            }
        },
    };

    debug!(
        "streaming {} bytes {}-{} of {}",
        source_ref, start, end, total_size
    );

    let stream = match stream_range(state.source.clone(), &source_ref, start, end).await {
        Ok(s) => s,
        Err(e) => {
            let body = Json(serde_json::json!({
                "error": format!("failed to open source: {}", e)
            }));
            return (StatusCode::BAD_GATEWAY, body).into_response();
        }
    };

    let body = Body::from_stream(
        stream.map_err(|e| std::io::Error::other(e.to_string())),
    );

    let mut builder = Response::builder()
        .status(if partial {
            StatusCode::PARTIAL_CONTENT
        } else {
            StatusCode::OK
        })
        .header(header::CONTENT_TYPE, "video/mp4")
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_LENGTH, end - start + 1);

    if partial {
        builder = builder.header(
            header::CONTENT_RANGE,
            format!("bytes {}-{}/{}", start, end, total_size),
        );
    }

    builder
        .body(body)
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

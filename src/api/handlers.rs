use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use super::AppState;
use super::models::{SearchRequest, SearchResponse};

/// Accepts any content type; clients posting `text/plain` skip the CORS
/// preflight.
pub async fn search_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = Instant::now();

    let request: SearchRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("invalid request body: {e}");
        (StatusCode::BAD_REQUEST, "Invalid request body".to_string())
    })?;

    if request.prompt.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Prompt cannot be empty".to_string()));
    }

    info!(prompt = %request.prompt, "received search request");

    let cancel = state.shutdown.child_token();
    let outcome = state
        .pipeline
        .handle(&request.prompt, &cancel)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error analyzing prompt: {}", e),
            )
        })?;

    let processing_time_ms = start.elapsed().as_millis();
    info!(%processing_time_ms, "search request done");

    Ok(Json(SearchResponse {
        search_url: outcome.search_url,
        intent: outcome.intent,
    }))
}

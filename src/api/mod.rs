use axum::http::{Method, header};
use axum::{Router, routing::post};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};

use crate::search::SearchPipeline;

pub mod handlers;
pub mod models;

pub struct AppState {
    pub pipeline: SearchPipeline,
    /// Cancelled on shutdown; each request extracts under a child token.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(pipeline: SearchPipeline, shutdown: CancellationToken) -> Self {
        Self { pipeline, shutdown }
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/search", post(handlers::search_handler))
        .with_state(state)
        .layer(cors)
}

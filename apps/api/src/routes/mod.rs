pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::docgen::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index_handler))
        .route("/health", get(health::health_handler))
        .route(
            "/generate-document",
            post(handlers::handle_generate_document),
        )
        .route(
            "/download/:request_id/:file_id",
            get(handlers::handle_download),
        )
        .with_state(state)
}

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router with all catalog endpoints.
///
/// `max_upload_size` bounds the request body, which for uploads is the sum
/// of every file in the multipart form.
pub fn build_router(state: AppState, max_upload_size: usize) -> Router {
    Router::new()
        .route("/", get(handler::home_handler))
        .route("/upload/", post(handler::upload_handler))
        .route("/files/", get(handler::list_handler))
        .route(
            "/files/:filename",
            get(handler::download_handler).delete(handler::delete_handler),
        )
        .route("/search/", get(handler::search_handler))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::record::store::RecordStore;

pub mod records;

pub use records::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: health probe plus the record CRUD
/// surface, with request tracing and CORS applied across the board.
pub fn build_router<S: RecordStore + 'static>(state: AppState<S>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/records",
            get(records::list::<S>).post(records::create::<S>),
        )
        .route(
            "/records/:id",
            get(records::get::<S>)
                .put(records::update::<S>)
                .delete(records::remove::<S>),
        )
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::WARN)),
        )
}

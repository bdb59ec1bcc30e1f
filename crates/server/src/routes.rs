use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

pub mod cart;

pub use cart::AppState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the application router: health plus the cart routes
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let cart_routes = Router::new()
        .route("/cart", get(cart::get_cart).delete(cart::clear_cart))
        .route(
            "/cart/items/:id",
            post(cart::add_item).put(cart::update_item).delete(cart::remove_item),
        );

    Router::new()
        .route("/health", get(health))
        .merge(cart_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                // status and latency
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

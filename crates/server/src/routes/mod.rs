pub mod health;
pub mod matches;

use axum::{routing::{get, post}, Extension, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::service::MatchService;

pub fn router(service: MatchService, config: Config) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/match/search",
            post(matches::search).delete(matches::cancel_search),
        )
        .route("/api/match/state", get(matches::state))
        .route("/api/match/move", post(matches::make_move))
        .route("/api/match/resign", post(matches::resign))
        .route("/api/match/history", get(matches::history))
        // Shared state
        .layer(Extension(service))
        .layer(Extension(config))
        .layer(cors)
}

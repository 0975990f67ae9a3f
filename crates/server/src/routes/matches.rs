use axum::{extract::Query, Extension, Json};
use chess_core::{MatchMode, MatchRecord, Move};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::auth::middleware::AuthUser;
use crate::error::AppError;
use crate::matchmaking::SearchOutcome;
use crate::service::{MatchService, MatchView};

#[derive(Deserialize)]
pub struct ModeQuery {
    pub mode: MatchMode,
}

/// POST /api/match/search?mode=pvp|pve
pub async fn search(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
    Query(q): Query<ModeQuery>,
) -> Result<Json<SearchOutcome>, AppError> {
    Ok(Json(service.search(user.id, q.mode).await?))
}

/// DELETE /api/match/search?mode=
pub async fn cancel_search(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
    Query(q): Query<ModeQuery>,
) -> Json<JsonValue> {
    let removed = service.cancel_search(user.id, q.mode).await;
    Json(json!({ "removed": removed }))
}

/// GET /api/match/state?mode=
pub async fn state(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
    Query(q): Query<ModeQuery>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(service.state(user.id, q.mode).await?))
}

/// POST /api/match/move?mode=
pub async fn make_move(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
    Query(q): Query<ModeQuery>,
    Json(mv): Json<Move>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(service.make_move(user.id, q.mode, mv).await?))
}

/// POST /api/match/resign?mode=
pub async fn resign(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
    Query(q): Query<ModeQuery>,
) -> Result<Json<MatchView>, AppError> {
    Ok(Json(service.resign(user.id, q.mode).await?))
}

/// GET /api/match/history
pub async fn history(
    Extension(service): Extension<MatchService>,
    user: AuthUser,
) -> Result<Json<Vec<MatchRecord>>, AppError> {
    Ok(Json(service.history(user.id).await?))
}

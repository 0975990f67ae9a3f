use chess_core::{GameState, MatchMode, MatchRecord, MatchStatus};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::error::AppError;

const MATCH_COLUMNS: &str =
    "id, mode, white_id, black_id, white_active, black_active, status, winner_id, game_state";

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    mode: String,
    white_id: i64,
    black_id: Option<i64>,
    white_active: bool,
    black_active: bool,
    status: String,
    winner_id: Option<i64>,
    game_state: JsonValue,
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = AppError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let game_state: GameState = serde_json::from_value(row.game_state)?;
        Ok(MatchRecord {
            id: row.id,
            mode: row.mode.parse::<MatchMode>().map_err(AppError::Internal)?,
            white_id: row.white_id,
            black_id: row.black_id,
            white_active: row.white_active,
            black_active: row.black_active,
            status: row.status.parse::<MatchStatus>().map_err(AppError::Internal)?,
            winner_id: row.winner_id,
            game_state,
        })
    }
}

fn to_records(rows: Vec<MatchRow>) -> Result<Vec<MatchRecord>, AppError> {
    rows.into_iter().map(MatchRecord::try_from).collect()
}

pub async fn create_match(pool: &PgPool, record: &MatchRecord) -> Result<i64, AppError> {
    let game_state = serde_json::to_value(&record.game_state)?;
    let row: (i64,) = sqlx::query_as(
        r#"INSERT INTO matches
               (mode, white_id, black_id, white_active, black_active, status, winner_id, game_state)
           VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
           RETURNING id"#,
    )
    .bind(record.mode.as_str())
    .bind(record.white_id)
    .bind(record.black_id)
    .bind(record.white_active)
    .bind(record.black_active)
    .bind(record.status.as_str())
    .bind(record.winner_id)
    .bind(game_state)
    .fetch_one(pool)
    .await
    .map_err(AppError::Sqlx)?;

    Ok(row.0)
}

/// Returns `false` if no row was updated.
pub async fn save_match(pool: &PgPool, record: &MatchRecord) -> Result<bool, AppError> {
    let game_state = serde_json::to_value(&record.game_state)?;
    let result = sqlx::query(
        r#"UPDATE matches
           SET white_active = $2, black_active = $3, status = $4, winner_id = $5,
               game_state = $6, updated_at = NOW()
           WHERE id = $1"#,
    )
    .bind(record.id)
    .bind(record.white_active)
    .bind(record.black_active)
    .bind(record.status.as_str())
    .bind(record.winner_id)
    .bind(game_state)
    .execute(pool)
    .await
    .map_err(AppError::Sqlx)?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_match(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_match_by_id(pool: &PgPool, id: i64) -> Result<Option<MatchRecord>, AppError> {
    let row = sqlx::query_as::<_, MatchRow>(&format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Sqlx)?;

    row.map(MatchRecord::try_from).transpose()
}

/// The user's current match in `mode`, as long as they have not left it.
pub async fn get_active_match(
    pool: &PgPool,
    user_id: i64,
    mode: MatchMode,
) -> Result<Option<MatchRecord>, AppError> {
    let row = sqlx::query_as::<_, MatchRow>(&format!(
        r#"SELECT {MATCH_COLUMNS} FROM matches
           WHERE mode = $2
             AND ((white_id = $1 AND white_active) OR (black_id = $1 AND black_active))
           ORDER BY id DESC
           LIMIT 1"#
    ))
    .bind(user_id)
    .bind(mode.as_str())
    .fetch_optional(pool)
    .await
    .map_err(AppError::Sqlx)?;

    row.map(MatchRecord::try_from).transpose()
}

/// Finished matches the user played, most recently updated first.
pub async fn get_terminal_matches(
    pool: &PgPool,
    user_id: i64,
) -> Result<Vec<MatchRecord>, AppError> {
    let statuses: Vec<String> = MatchStatus::TERMINAL
        .iter()
        .map(|s| s.as_str().to_string())
        .collect();

    let rows = sqlx::query_as::<_, MatchRow>(&format!(
        r#"SELECT {MATCH_COLUMNS} FROM matches
           WHERE (white_id = $1 OR black_id = $1) AND status = ANY($2)
           ORDER BY updated_at DESC, id DESC"#
    ))
    .bind(user_id)
    .bind(&statuses)
    .fetch_all(pool)
    .await
    .map_err(AppError::Sqlx)?;

    to_records(rows)
}

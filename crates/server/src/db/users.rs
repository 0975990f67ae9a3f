use sqlx::PgPool;

use crate::error::AppError;

pub async fn user_exists(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.0)
}

/// True when every id in `ids` names a user. Duplicates count once.
pub async fn users_exist(pool: &PgPool, ids: &[i64]) -> Result<bool, AppError> {
    let mut wanted = ids.to_vec();
    wanted.sort_unstable();
    wanted.dedup();

    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = ANY($1)")
        .bind(&wanted)
        .fetch_one(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.0 == wanted.len() as i64)
}

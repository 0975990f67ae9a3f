use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Create the schema if it is missing.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Players known to the match service
CREATE TABLE IF NOT EXISTS users (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT UNIQUE NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Matches (black_id is NULL when the computer plays black)
CREATE TABLE IF NOT EXISTS matches (
    id            BIGSERIAL PRIMARY KEY,
    mode          TEXT NOT NULL,
    white_id      BIGINT NOT NULL REFERENCES users(id),
    black_id      BIGINT REFERENCES users(id),
    white_active  BOOLEAN NOT NULL DEFAULT TRUE,
    black_active  BOOLEAN NOT NULL DEFAULT TRUE,
    status        TEXT NOT NULL DEFAULT 'active',
    winner_id     BIGINT REFERENCES users(id),
    game_state    JSONB NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_matches_white ON matches (white_id, mode);
CREATE INDEX IF NOT EXISTS idx_matches_black ON matches (black_id, mode);
CREATE INDEX IF NOT EXISTS idx_matches_status ON matches (status);
"#;

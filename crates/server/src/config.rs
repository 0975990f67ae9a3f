use std::env;

use chess_core::search::DEFAULT_DEPTH;

#[derive(Clone, Debug)]
pub struct Config {
    /// Postgres URL. Without one the server keeps matches in memory.
    pub database_url: Option<String>,
    /// Users known to the in-memory store.
    pub memory_users: Vec<i64>,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub ai_search_depth: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.trim().is_empty()),
            memory_users: env::var("MEMORY_USERS")
                .map(|v| parse_user_ids(&v))
                .unwrap_or_default(),
            jwt_secret: env::var("JWT_SECRET_KEY")
                .unwrap_or_else(|_| "dev-secret-key-change-in-production".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            ai_search_depth: env::var("AI_SEARCH_DEPTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DEPTH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            memory_users: Vec::new(),
            jwt_secret: "dev-secret-key-change-in-production".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            ai_search_depth: DEFAULT_DEPTH,
        }
    }
}

/// Comma-separated ids; blanks and junk are skipped.
fn parse_user_ids(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

//! Match and user persistence, backed by Postgres or the in-process store.

use std::sync::Arc;

use chess_core::{MatchMode, MatchRecord};
use sqlx::PgPool;

use crate::db;
use crate::error::AppError;
use crate::memory::MemoryStore;

#[derive(Clone, Debug)]
pub enum Repository {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

impl Repository {
    pub fn in_memory(users: impl IntoIterator<Item = i64>) -> Self {
        Repository::Memory(Arc::new(MemoryStore::with_users(users)))
    }

    pub async fn user_exists(&self, id: i64) -> Result<bool, AppError> {
        match self {
            Repository::Postgres(pool) => db::users::user_exists(pool, id).await,
            Repository::Memory(store) => Ok(store.user_exists(id).await),
        }
    }

    pub async fn users_exist(&self, ids: &[i64]) -> Result<bool, AppError> {
        match self {
            Repository::Postgres(pool) => db::users::users_exist(pool, ids).await,
            Repository::Memory(store) => Ok(store.users_exist(ids).await),
        }
    }

    pub async fn find_active_for(
        &self,
        user_id: i64,
        mode: MatchMode,
    ) -> Result<Option<MatchRecord>, AppError> {
        match self {
            Repository::Postgres(pool) => db::matches::get_active_match(pool, user_id, mode).await,
            Repository::Memory(store) => Ok(store.find_active_for(user_id, mode).await),
        }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<MatchRecord>, AppError> {
        match self {
            Repository::Postgres(pool) => db::matches::get_match_by_id(pool, id).await,
            Repository::Memory(store) => Ok(store.find_by_id(id).await),
        }
    }

    /// Store a new match and return its id.
    pub async fn create(&self, record: MatchRecord) -> Result<i64, AppError> {
        match self {
            Repository::Postgres(pool) => db::matches::create_match(pool, &record).await,
            Repository::Memory(store) => Ok(store.create(record).await),
        }
    }

    pub async fn save(&self, record: &MatchRecord) -> Result<(), AppError> {
        let saved = match self {
            Repository::Postgres(pool) => db::matches::save_match(pool, record).await?,
            Repository::Memory(store) => store.save(record).await,
        };
        if saved {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Match {} not found", record.id)))
        }
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let deleted = match self {
            Repository::Postgres(pool) => db::matches::delete_match(pool, id).await?,
            Repository::Memory(store) => store.delete(id).await,
        };
        if deleted {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Match {id} not found")))
        }
    }

    pub async fn find_terminal_for(&self, user_id: i64) -> Result<Vec<MatchRecord>, AppError> {
        match self {
            Repository::Postgres(pool) => db::matches::get_terminal_matches(pool, user_id).await,
            Repository::Memory(store) => Ok(store.find_terminal_for(user_id).await),
        }
    }
}

//! In-process store used when no database is configured.

use std::collections::{BTreeMap, HashSet};

use chess_core::{MatchMode, MatchRecord};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashSet<i64>,
    matches: BTreeMap<i64, MatchRecord>,
    next_id: i64,
}

impl MemoryStore {
    pub fn with_users(users: impl IntoIterator<Item = i64>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                users: users.into_iter().collect(),
                ..Inner::default()
            }),
        }
    }

    pub async fn user_exists(&self, id: i64) -> bool {
        self.inner.lock().await.users.contains(&id)
    }

    pub async fn users_exist(&self, ids: &[i64]) -> bool {
        let inner = self.inner.lock().await;
        ids.iter().all(|id| inner.users.contains(id))
    }

    pub async fn find_active_for(&self, user_id: i64, mode: MatchMode) -> Option<MatchRecord> {
        let inner = self.inner.lock().await;
        inner
            .matches
            .values()
            .rev()
            .find(|m| m.mode == mode && m.is_active_for(user_id))
            .cloned()
    }

    pub async fn find_by_id(&self, id: i64) -> Option<MatchRecord> {
        self.inner.lock().await.matches.get(&id).cloned()
    }

    pub async fn create(&self, mut record: MatchRecord) -> i64 {
        let mut inner = self.inner.lock().await;
        inner.next_id += 1;
        record.id = inner.next_id;
        inner.matches.insert(record.id, record);
        inner.next_id
    }

    /// Returns `false` if the match no longer exists.
    pub async fn save(&self, record: &MatchRecord) -> bool {
        let mut inner = self.inner.lock().await;
        match inner.matches.get_mut(&record.id) {
            Some(stored) => {
                *stored = record.clone();
                true
            }
            None => false,
        }
    }

    pub async fn delete(&self, id: i64) -> bool {
        self.inner.lock().await.matches.remove(&id).is_some()
    }

    /// Finished matches the user took part in, newest first.
    pub async fn find_terminal_for(&self, user_id: i64) -> Vec<MatchRecord> {
        let inner = self.inner.lock().await;
        inner
            .matches
            .values()
            .rev()
            .filter(|m| m.status.is_terminal() && m.side_of(user_id).is_some())
            .cloned()
            .collect()
    }
}

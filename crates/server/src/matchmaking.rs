//! Matchmaking queues, one FIFO per mode.
//!
//! Each queue lock is held across the whole search: the active-match check,
//! pairing, match creation and removal of the queue head all happen under
//! it, so a waiting player can only ever be paired once.

use std::collections::VecDeque;

use chess_core::{MatchMode, MatchRecord};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::AppError;
use crate::repo::Repository;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchOutcome {
    /// Waiting in the queue.
    Searching,
    Matched { match_id: i64 },
    /// The user already had a match in this mode.
    AlreadyMatched { match_id: i64 },
}

#[derive(Debug, Default)]
pub struct Matchmaker {
    pvp: Mutex<VecDeque<i64>>,
    pve: Mutex<VecDeque<i64>>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue(&self, mode: MatchMode) -> &Mutex<VecDeque<i64>> {
        match mode {
            MatchMode::Pvp => &self.pvp,
            MatchMode::Pve => &self.pve,
        }
    }

    pub async fn search(
        &self,
        repo: &Repository,
        user_id: i64,
        mode: MatchMode,
    ) -> Result<SearchOutcome, AppError> {
        let mut queue = self.queue(mode).lock().await;

        if let Some(existing) = repo.find_active_for(user_id, mode).await? {
            return Ok(SearchOutcome::AlreadyMatched {
                match_id: existing.id,
            });
        }

        if mode == MatchMode::Pve {
            let match_id = repo.create(MatchRecord::new(mode, user_id, None)).await?;
            info!(match_id, user_id, "Computer match created");
            return Ok(SearchOutcome::Matched { match_id });
        }

        let opponent = match queue.front().copied() {
            Some(head) if head != user_id && !queue.contains(&user_id) => head,
            Some(_) => return Ok(SearchOutcome::Searching),
            None => {
                queue.push_back(user_id);
                info!(user_id, %mode, "Queued for a match");
                return Ok(SearchOutcome::Searching);
            }
        };

        if !repo.users_exist(&[opponent, user_id]).await? {
            warn!(user_id, opponent, "Pairing failed: unknown user");
            return Err(AppError::Conflict("Could not pair players: unknown user".into()));
        }

        let (white, black) = if rand::random::<bool>() {
            (opponent, user_id)
        } else {
            (user_id, opponent)
        };
        let match_id = repo.create(MatchRecord::new(mode, white, Some(black))).await?;
        queue.pop_front();

        info!(match_id, white, black, "Players paired");
        Ok(SearchOutcome::Matched { match_id })
    }

    /// Leave the queue. Returns whether the user was waiting.
    pub async fn cancel(&self, user_id: i64, mode: MatchMode) -> bool {
        let mut queue = self.queue(mode).lock().await;
        let before = queue.len();
        queue.retain(|&id| id != user_id);
        let removed = queue.len() != before;
        if removed {
            info!(user_id, %mode, "Left the queue");
        }
        removed
    }

    pub async fn queue_len(&self, mode: MatchMode) -> usize {
        self.queue(mode).lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_two_players_pair() {
        let repo = Repository::in_memory([1, 2]);
        let mm = Matchmaker::new();

        assert_eq!(mm.search(&repo, 1, MatchMode::Pvp).await.unwrap(), SearchOutcome::Searching);
        let outcome = mm.search(&repo, 2, MatchMode::Pvp).await.unwrap();
        let SearchOutcome::Matched { match_id } = outcome else {
            panic!("expected a match, got {outcome:?}");
        };
        assert_eq!(mm.queue_len(MatchMode::Pvp).await, 0);

        let record = repo.find_by_id(match_id).await.unwrap().unwrap();
        let mut players = [record.white_id, record.black_id.unwrap()];
        players.sort();
        assert_eq!(players, [1, 2]);

        // both now see the same match
        assert_eq!(
            mm.search(&repo, 1, MatchMode::Pvp).await.unwrap(),
            SearchOutcome::AlreadyMatched { match_id }
        );
    }

    #[tokio::test]
    async fn test_repeat_search_does_not_duplicate() {
        let repo = Repository::in_memory([1]);
        let mm = Matchmaker::new();
        for _ in 0..3 {
            assert_eq!(mm.search(&repo, 1, MatchMode::Pvp).await.unwrap(), SearchOutcome::Searching);
        }
        assert_eq!(mm.queue_len(MatchMode::Pvp).await, 1);
    }

    #[tokio::test]
    async fn test_pve_matches_immediately() {
        let repo = Repository::in_memory([1]);
        let mm = Matchmaker::new();
        let SearchOutcome::Matched { match_id } = mm.search(&repo, 1, MatchMode::Pve).await.unwrap()
        else {
            panic!("expected a computer match");
        };
        let record = repo.find_by_id(match_id).await.unwrap().unwrap();
        assert_eq!(record.white_id, 1);
        assert_eq!(record.black_id, None);
        assert_eq!(mm.queue_len(MatchMode::Pve).await, 0);

        // a pvp search is unaffected by the computer match
        assert_eq!(mm.search(&repo, 1, MatchMode::Pvp).await.unwrap(), SearchOutcome::Searching);
    }

    #[tokio::test]
    async fn test_unknown_user_leaves_queue_unchanged() {
        let repo = Repository::in_memory([1]);
        let mm = Matchmaker::new();
        mm.search(&repo, 1, MatchMode::Pvp).await.unwrap();

        let err = mm.search(&repo, 99, MatchMode::Pvp).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(mm.queue_len(MatchMode::Pvp).await, 1);
        assert!(repo.find_active_for(1, MatchMode::Pvp).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cancel() {
        let repo = Repository::in_memory([1, 2]);
        let mm = Matchmaker::new();
        mm.search(&repo, 1, MatchMode::Pvp).await.unwrap();
        assert!(mm.cancel(1, MatchMode::Pvp).await);
        assert!(!mm.cancel(1, MatchMode::Pvp).await);
        assert_eq!(mm.queue_len(MatchMode::Pvp).await, 0);

        // the next searcher waits instead of pairing with the leaver
        assert_eq!(mm.search(&repo, 2, MatchMode::Pvp).await.unwrap(), SearchOutcome::Searching);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_searches_create_one_match() {
        let repo = Repository::in_memory([1, 2]);
        let mm = Arc::new(Matchmaker::new());

        let (a, b) = tokio::join!(
            {
                let (mm, repo) = (mm.clone(), repo.clone());
                tokio::spawn(async move { mm.search(&repo, 1, MatchMode::Pvp).await })
            },
            {
                let (mm, repo) = (mm.clone(), repo.clone());
                tokio::spawn(async move { mm.search(&repo, 2, MatchMode::Pvp).await })
            }
        );
        let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];

        let matched = outcomes
            .iter()
            .filter(|o| matches!(o, SearchOutcome::Matched { .. }))
            .count();
        assert_eq!(matched, 1);
        assert!(outcomes.contains(&SearchOutcome::Searching));
        assert_eq!(mm.queue_len(MatchMode::Pvp).await, 0);
        assert_eq!(repo.find_terminal_for(1).await.unwrap().len(), 0);
        assert!(repo.find_active_for(1, MatchMode::Pvp).await.unwrap().is_some());
        assert!(repo.find_active_for(2, MatchMode::Pvp).await.unwrap().is_some());
    }

    #[test]
    fn test_outcome_json() {
        assert_eq!(
            serde_json::to_value(SearchOutcome::Searching).unwrap(),
            serde_json::json!({"status": "searching"})
        );
        assert_eq!(
            serde_json::to_value(SearchOutcome::AlreadyMatched { match_id: 3 }).unwrap(),
            serde_json::json!({"status": "already_matched", "match_id": 3})
        );
    }
}

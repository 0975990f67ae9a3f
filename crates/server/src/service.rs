//! Match service: matchmaking, moves, the computer's replies and resignation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chess_core::search;
use chess_core::{MatchMode, MatchRecord, MatchStatus, Move, Side};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::error::AppError;
use crate::matchmaking::{Matchmaker, SearchOutcome};
use crate::repo::Repository;

/// One lock per match id. Every read-modify-write of a match runs under it.
#[derive(Debug, Default)]
pub struct MatchLocks {
    table: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl MatchLocks {
    pub async fn acquire(&self, match_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().await;
            table.entry(match_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    pub async fn forget(&self, match_id: i64) {
        self.table.lock().await.remove(&match_id);
    }
}

/// What a player polls for: the board and whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchView {
    pub match_id: i64,
    pub mode: MatchMode,
    pub white_id: i64,
    pub black_id: Option<i64>,
    pub placement: String,
    pub side_to_move: Side,
    pub color: Side,
    pub my_turn: bool,
    pub status: MatchStatus,
    pub winner_id: Option<i64>,
    pub last_move: Option<Move>,
    pub move_count: usize,
}

impl MatchView {
    pub fn for_user(record: &MatchRecord, user_id: i64) -> Result<Self, AppError> {
        let color = record
            .side_of(user_id)
            .ok_or_else(|| AppError::NotFound("You are not in this match".into()))?;
        let position = record.position()?;
        Ok(Self {
            match_id: record.id,
            mode: record.mode,
            white_id: record.white_id,
            black_id: record.black_id,
            placement: position.placement(),
            side_to_move: position.side_to_move,
            color,
            my_turn: record.in_progress() && position.side_to_move == color,
            status: record.status,
            winner_id: record.winner_id,
            last_move: record.game_state.last_move,
            move_count: record.game_state.moves.len(),
        })
    }
}

#[derive(Clone, Debug)]
pub struct MatchService {
    repo: Repository,
    matchmaker: Arc<Matchmaker>,
    locks: Arc<MatchLocks>,
    ai_depth: u32,
}

impl MatchService {
    pub fn new(repo: Repository, ai_depth: u32) -> Self {
        Self {
            repo,
            matchmaker: Arc::new(Matchmaker::new()),
            locks: Arc::new(MatchLocks::default()),
            ai_depth,
        }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub fn matchmaker(&self) -> &Matchmaker {
        &self.matchmaker
    }

    pub async fn search(&self, user_id: i64, mode: MatchMode) -> Result<SearchOutcome, AppError> {
        self.matchmaker.search(&self.repo, user_id, mode).await
    }

    pub async fn cancel_search(&self, user_id: i64, mode: MatchMode) -> bool {
        self.matchmaker.cancel(user_id, mode).await
    }

    pub async fn state(&self, user_id: i64, mode: MatchMode) -> Result<MatchView, AppError> {
        let record = self.active_match(user_id, mode).await?;
        MatchView::for_user(&record, user_id)
    }

    pub async fn make_move(
        &self,
        user_id: i64,
        mode: MatchMode,
        mv: Move,
    ) -> Result<MatchView, AppError> {
        let match_id = self.active_match(user_id, mode).await?.id;
        let _guard = self.locks.acquire(match_id).await;
        let mut record = self.reload(match_id).await?;

        let status = record.apply_move(mv, user_id)?;
        self.repo.save(&record).await?;
        info!(match_id, user_id, mv = %mv, %status, "Move applied");

        if record.mode == MatchMode::Pve && record.in_progress() {
            self.play_computer_turn(&mut record).await?;
        }

        MatchView::for_user(&record, user_id)
    }

    /// Let the computer answer. Runs with the match lock held, so further
    /// moves and resignations for this match wait for the search; `state`
    /// takes no lock and keeps answering polls meanwhile.
    async fn play_computer_turn(&self, record: &mut MatchRecord) -> Result<(), AppError> {
        let Some(ai_side) = [Side::White, Side::Black]
            .into_iter()
            .find(|&side| record.player(side).is_none())
        else {
            return Ok(());
        };

        let position = record.position()?;
        if position.side_to_move != ai_side {
            return Ok(());
        }

        let depth = self.ai_depth;
        let started = Instant::now();
        let best = tokio::task::spawn_blocking(move || search::best_move(&position, ai_side, depth))
            .await
            .map_err(|e| AppError::Internal(format!("Computer move failed: {e}")))??;
        debug!(
            match_id = record.id,
            depth,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Computer search finished"
        );

        let Some(mv) = best else {
            debug!(match_id = record.id, "Computer has no legal move");
            return Ok(());
        };

        let status = record.apply_move_as(mv, ai_side)?;
        self.repo.save(record).await?;
        info!(match_id = record.id, mv = %mv, %status, "Computer moved");
        Ok(())
    }

    pub async fn resign(&self, user_id: i64, mode: MatchMode) -> Result<MatchView, AppError> {
        let match_id = self.active_match(user_id, mode).await?.id;
        let _guard = self.locks.acquire(match_id).await;
        let mut record = self.reload(match_id).await?;

        let status = record.resign(user_id)?;
        let view = MatchView::for_user(&record, user_id)?;

        if record.mode == MatchMode::Pve {
            self.repo.delete(match_id).await?;
            self.locks.forget(match_id).await;
            info!(match_id, user_id, "Computer match discarded");
        } else {
            self.repo.save(&record).await?;
            info!(match_id, user_id, %status, "Player left match");
            if status == MatchStatus::Inactive {
                // nobody can reach this match any more
                self.locks.forget(match_id).await;
            }
        }

        Ok(view)
    }

    pub async fn history(&self, user_id: i64) -> Result<Vec<MatchRecord>, AppError> {
        self.repo.find_terminal_for(user_id).await
    }

    async fn active_match(&self, user_id: i64, mode: MatchMode) -> Result<MatchRecord, AppError> {
        self.repo
            .find_active_for(user_id, mode)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No active {mode} match")))
    }

    async fn reload(&self, match_id: i64) -> Result<MatchRecord, AppError> {
        self.repo
            .find_by_id(match_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Match {match_id} not found")))
    }
}

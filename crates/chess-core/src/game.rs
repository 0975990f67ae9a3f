//! Match records and the turn state machine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::attacks;
use crate::board::{Piece, PieceKind, Side};
use crate::error::{ChessError, MoveError};
use crate::movegen;
use crate::moves::Move;
use crate::position::{Position, STARTING_POSITION};
use crate::rules;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    Pvp,
    Pve,
}

impl MatchMode {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchMode::Pvp => "pvp",
            MatchMode::Pve => "pve",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pvp" => Ok(MatchMode::Pvp),
            "pve" => Ok(MatchMode::Pve),
            other => Err(format!("unknown match mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
    /// One player left.
    Abandoned,
    /// Both players left.
    Inactive,
}

impl MatchStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchStatus::Active => "active",
            MatchStatus::Check => "check",
            MatchStatus::Checkmate => "checkmate",
            MatchStatus::Stalemate => "stalemate",
            MatchStatus::Abandoned => "abandoned",
            MatchStatus::Inactive => "inactive",
        }
    }

    /// Board result reached; no further moves.
    pub fn is_decided(self) -> bool {
        matches!(self, MatchStatus::Checkmate | MatchStatus::Stalemate)
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchStatus::Active | MatchStatus::Check)
    }

    pub const TERMINAL: [MatchStatus; 4] = [
        MatchStatus::Checkmate,
        MatchStatus::Stalemate,
        MatchStatus::Abandoned,
        MatchStatus::Inactive,
    ];
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(MatchStatus::Active),
            "check" => Ok(MatchStatus::Check),
            "checkmate" => Ok(MatchStatus::Checkmate),
            "stalemate" => Ok(MatchStatus::Stalemate),
            "abandoned" => Ok(MatchStatus::Abandoned),
            "inactive" => Ok(MatchStatus::Inactive),
            other => Err(format!("unknown match status {other:?}")),
        }
    }
}

/// Persisted game progress: the position string plus move history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub position: String,
    #[serde(default)]
    pub moves: Vec<Move>,
    #[serde(default)]
    pub last_move: Option<Move>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            position: STARTING_POSITION.to_string(),
            moves: Vec::new(),
            last_move: None,
        }
    }
}

/// One match between two users, or a user and the computer.
///
/// In PVE matches the human is always white and `black_id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: i64,
    pub mode: MatchMode,
    pub white_id: i64,
    pub black_id: Option<i64>,
    pub white_active: bool,
    pub black_active: bool,
    pub status: MatchStatus,
    pub winner_id: Option<i64>,
    pub game_state: GameState,
}

impl MatchRecord {
    /// Fresh match from the starting position. `id` is assigned on create.
    pub fn new(mode: MatchMode, white_id: i64, black_id: Option<i64>) -> Self {
        Self {
            id: 0,
            mode,
            white_id,
            black_id,
            white_active: true,
            black_active: true,
            status: MatchStatus::Active,
            winner_id: None,
            game_state: GameState::default(),
        }
    }

    pub fn side_of(&self, user_id: i64) -> Option<Side> {
        if self.white_id == user_id {
            Some(Side::White)
        } else if self.black_id == Some(user_id) {
            Some(Side::Black)
        } else {
            None
        }
    }

    /// User id playing `side`; `None` for the computer.
    pub fn player(&self, side: Side) -> Option<i64> {
        match side {
            Side::White => Some(self.white_id),
            Side::Black => self.black_id,
        }
    }

    pub fn is_active(&self, side: Side) -> bool {
        match side {
            Side::White => self.white_active,
            Side::Black => self.black_active,
        }
    }

    /// The user takes part and has not left.
    pub fn is_active_for(&self, user_id: i64) -> bool {
        self.side_of(user_id).is_some_and(|side| self.is_active(side))
    }

    /// Moves are accepted only while both players are present and the board
    /// is undecided.
    pub fn in_progress(&self) -> bool {
        self.white_active && self.black_active && !self.status.is_decided()
    }

    pub fn position(&self) -> Result<Position, ChessError> {
        Position::parse(&self.game_state.position)
    }

    /// Apply a move submitted by a participant.
    pub fn apply_move(&mut self, mv: Move, acting_user: i64) -> Result<MatchStatus, MoveError> {
        let side = self.side_of(acting_user).ok_or(MoveError::NotAParticipant)?;
        self.apply_move_as(mv, side)
    }

    /// Apply a move for `side` directly. The computer plays through here.
    ///
    /// Nothing is written unless every check passes.
    pub fn apply_move_as(&mut self, mv: Move, side: Side) -> Result<MatchStatus, MoveError> {
        if !self.in_progress() {
            return Err(MoveError::GameOver);
        }

        let position = self.position()?;
        if position.side_to_move != side {
            return Err(MoveError::OutOfTurn);
        }

        if !rules::is_legal(&position.board, &mv, side) {
            return Err(MoveError::IllegalMove(mv.to_string()));
        }
        let (Some(from), Some(to), Some(piece)) = (
            mv.from_square(),
            mv.to_square(),
            mv.from_square().and_then(|sq| position.board.get(sq)),
        ) else {
            return Err(MoveError::IllegalMove(mv.to_string()));
        };

        let mut placed = piece;
        if let Some(kind) = mv.promotion {
            if !kind.can_promote_to() {
                return Err(MoveError::IllegalMove(format!(
                    "cannot promote to {}",
                    kind.letter().to_ascii_uppercase()
                )));
            }
            if piece.kind == PieceKind::Pawn && to.y == side.last_row() {
                placed = Piece::new(kind, side);
            }
        }

        let board = position.board.with_move(from, to, placed);
        if attacks::is_in_check(&board, side)? {
            return Err(MoveError::SelfCheck);
        }

        let opponent = !side;
        let in_check = attacks::is_in_check(&board, opponent)?;
        let can_move = movegen::has_any_legal_move(&board, opponent)?;
        let status = match (in_check, can_move) {
            (true, false) => MatchStatus::Checkmate,
            (true, true) => MatchStatus::Check,
            (false, false) => MatchStatus::Stalemate,
            (false, true) => MatchStatus::Active,
        };

        self.game_state.position = position.after_move(board).to_string();
        self.game_state.moves.push(mv);
        self.game_state.last_move = Some(mv);
        self.status = status;
        if status == MatchStatus::Checkmate {
            self.winner_id = self.player(side);
        }

        Ok(status)
    }

    /// The acting user leaves the match.
    ///
    /// The opponent becomes the winner unless one is already recorded, so a
    /// checkmate result survives while a stalemated or running match goes to
    /// the player who stayed. Status becomes `Abandoned`, then `Inactive`
    /// once both sides have left.
    pub fn resign(&mut self, acting_user: i64) -> Result<MatchStatus, MoveError> {
        let side = self.side_of(acting_user).ok_or(MoveError::NotAParticipant)?;
        if !self.is_active(side) {
            return Err(MoveError::GameOver);
        }

        if self.winner_id.is_none() {
            self.winner_id = self.player(!side);
        }

        match side {
            Side::White => self.white_active = false,
            Side::Black => self.black_active = false,
        }

        self.status = if self.white_active || self.black_active {
            MatchStatus::Abandoned
        } else {
            MatchStatus::Inactive
        };

        Ok(self.status)
    }
}

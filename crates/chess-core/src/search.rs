//! Computer opponent: fixed-depth brute-force search with a hand-built
//! material evaluation.
//!
//! Scores are always from the AI's point of view and every ply picks the
//! highest one, including the plies where the human is to move.

use crate::attacks;
use crate::board::{Board, Piece, PieceKind, Side, Square};
use crate::error::ChessError;
use crate::movegen::{self, Walk};
use crate::moves::Move;
use crate::position::Position;
use crate::rules;

/// Plies searched by the computer opponent.
pub const DEFAULT_DEPTH: u32 = 5;

/// Score of a move after which the opponent has no legal reply.
///
/// Signed relative to the AI: positive when the AI's move ends the game,
/// negative when the human's does. Not tied to white or black.
pub const MATE_SCORE: i32 = 1_000_000;

const PROMOTION_BONUS: i32 = 50;
const CAPTURE_BONUS: i32 = 5;
const CHECK_BONUS: i32 = 20;
const CENTER_BONUS: i32 = 5;

/// Material balance from `perspective`'s side.
pub fn evaluate(board: &Board, perspective: Side) -> i32 {
    let own: i32 = board.pieces(perspective).map(|(_, p)| p.kind.value()).sum();
    let other: i32 = board.pieces(!perspective).map(|(_, p)| p.kind.value()).sum();
    own - other
}

/// Tie-break order between equally scored moves: a later candidate only
/// replaces the kept one if its piece ranks strictly higher.
fn priority(kind: PieceKind) -> u8 {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Knight => 1,
        PieceKind::Bishop => 2,
        PieceKind::Queen => 3,
        PieceKind::Rook => 4,
        PieceKind::King => 5,
    }
}

/// Best move for `ai_side`, which must be the side to move in `position`.
///
/// `Ok(None)` means the AI has no legal move at all.
pub fn best_move(
    position: &Position,
    ai_side: Side,
    depth_limit: u32,
) -> Result<Option<Move>, ChessError> {
    let searcher = Searcher {
        ai_side,
        limit: depth_limit.max(1),
    };
    let root = searcher.search(&position.board, ai_side, 0)?;
    Ok(root.best.map(|c| c.mv))
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: i32,
    mv: Move,
    kind: PieceKind,
}

struct Node {
    score: i32,
    best: Option<Candidate>,
}

/// Outcome of scoring one candidate destination.
enum Scored {
    Illegal,
    Line { score: i32, mv: Move },
    /// Opponent is left without a legal move.
    Terminal { score: i32, mv: Move },
}

struct Searcher {
    ai_side: Side,
    limit: u32,
}

impl Searcher {
    fn search(&self, board: &Board, to_move: Side, depth: u32) -> Result<Node, ChessError> {
        if depth >= self.limit {
            return Ok(Node {
                score: evaluate(board, self.ai_side),
                best: None,
            });
        }

        let king = board
            .king_square(to_move)
            .ok_or(ChessError::NoKingFound(to_move))?;
        let mut best: Option<Candidate> = None;
        let mut failure = None;

        for (from, piece) in board.pieces(to_move) {
            movegen::walk_targets(board, from, piece, |to| {
                match self.score(board, from, to, piece, king, depth) {
                    Ok(Scored::Illegal) => Walk::Continue,
                    Ok(Scored::Line { score, mv }) => {
                        keep_better(&mut best, Candidate { score, mv, kind: piece.kind });
                        Walk::Continue
                    }
                    Ok(Scored::Terminal { score, mv }) => {
                        keep_better(&mut best, Candidate { score, mv, kind: piece.kind });
                        // opponent is out of moves; skip the rest of this ray
                        Walk::EndRay
                    }
                    Err(e) => {
                        failure = Some(e);
                        Walk::Halt
                    }
                }
            });
            if let Some(e) = failure.take() {
                return Err(e);
            }
        }

        let score = match best {
            Some(candidate) => candidate.score,
            None => evaluate(board, self.ai_side),
        };
        Ok(Node { score, best })
    }

    fn score(
        &self,
        board: &Board,
        from: Square,
        to: Square,
        piece: Piece,
        king: Square,
        depth: u32,
    ) -> Result<Scored, ChessError> {
        let side = piece.side;
        let mut mv = Move::new(from, to);
        if !rules::is_legal(board, &mv, side) {
            return Ok(Scored::Illegal);
        }

        let promotes = piece.kind == PieceKind::Pawn && to.y == side.last_row();
        let placed = if promotes {
            mv = mv.with_promotion(PieceKind::Queen);
            Piece::new(PieceKind::Queen, side)
        } else {
            piece
        };

        let after = board.with_move(from, to, placed);
        let king_now = if piece.kind == PieceKind::King { to } else { king };
        if attacks::is_square_attacked(&after, king_now, side) {
            return Ok(Scored::Illegal);
        }

        let opponent = !side;
        if !movegen::has_any_legal_move(&after, opponent)? {
            let score = if side == self.ai_side { MATE_SCORE } else { -MATE_SCORE };
            return Ok(Scored::Terminal { score, mv });
        }

        let mut bonus = 0;
        if promotes {
            bonus += PROMOTION_BONUS;
        }
        if !board.is_empty(to) {
            bonus += CAPTURE_BONUS;
        }
        if attacks::is_in_check(&after, opponent)? {
            bonus += CHECK_BONUS;
        }
        if to.is_central() {
            bonus += CENTER_BONUS;
        }

        let reply = self.search(&after, opponent, depth + 1)?;
        Ok(Scored::Line {
            score: bonus + reply.score,
            mv,
        })
    }
}

fn keep_better(best: &mut Option<Candidate>, candidate: Candidate) {
    let replace = match best {
        None => true,
        Some(kept) => {
            candidate.score > kept.score
                || (candidate.score == kept.score && priority(candidate.kind) > priority(kept.kind))
        }
    };
    if replace {
        *best = Some(candidate);
    }
}

//! Per-kind offset tables, the candidate-square walker, and the legal-move
//! oracle built on top of it.

use crate::attacks;
use crate::board::{Board, Piece, PieceKind, Side, Square};
use crate::error::ChessError;
use crate::moves::Move;
use crate::rules;

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub const DIAGONAL: [(i8, i8); 4] = [(1, -1), (1, 1), (-1, 1), (-1, -1)];

/// All eight neighbours; the king steps along them once, the queen slides.
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

const WHITE_PAWN_OFFSETS: [(i8, i8); 4] = [(0, -1), (0, -2), (-1, -1), (1, -1)];
const BLACK_PAWN_OFFSETS: [(i8, i8); 4] = [(0, 1), (0, 2), (-1, 1), (1, 1)];

/// Directions (sliders) or jumps (everything else) a piece probes.
pub fn offsets(piece: Piece) -> &'static [(i8, i8)] {
    match piece.kind {
        PieceKind::Pawn => match piece.side {
            Side::White => &WHITE_PAWN_OFFSETS,
            Side::Black => &BLACK_PAWN_OFFSETS,
        },
        PieceKind::Knight => &KNIGHT_OFFSETS,
        PieceKind::Bishop => &DIAGONAL,
        PieceKind::Rook => &ORTHOGONAL,
        PieceKind::Queen | PieceKind::King => &ALL_DIRECTIONS,
    }
}

/// What the walker should do after visiting a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Walk {
    Continue,
    /// Skip the rest of the current ray.
    EndRay,
    /// Stop walking altogether.
    Halt,
}

/// Visit every candidate destination of `piece` standing on `from`.
///
/// Sliding pieces extend each ray until it leaves the board or reaches an
/// occupied square (which is still visited). Other pieces visit each offset
/// once. Candidates are pseudo-legal at best: callers validate them.
///
/// Returns `true` if the visitor halted the walk.
pub fn walk_targets<F>(board: &Board, from: Square, piece: Piece, mut visit: F) -> bool
where
    F: FnMut(Square) -> Walk,
{
    let slides = piece.kind.slides();

    for &(dx, dy) in offsets(piece) {
        let mut current = from;
        while let Some(next) = current.offset(dx, dy) {
            match visit(next) {
                Walk::Continue => {}
                Walk::EndRay => break,
                Walk::Halt => return true,
            }
            if !slides || !board.is_empty(next) {
                break;
            }
            current = next;
        }
    }

    false
}

/// Shape-legal and does not leave the mover's own king attacked.
///
/// `king` is the mover's king square before the move.
pub fn is_playable(board: &Board, from: Square, to: Square, king: Square) -> bool {
    let Some(piece) = board.get(from) else {
        return false;
    };
    if !rules::is_legal(board, &Move::new(from, to), piece.side) {
        return false;
    }
    let after = board.with_move(from, to, piece);
    let king_now = if piece.kind == PieceKind::King { to } else { king };
    !attacks::is_square_attacked(&after, king_now, piece.side)
}

/// Does `side` have at least one move that keeps its king safe?
///
/// Short-circuits on the first such move.
pub fn has_any_legal_move(board: &Board, side: Side) -> Result<bool, ChessError> {
    let king = board.king_square(side).ok_or(ChessError::NoKingFound(side))?;

    for (from, piece) in board.pieces(side) {
        let found = walk_targets(board, from, piece, |to| {
            if is_playable(board, from, to, king) {
                Walk::Halt
            } else {
                Walk::Continue
            }
        });
        if found {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Every legal `(from, to)` pair for `side`. Promotions appear once, without
/// a promotion piece.
pub fn legal_moves(board: &Board, side: Side) -> Result<Vec<Move>, ChessError> {
    let king = board.king_square(side).ok_or(ChessError::NoKingFound(side))?;
    let mut moves = Vec::new();

    for (from, piece) in board.pieces(side) {
        walk_targets(board, from, piece, |to| {
            if is_playable(board, from, to, king) {
                moves.push(Move::new(from, to));
            }
            Walk::Continue
        });
    }

    Ok(moves)
}

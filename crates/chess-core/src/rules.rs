//! Move-shape validation.
//!
//! `is_legal` answers "may this piece make this move on this board": grid
//! bounds, ownership, friendly capture, per-kind shape and path. It does not
//! look at king safety; see [`crate::movegen`] and [`crate::game`] for that.

use crate::board::{Board, PieceKind, Side, Square};
use crate::moves::Move;

pub fn is_legal(board: &Board, mv: &Move, mover: Side) -> bool {
    let (Some(from), Some(to)) = (mv.from_square(), mv.to_square()) else {
        return false;
    };
    if from == to {
        return false;
    }

    let Some(piece) = board.get(from) else {
        return false;
    };
    if piece.side != mover {
        return false;
    }
    if board.get(to).is_some_and(|target| target.side == mover) {
        return false;
    }

    let dx = (to.x as i32 - from.x as i32).abs();
    let dy = (to.y as i32 - from.y as i32).abs();
    let straight = (dx == 0) != (dy == 0);
    let diagonal = dx == dy;

    match piece.kind {
        PieceKind::Pawn => pawn_move_ok(board, from, to, mover),
        PieceKind::Knight => matches!((dx, dy), (1, 2) | (2, 1)),
        PieceKind::Bishop => diagonal && path_clear(board, from, to),
        PieceKind::Rook => straight && path_clear(board, from, to),
        PieceKind::Queen => (diagonal || straight) && path_clear(board, from, to),
        PieceKind::King => dx <= 1 && dy <= 1,
    }
}

/// Every square strictly between `from` and `to` is empty.
///
/// Only meaningful on a shared rank, file or diagonal; anything else is
/// reported as blocked. Adjacent squares are trivially clear.
pub fn path_clear(board: &Board, from: Square, to: Square) -> bool {
    let dx = to.x as i32 - from.x as i32;
    let dy = to.y as i32 - from.y as i32;
    if !(dx == 0 || dy == 0 || dx.abs() == dy.abs()) {
        return false;
    }

    let step = (dx.signum() as i8, dy.signum() as i8);
    let mut current = from;
    loop {
        current = match current.offset(step.0, step.1) {
            Some(next) => next,
            None => return false,
        };
        if current == to {
            return true;
        }
        if !board.is_empty(current) {
            return false;
        }
    }
}

fn pawn_move_ok(board: &Board, from: Square, to: Square, side: Side) -> bool {
    let forward = side.forward() as i32;
    let dx = (to.x as i32 - from.x as i32).abs();
    let dy = to.y as i32 - from.y as i32;

    match dx {
        0 if dy == forward => board.is_empty(to),
        0 if dy == 2 * forward => {
            from.y == side.pawn_row() && board.is_empty(to) && path_clear(board, from, to)
        }
        1 if dy == forward => board.get(to).is_some_and(|target| target.side != side),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::decode;

    const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    fn mv(x: i32, y: i32, xnew: i32, ynew: i32) -> Move {
        Move { x, y, xnew, ynew, promotion: None }
    }

    #[test]
    fn test_pawn_pushes_from_start() {
        let board = decode(START).unwrap();
        assert!(is_legal(&board, &mv(4, 6, 4, 5), Side::White));
        assert!(is_legal(&board, &mv(4, 6, 4, 4), Side::White));
        assert!(!is_legal(&board, &mv(4, 6, 4, 3), Side::White));
        assert!(is_legal(&board, &mv(3, 1, 3, 3), Side::Black));
        // backwards
        assert!(!is_legal(&board, &mv(3, 1, 3, 0), Side::Black));
    }

    #[test]
    fn test_double_push_blocked() {
        // knight on e3 blocks the intervening square
        let board = decode("rnbqkbnr/pppppppp/8/8/8/4N3/PPPPPPPP/R1BQKBNR").unwrap();
        assert!(!is_legal(&board, &mv(4, 6, 4, 4), Side::White));
        assert!(!is_legal(&board, &mv(4, 6, 4, 5), Side::White));

        // destination occupied
        let board = decode("rnbqkbnr/pppppppp/8/8/4n3/8/PPPPPPPP/RNBQKBNR").unwrap();
        assert!(!is_legal(&board, &mv(4, 6, 4, 4), Side::White));
        assert!(is_legal(&board, &mv(4, 6, 4, 5), Side::White));
    }

    #[test]
    fn test_double_push_only_from_home_row() {
        let board = decode("4k3/8/8/8/8/4P3/8/4K3").unwrap();
        assert!(!is_legal(&board, &mv(4, 5, 4, 3), Side::White));
        assert!(is_legal(&board, &mv(4, 5, 4, 4), Side::White));
    }

    #[test]
    fn test_pawn_captures_only_diagonally_onto_enemy() {
        let board = decode("4k3/8/8/3p1P2/4P3/8/8/4K3").unwrap();
        assert!(is_legal(&board, &mv(4, 4, 3, 3), Side::White));
        // own piece on f5
        assert!(!is_legal(&board, &mv(4, 4, 5, 3), Side::White));
        // empty diagonal
        let board = decode("4k3/8/8/8/4P3/8/8/4K3").unwrap();
        assert!(!is_legal(&board, &mv(4, 4, 3, 3), Side::White));
        // straight push onto a piece
        let board = decode("4k3/8/8/4p3/4P3/8/8/4K3").unwrap();
        assert!(!is_legal(&board, &mv(4, 4, 4, 3), Side::White));
    }

    #[test]
    fn test_knight_ignores_surrounding_pieces() {
        // white knight on d4 boxed in by eight pawns
        let board = decode("4k3/8/8/2PPP3/2PNP3/2PPP3/8/4K3").unwrap();
        assert!(is_legal(&board, &mv(3, 4, 4, 2), Side::White));
        assert!(is_legal(&board, &mv(3, 4, 1, 5), Side::White));
        assert!(!is_legal(&board, &mv(3, 4, 3, 2), Side::White));
    }

    #[test]
    fn test_sliders_need_clear_path() {
        let board = decode("4k3/8/8/8/8/8/1P6/R1B1K3").unwrap();
        // rook a1 along the rank, c1 bishop in the way beyond b1
        assert!(is_legal(&board, &mv(0, 7, 1, 7), Side::White));
        assert!(!is_legal(&board, &mv(0, 7, 3, 7), Side::White));
        assert!(is_legal(&board, &mv(0, 7, 0, 1), Side::White));
        // bishop c1 blocked by b2 on one diagonal, open on the other
        assert!(!is_legal(&board, &mv(2, 7, 0, 5), Side::White));
        assert!(is_legal(&board, &mv(2, 7, 7, 2), Side::White));
        // rook cannot move diagonally, bishop cannot move straight
        assert!(!is_legal(&board, &mv(0, 7, 1, 6), Side::White));
        assert!(!is_legal(&board, &mv(2, 7, 2, 5), Side::White));
    }

    #[test]
    fn test_queen_and_king_shapes() {
        let board = decode("4k3/8/8/8/3Q4/8/8/4K3").unwrap();
        assert!(is_legal(&board, &mv(3, 4, 3, 0), Side::White));
        assert!(is_legal(&board, &mv(3, 4, 7, 0), Side::White));
        assert!(!is_legal(&board, &mv(3, 4, 5, 3), Side::White));
        assert!(is_legal(&board, &mv(4, 7, 5, 6), Side::White));
        assert!(!is_legal(&board, &mv(4, 7, 6, 7), Side::White));
    }

    #[test]
    fn test_rejects_bad_requests() {
        let board = decode(START).unwrap();
        // off the board
        assert!(!is_legal(&board, &mv(4, 6, 4, 8), Side::White));
        assert!(!is_legal(&board, &mv(4, 6, -1, -1), Side::White));
        // empty source, wrong owner, null move, friendly capture
        assert!(!is_legal(&board, &mv(4, 4, 4, 3), Side::White));
        assert!(!is_legal(&board, &mv(4, 1, 4, 3), Side::White));
        assert!(!is_legal(&board, &mv(4, 6, 4, 6), Side::White));
        assert!(!is_legal(&board, &mv(0, 7, 0, 6), Side::White));
    }

    #[test]
    fn test_path_clear_off_line() {
        let board = decode("8/8/8/8/8/8/8/8").unwrap();
        let a1 = Square::new(0, 7).unwrap();
        assert!(path_clear(&board, a1, Square::new(7, 0).unwrap()));
        assert!(!path_clear(&board, a1, Square::new(1, 5).unwrap()));
    }
}

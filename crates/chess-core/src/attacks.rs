//! Attack and check detection.
//!
//! Besides pawns, knights and sliders, an adjacent enemy king counts as an
//! attacker, so kings can never stand next to each other. This changes
//! some checkmate and stalemate verdicts compared with a detector that
//! only looks at the other piece kinds.

use crate::board::{Board, Piece, PieceKind, Side, Square};
use crate::error::ChessError;
use crate::movegen::{ALL_DIRECTIONS, DIAGONAL, KNIGHT_OFFSETS, ORTHOGONAL};

/// Is `square` attacked by the opponent of `defender`?
///
/// Works backwards from the probe square: pawns on the two squares
/// diagonally ahead (from the defender's point of view), knights a knight's
/// jump away, an adjacent king, and the first piece met on each of the eight
/// rays. Each ray contributes at most one attacker.
pub fn is_square_attacked(board: &Board, square: Square, defender: Side) -> bool {
    let attacker = !defender;
    let holds = |sq: Option<Square>, kind: PieceKind| {
        sq.and_then(|s| board.get(s)) == Some(Piece::new(kind, attacker))
    };

    let ahead = defender.forward();
    if holds(square.offset(-1, ahead), PieceKind::Pawn)
        || holds(square.offset(1, ahead), PieceKind::Pawn)
    {
        return true;
    }

    if KNIGHT_OFFSETS
        .iter()
        .any(|&(dx, dy)| holds(square.offset(dx, dy), PieceKind::Knight))
    {
        return true;
    }

    if ALL_DIRECTIONS
        .iter()
        .any(|&(dx, dy)| holds(square.offset(dx, dy), PieceKind::King))
    {
        return true;
    }

    let slider_hit = |directions: &[(i8, i8)], kind: PieceKind| {
        directions.iter().any(|&(dx, dy)| {
            first_piece_along(board, square, dx, dy).is_some_and(|piece| {
                piece.side == attacker && (piece.kind == kind || piece.kind == PieceKind::Queen)
            })
        })
    };

    slider_hit(&ORTHOGONAL, PieceKind::Rook) || slider_hit(&DIAGONAL, PieceKind::Bishop)
}

/// Is `side`'s king attacked?
pub fn is_in_check(board: &Board, side: Side) -> Result<bool, ChessError> {
    let king = board.king_square(side).ok_or(ChessError::NoKingFound(side))?;
    Ok(is_square_attacked(board, king, side))
}

fn first_piece_along(board: &Board, from: Square, dx: i8, dy: i8) -> Option<Piece> {
    let mut current = from;
    while let Some(next) = current.offset(dx, dy) {
        if let Some(piece) = board.get(next) {
            return Some(piece);
        }
        current = next;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::decode;

    fn sq(x: i32, y: i32) -> Square {
        Square::new(x, y).unwrap()
    }

    #[test]
    fn test_pawn_attacks_depend_on_direction() {
        // black pawn on d5 attacks c4 and e4 (towards white)
        let board = decode("4k3/8/8/3p4/8/8/8/4K3").unwrap();
        assert!(is_square_attacked(&board, sq(2, 4), Side::White));
        assert!(is_square_attacked(&board, sq(4, 4), Side::White));
        assert!(!is_square_attacked(&board, sq(3, 4), Side::White));
        assert!(!is_square_attacked(&board, sq(2, 2), Side::White));

        // white pawn on d4 attacks c5 and e5
        let board = decode("4k3/8/8/8/3P4/8/8/4K3").unwrap();
        assert!(is_square_attacked(&board, sq(2, 3), Side::Black));
        assert!(is_square_attacked(&board, sq(4, 3), Side::Black));
        assert!(!is_square_attacked(&board, sq(4, 5), Side::Black));
    }

    #[test]
    fn test_knight_attacks() {
        let board = decode("4k3/8/8/8/3n4/8/8/4K3").unwrap();
        assert!(is_square_attacked(&board, sq(4, 6), Side::White));
        assert!(is_square_attacked(&board, sq(1, 5), Side::White));
        assert!(!is_square_attacked(&board, sq(3, 6), Side::White));
    }

    #[test]
    fn test_rays_are_blocked() {
        // black rook a4, white pawn c4 shields e4
        let board = decode("4k3/8/8/8/r1P5/8/8/4K3").unwrap();
        assert!(is_square_attacked(&board, sq(1, 4), Side::White));
        assert!(is_square_attacked(&board, sq(2, 4), Side::White));
        assert!(!is_square_attacked(&board, sq(4, 4), Side::White));
        // rook does not attack diagonally
        assert!(!is_square_attacked(&board, sq(1, 3), Side::White));
    }

    #[test]
    fn test_queen_attacks_both_ray_kinds() {
        let board = decode("4k3/8/8/8/3q4/8/8/K7").unwrap();
        assert!(is_square_attacked(&board, sq(0, 7), Side::White));
        assert!(is_square_attacked(&board, sq(3, 7), Side::White));
        assert!(!is_square_attacked(&board, sq(1, 7), Side::White));
    }

    #[test]
    fn test_friendly_pieces_do_not_attack() {
        let board = decode("4k3/8/8/8/3Q4/8/8/K7").unwrap();
        assert!(!is_square_attacked(&board, sq(0, 7), Side::White));
    }

    #[test]
    fn test_adjacent_king_attacks() {
        let board = decode("8/8/8/3k4/8/8/8/4K3").unwrap();
        assert!(is_square_attacked(&board, sq(4, 4), Side::White));
        assert!(!is_square_attacked(&board, sq(4, 5), Side::White));
    }

    #[test]
    fn test_is_in_check() {
        let board = decode("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR").unwrap();
        assert_eq!(is_in_check(&board, Side::White), Ok(true));
        assert_eq!(is_in_check(&board, Side::Black), Ok(false));

        let board = decode("8/8/8/8/8/8/8/4K3").unwrap();
        assert_eq!(
            is_in_check(&board, Side::Black),
            Err(ChessError::NoKingFound(Side::Black))
        );
    }
}

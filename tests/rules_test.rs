//! Cross-checks move generation and game-end classification against
//! shakmaty on positions without castling rights or en-passant squares,
//! where both rule sets agree.

use std::collections::BTreeSet;

use chess_core::attacks::is_in_check;
use chess_core::movegen::{has_any_legal_move, legal_moves};
use chess_core::{Piece, PieceKind, Position};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};

type Pair = ((i32, i32), (i32, i32));

fn to_xy(sq: shakmaty::Square) -> (i32, i32) {
    (sq.file() as i32, 7 - sq.rank() as i32)
}

fn reference(fen: &str) -> Chess {
    let fen: Fen = fen.parse().unwrap();
    fen.into_position::<Chess>(CastlingMode::Standard)
        .or_else(|e| e.ignore_impossible_check())
        .unwrap()
}

fn reference_pairs(pos: &Chess) -> BTreeSet<Pair> {
    pos.legal_moves()
        .iter()
        .filter_map(|m| m.from().map(|from| (to_xy(from), to_xy(m.to()))))
        .collect()
}

fn our_pairs(position: &Position) -> BTreeSet<Pair> {
    legal_moves(&position.board, position.side_to_move)
        .unwrap()
        .iter()
        .map(|m| ((m.x, m.y), (m.xnew, m.ynew)))
        .collect()
}

fn assert_agrees(fen: &str) {
    let position = Position::parse(fen).unwrap();
    let pos = reference(fen);

    assert_eq!(our_pairs(&position), reference_pairs(&pos), "moves differ in {fen}");
    assert_eq!(
        is_in_check(&position.board, position.side_to_move).unwrap(),
        pos.is_check(),
        "check differs in {fen}"
    );
    assert_eq!(
        has_any_legal_move(&position.board, position.side_to_move).unwrap(),
        !pos.legal_moves().is_empty(),
        "mobility differs in {fen}"
    );
}

#[test]
fn test_known_positions() {
    for fen in [
        "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b - - 0 1",
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
        "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w - - 0 1",
        "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w - - 1 8",
        "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
    ] {
        assert_agrees(fen);
    }
}

#[test]
fn test_game_end_positions() {
    // fool's mate, stalemate, back-rank mate, smothered mate
    for fen in [
        "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w - - 1 3",
        "k7/2Q5/1K6/8/8/8/8/8 b - - 0 1",
        "6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1",
        "3R2k1/5ppp/8/8/8/8/8/6K1 b - - 0 1",
        "6rk/5Npp/8/8/8/8/8/6K1 b - - 0 1",
    ] {
        assert_agrees(fen);
    }
}

/// Deterministic playout; both engines must agree after every ply.
#[test]
fn test_playout_agrees() {
    let mut position =
        Position::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1").unwrap();

    for ply in 0..120usize {
        let fen = format!("{} {} - - 0 1", position.placement(), position.side_to_move.to_char());
        assert_agrees(&fen);

        let moves = legal_moves(&position.board, position.side_to_move).unwrap();
        if moves.is_empty() {
            break;
        }
        let chosen = moves[(ply * 7 + 3) % moves.len()];
        let from = chosen.from_square().unwrap();
        let to = chosen.to_square().unwrap();
        let mut piece = position.board.get(from).unwrap();
        if piece.kind == PieceKind::Pawn && to.y == piece.side.last_row() {
            piece = Piece::new(PieceKind::Queen, piece.side);
        }
        position = position.after_move(position.board.with_move(from, to, piece));
    }
}

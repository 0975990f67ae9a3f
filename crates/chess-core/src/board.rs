//! Board representation and the placement-string codec.
//!
//! Squares are addressed as `(x, y)`: `x` is the file (0 = a), `y` is the row
//! in placement-string order, so `y = 0` is the top row (rank 8) and `y = 7`
//! the bottom row (rank 1). White pawns therefore move towards `y = 0`.

use std::fmt;
use std::ops::Not;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChessError;

pub const BOARD_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    /// Row delta of a single pawn step.
    pub fn forward(self) -> i8 {
        match self {
            Side::White => -1,
            Side::Black => 1,
        }
    }

    /// Row the side's pawns start on (and may double-push from).
    pub fn pawn_row(self) -> u8 {
        match self {
            Side::White => 6,
            Side::Black => 1,
        }
    }

    /// Row on which the side's pawns promote.
    pub fn last_row(self) -> u8 {
        match self {
            Side::White => 0,
            Side::Black => 7,
        }
    }

    pub fn from_char(c: char) -> Option<Side> {
        match c {
            'w' => Some(Side::White),
            'b' => Some(Side::Black),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }
}

impl Not for Side {
    type Output = Side;

    fn not(self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::White => f.write_str("white"),
            Side::Black => f.write_str("black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Case-insensitive letter lookup (`p n b r q k`).
    pub fn from_letter(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Lowercase letter.
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Material value used by the static evaluation.
    pub fn value(self) -> i32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight => 3,
            PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 1000,
        }
    }

    /// Bishops, rooks and queens keep going along a ray until blocked.
    pub fn slides(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    pub fn can_promote_to(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    /// Uppercase = white, lowercase = black.
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_letter(c)?;
        let side = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
        Some(Piece::new(kind, side))
    }

    pub fn fen_char(self) -> char {
        match self.side {
            Side::White => self.kind.letter().to_ascii_uppercase(),
            Side::Black => self.kind.letter(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    /// `None` when off the board.
    pub fn new(x: i32, y: i32) -> Option<Square> {
        let size = BOARD_SIZE as i32;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Some(Square { x: x as u8, y: y as u8 })
        } else {
            None
        }
    }

    pub fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        Square::new(self.x as i32 + dx as i32, self.y as i32 + dy as i32)
    }

    /// Inside the central 4x4 block (c3..f6).
    pub fn is_central(self) -> bool {
        (2..=5).contains(&self.x) && (2..=5).contains(&self.y)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.x) as char;
        write!(f, "{}{}", file, BOARD_SIZE as u8 - self.y)
    }
}

/// 8x8 grid of optional pieces, stored row-major as `squares[y][x]`.
///
/// Copied for every candidate move during lookahead.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct Board {
    squares: [[Option<Piece>; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.y as usize][square.x as usize]
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.y as usize][square.x as usize] = piece;
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    /// Copy of the board with `placed` on `to` and `from` cleared.
    pub fn with_move(&self, from: Square, to: Square, placed: Piece) -> Board {
        let mut next = *self;
        next.set(from, None);
        next.set(to, Some(placed));
        next
    }

    /// All pieces of one side in row-major order.
    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.squares.iter().enumerate().flat_map(move |(y, row)| {
            row.iter().enumerate().filter_map(move |(x, cell)| match cell {
                Some(piece) if piece.side == side => {
                    Some((Square { x: x as u8, y: y as u8 }, *piece))
                }
                _ => None,
            })
        })
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.pieces(side)
            .find(|(_, piece)| piece.kind == PieceKind::King)
            .map(|(square, _)| square)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", encode(self))
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

impl FromStr for Board {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Decode the placement field of a position string.
pub fn decode(placement: &str) -> Result<Board, ChessError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != BOARD_SIZE {
        return Err(ChessError::MalformedPosition(format!(
            "expected {BOARD_SIZE} ranks, found {}",
            rows.len()
        )));
    }

    let mut board = Board::empty();
    for (y, row) in rows.iter().enumerate() {
        let mut x = 0usize;
        let mut previous_was_digit = false;

        for c in row.chars() {
            if let Some(run) = c.to_digit(10) {
                // "44" decodes fine but would not round-trip
                if run == 0 || run as usize > BOARD_SIZE || previous_was_digit {
                    return Err(ChessError::MalformedPosition(format!(
                        "bad empty-square run in rank {}: {row:?}",
                        y + 1
                    )));
                }
                x += run as usize;
                previous_was_digit = true;
            } else {
                let piece = Piece::from_fen_char(c).ok_or_else(|| {
                    ChessError::MalformedPosition(format!("unknown piece letter {c:?}"))
                })?;
                if x < BOARD_SIZE {
                    board.squares[y][x] = Some(piece);
                }
                x += 1;
                previous_was_digit = false;
            }

            if x > BOARD_SIZE {
                break;
            }
        }

        if x != BOARD_SIZE {
            return Err(ChessError::MalformedPosition(format!(
                "rank {} has {x} squares: {row:?}",
                y + 1
            )));
        }
    }

    Ok(board)
}

/// Encode a board back into its placement field.
pub fn encode(board: &Board) -> String {
    let mut out = String::with_capacity(71);

    for (y, row) in board.squares.iter().enumerate() {
        if y > 0 {
            out.push('/');
        }
        let mut empty = 0u8;
        for cell in row {
            match cell {
                Some(piece) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(piece.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
    }

    out
}

//! Full position strings: `<placement> <side-to-move> <other fields...>`.
//!
//! Only the placement and the side to move carry meaning here. Whatever
//! follows (castling rights, en-passant square, clocks) is kept verbatim.

use std::fmt;
use std::str::FromStr;

use crate::board::{self, Board, Side};
use crate::error::ChessError;

pub const STARTING_POSITION: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub board: Board,
    pub side_to_move: Side,
    rest: String,
}

impl Position {
    pub fn parse(s: &str) -> Result<Self, ChessError> {
        let mut fields = s.trim().splitn(3, ' ');

        let placement = fields.next().unwrap_or_default();
        let board = board::decode(placement)?;

        let side_field = fields
            .next()
            .ok_or_else(|| ChessError::MalformedPosition("missing side to move".into()))?;
        let mut chars = side_field.chars();
        let side_to_move = match (chars.next().and_then(Side::from_char), chars.next()) {
            (Some(side), None) => side,
            _ => {
                return Err(ChessError::MalformedPosition(format!(
                    "bad side to move {side_field:?}"
                )))
            }
        };

        let rest = fields.next().unwrap_or_default().trim().to_string();

        Ok(Self {
            board,
            side_to_move,
            rest,
        })
    }

    pub fn placement(&self) -> String {
        board::encode(&self.board)
    }

    /// The untouched trailing fields.
    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// Same trailing fields, new board, other side to move.
    pub fn after_move(&self, board: Board) -> Position {
        Position {
            board,
            side_to_move: !self.side_to_move,
            rest: self.rest.clone(),
        }
    }
}

impl FromStr for Position {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.placement(), self.side_to_move.to_char())?;
        if !self.rest.is_empty() {
            write!(f, " {}", self.rest)?;
        }
        Ok(())
    }
}

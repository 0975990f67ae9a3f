//! Engine error types

use thiserror::Error;

use crate::board::Side;

/// Faults in the stored position itself. Never caused by a player.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Malformed position: {0}")]
    MalformedPosition(String),

    #[error("No {0} king on the board")]
    NoKingFound(Side),
}

/// Rejections of a single move or resignation attempt.
/// A rejected attempt never mutates the match.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    #[error("You are not a player in this match")]
    NotAParticipant,

    #[error("It is not your turn")]
    OutOfTurn,

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("That move would leave your king in check")]
    SelfCheck,

    #[error("The match is over")]
    GameOver,

    #[error(transparent)]
    Position(#[from] ChessError),
}

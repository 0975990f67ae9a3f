//! Chess rule engine for head-to-head and computer matches.
//!
//! Board codec, move validation, attack detection, the legal-move oracle,
//! the match state machine and a fixed-depth search. Synchronous and free of
//! I/O; the server crate owns persistence and concurrency.

pub mod attacks;
pub mod board;
pub mod error;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod position;
pub mod rules;
pub mod search;

pub use board::{Board, Piece, PieceKind, Side, Square};
pub use error::{ChessError, MoveError};
pub use game::{GameState, MatchMode, MatchRecord, MatchStatus};
pub use moves::Move;
pub use position::{Position, STARTING_POSITION};

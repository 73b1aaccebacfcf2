//! 0x88 board representation and game logic: squares, packed moves,
//! piece lists, incremental make/unmake, attack queries, move
//! generation, evaluation, and SEE all live under this module.
//!
//! One file per responsibility, with a single `Board` struct everything
//! else operates on, built around the 0x88 + piece-list representation
//! rather than bitboards.

pub mod attack;
pub mod error;
pub mod eval;
pub mod fen;
pub mod make_unmake;
pub mod movegen;
pub mod prelude;
pub mod see;
pub mod state;
pub mod tables;
pub mod types;

pub use error::{FenError, MoveParseError};
pub use state::{Board, UndoInfo};
pub use types::{
    CastlingRights, Color, Move, MoveList, Square, BISHOP, KING, KNIGHT, PAWN, QUEEN, ROOK,
};

//! Convenience re-exports for the common board types.
//!
//! ```
//! use garbochess_core::board::prelude::*;
//! ```

pub use super::{
    Board, CastlingRights, Color, FenError, Move, MoveList, MoveParseError, Square, BISHOP, KING,
    KNIGHT, PAWN, QUEEN, ROOK,
};

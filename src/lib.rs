//! `garbochess-core`: an instantiable, cooperatively-scheduled alpha-beta
//! chess search engine (0x88 board, piece lists, iterative deepening with
//! a transposition table). See `DESIGN.md` for a module-by-module
//! rundown of design decisions.

pub mod board;
pub mod engine;
pub mod ordering;
pub mod search;
pub mod tt;
pub mod uci;
pub mod zobrist;

pub use board::{Board, Color, Move, MoveList};
pub use engine::{search_async, SearchLimits};

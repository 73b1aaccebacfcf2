//! The move picker, quiescence search, and alpha-beta drivers (spec
//! §4.7–§4.9): everything above `Board`'s mechanical move application but
//! below the iterative-deepening driver in `crate::engine`.

pub mod algorithms;
pub mod extensions;
pub mod lmr;
pub mod move_selector;
pub mod pruning;
pub mod quiescence;

pub use algorithms::{alpha_beta, all_cut_node};
pub use move_selector::MovePicker;
pub use quiescence::quiescence;

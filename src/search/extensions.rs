//! Check extension: if the move gives check, extend ply by 1. No
//! singular extension is modeled here.

/// `remaining` already reflects this move having been made; `gives_check`
/// is `board.in_check()` read right after `make_move` succeeds.
pub(crate) fn check_extension(gives_check: bool) -> i32 {
    i32::from(gives_check)
}

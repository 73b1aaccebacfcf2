//! The cooperative iterative-deepening driver: `search_async` alternates
//! root-level `alpha_beta` calls with aspiration windows, handing
//! control back to the caller between iterations instead of looping
//! straight through to `max_ply`.
//!
//! Rebuilt single-threaded and synchronous-callback based: no
//! `JoinHandle`, no `AtomicBool` stop flag, no `parking_lot::Mutex`. The
//! single suspension point, exactly between iterative-deepening
//! iterations, is modeled as a plain `FnMut()` callback invoked once per
//! completed iteration, in keeping with the synchronous core this crate
//! exposes; a host that wants actual yielding (an async runtime, a fiber
//! scheduler) drives that from outside by calling `search_async` again
//! with an adjusted `timeout`.

use crate::board::state::Board;
use crate::board::tables::{MAX_EVAL, MIN_EVAL};
use crate::board::types::Move;

use super::time::SearchLimits;
use crate::search::algorithms::alpha_beta;

/// Run `search_async(state, maxPly, yieldFn, onComplete)` to completion.
/// `yield_fn` is called once between each pair of iterations (the single
/// suspension point this driver exposes); `on_complete` is called
/// exactly once, with `Move::NULL` if the root had no legal move or the
/// state's `foundmove` otherwise, after the chosen move has already been
/// applied to `board`.
pub fn search_async<Y, C>(board: &mut Board, limits: SearchLimits, mut yield_fn: Y, on_complete: C)
where
    Y: FnMut(),
    C: FnOnce(Move),
{
    board.nodes = 0;
    board.max_fin_cnt = limits.max_fin_cnt;
    board.timeout_secs = limits.timeout_secs;
    board.start_time = Some(std::time::Instant::now());
    board.search_valid = true;

    let mut alpha = MIN_EVAL;
    let mut beta = MAX_EVAL;
    let mut best_move = Move::NULL;
    let mut i = 1;

    while i <= limits.max_ply {
        let value = alpha_beta(board, i, 0, alpha, beta);

        if let Some(entry) = board.tt.probe(board.hash_low(), board.hash_high()) {
            if !entry.best_move.is_null() {
                best_move = entry.best_move;
            }
        }

        #[cfg(feature = "logging")]
        log::debug!("iteration {i} depth={i} value={value} nodes={}", board.nodes);

        if !board.search_valid {
            break;
        }

        if value > alpha && value < beta {
            alpha = (value - 500).max(MIN_EVAL);
            beta = (value + 500).min(MAX_EVAL);
            i += 1;
        } else {
            // Aspiration window missed: widen fully and re-search the
            // same depth.
            alpha = MIN_EVAL;
            beta = MAX_EVAL;
        }

        if i <= limits.max_ply {
            yield_fn();
        }
    }

    if best_move.is_null() {
        on_complete(Move::NULL);
        return;
    }

    board.make_move(best_move);
    board.foundmove = best_move;
    on_complete(best_move);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;

    #[test]
    fn startpos_search_advances_state_by_one_ply() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        let limits = SearchLimits::new(4);
        let mut yields = 0;
        let mut completed = None;
        search_async(
            &mut board,
            limits,
            || yields += 1,
            |mv| completed = Some(mv),
        );
        let best = completed.expect("on_complete called");
        assert!(!best.is_null());
        assert_eq!(board.foundmove, best);
        assert_eq!(board.undo_stack_len(), 1);
    }

    #[test]
    fn mate_in_one_is_found_by_the_driver() {
        let mut board = Board::from_fen("4k3/R7/6R1/8/8/8/8/4K3 w - - 0 1").unwrap();
        let limits = SearchLimits::new(2);
        let mut completed = None;
        search_async(&mut board, limits, || {}, |mv| completed = Some(mv));
        let best = completed.expect("on_complete called");
        let formatted = best.format();
        assert!(formatted.starts_with("g6"));
        assert!(formatted.ends_with('8'));
    }

    #[test]
    fn yields_exactly_once_between_each_pair_of_completed_iterations() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        let limits = SearchLimits::new(3);
        let mut yields = 0;
        search_async(&mut board, limits, || yields += 1, |_| {});
        // At most max_ply - 1 yields: one between each adjacent pair of
        // iterations, none after the last.
        assert!(yields <= 2);
    }

    #[test]
    fn no_legal_moves_completes_with_null_move() {
        // Black to move, stalemated: no legal move from the root.
        let mut board = Board::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        let limits = SearchLimits::new(3);
        let mut completed = None;
        search_async(&mut board, limits, || {}, |mv| completed = Some(mv));
        assert_eq!(completed, Some(Move::NULL));
        assert!(board.foundmove.is_null() || board.foundmove == Move::NULL);
    }
}

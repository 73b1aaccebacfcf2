//! The two alpha-beta entry points: `alpha_beta` is the PV node (full
//! window on the first move, null-window scouts with re-search on the
//! rest); `all_cut_node` is the cut/all node (a single null-window
//! search, enabling razoring and null-move pruning).
//!
//! Wired to `pruning`/`lmr`/`extensions`/`move_selector`/`quiescence`,
//! split into a PV/cut-node pair rather than one generic recursive
//! negamax, since razoring and null-move pruning apply to the cut/all
//! role specifically.
//!
//! `remaining` is "ply" (plies left to search); `from_root` is "depth"
//! (plies already played from the search root). Spelled out rather than
//! reusing that overloaded pair of names.

use crate::board::state::Board;
use crate::board::tables::{MAX_EVAL, MIN_EVAL};
use crate::board::types::{Move, MAX_PLY};
use crate::tt::TTFlag;

use super::extensions::check_extension;
use super::lmr::lmr_reduction;
use super::move_selector::MovePicker;
use super::pruning::{mate_distance_window, null_move_reduction, should_razor, should_try_null_move};
use super::quiescence::quiescence;

const MATE_THRESHOLD: i32 = MAX_EVAL - MAX_PLY as i32;

/// Normalize a root-relative score into a node-relative one before it
/// goes into the TT, so a mate score found at one `from_root` can be
/// reused correctly when the same node is reached at a different depth
/// from a different root.
fn to_tt_value(value: i32, from_root: i32) -> i32 {
    if value >= MATE_THRESHOLD {
        value + from_root
    } else if value <= -MATE_THRESHOLD {
        value - from_root
    } else {
        value
    }
}

/// Inverse of `to_tt_value`.
fn from_tt_value(value: i32, from_root: i32) -> i32 {
    if value >= MATE_THRESHOLD {
        value - from_root
    } else if value <= -MATE_THRESHOLD {
        value + from_root
    } else {
        value
    }
}

fn should_abort(board: &Board) -> bool {
    if board.nodes > board.max_fin_cnt {
        return true;
    }
    if let Some(start) = board.start_time {
        if start.elapsed().as_secs_f64() > board.timeout_secs {
            return true;
        }
    }
    false
}

fn is_capture(board: &Board, mv: Move) -> bool {
    mv.is_en_passant() || board.piece_at(mv.to_sq()) != crate::board::types::EMPTY
}

fn killer_ply(from_root: i32) -> usize {
    (from_root.max(0) as usize).min(MAX_PLY - 1)
}

/// PV node: full-window search on the first move, null-window scouts
/// (re-searched on an alpha raise) on the rest.
pub fn alpha_beta(board: &mut Board, remaining: i32, from_root: i32, alpha: i32, beta: i32) -> i32 {
    if remaining <= 0 {
        return quiescence(board, alpha, beta, 0);
    }

    board.nodes += 1;
    if should_abort(board) {
        board.search_valid = false;
        return alpha;
    }

    if from_root > 0 && board.is_rep_draw() {
        return 0;
    }

    let (alpha, beta) = mate_distance_window(alpha, beta, from_root);
    if alpha >= beta {
        return alpha;
    }

    let hash_low = board.hash_low();
    let hash_high = board.hash_high();
    let mut hash_move = Move::NULL;
    if let Some(entry) = board.tt.probe(hash_low, hash_high) {
        hash_move = entry.best_move;
        if entry.depth >= remaining {
            let value = from_tt_value(entry.value, from_root);
            match entry.flag {
                TTFlag::Exact => return value,
                TTFlag::Alpha if value <= alpha => return value,
                TTFlag::Beta if value >= beta => return value,
                _ => {}
            }
        }
    }

    let original_alpha = alpha;
    let mut alpha = alpha;
    let ply = killer_ply(from_root);
    let mut picker = MovePicker::new(board, hash_move, ply);

    let mut best_score = MIN_EVAL;
    let mut best_move = Move::NULL;
    let mut move_count = 0usize;

    while let Some(mv) = picker.next() {
        let capture = is_capture(board, mv);
        let piece_code = board.piece_at(mv.from_sq());
        if !board.make_move(mv) {
            continue;
        }
        move_count += 1;

        let extension = check_extension(board.in_check());
        let score = if move_count == 1 {
            -alpha_beta(board, remaining - 1 + extension, from_root + 1, -beta, -alpha)
        } else {
            let scout = -all_cut_node(board, remaining - 1 + extension, from_root + 1, -alpha, true);
            if scout > alpha && scout < beta {
                -alpha_beta(board, remaining - 1 + extension, from_root + 1, -beta, -alpha)
            } else {
                scout
            }
        };
        board.unmake_move(mv);

        if !board.search_valid {
            return alpha;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            if !capture {
                board.ordering.record_cutoff(ply, piece_code, mv, remaining);
            }
            board.tt.store(
                hash_low,
                hash_high,
                to_tt_value(alpha, from_root),
                TTFlag::Beta,
                remaining,
                mv,
            );
            return alpha;
        }
    }

    if move_count == 0 {
        return if board.in_check() {
            MIN_EVAL + from_root
        } else {
            0
        };
    }

    let flag = if best_score > original_alpha { TTFlag::Exact } else { TTFlag::Alpha };
    board.tt.store(
        hash_low,
        hash_high,
        to_tt_value(best_score, from_root),
        flag,
        remaining,
        best_move,
    );
    best_score
}

/// Cut/all node: a single null-window search over `[beta-1, beta]`,
/// with razoring and null-move pruning available.
pub fn all_cut_node(board: &mut Board, remaining: i32, from_root: i32, beta: i32, allow_null: bool) -> i32 {
    let alpha = beta - 1;
    if remaining <= 0 {
        return quiescence(board, alpha, beta, 0);
    }

    board.nodes += 1;
    if should_abort(board) {
        board.search_valid = false;
        return alpha;
    }

    if from_root > 0 && board.is_rep_draw() {
        return 0;
    }

    let (alpha, beta) = mate_distance_window(alpha, beta, from_root);
    if alpha >= beta {
        return alpha;
    }

    let hash_low = board.hash_low();
    let hash_high = board.hash_high();
    let mut hash_move = Move::NULL;
    if let Some(entry) = board.tt.probe(hash_low, hash_high) {
        hash_move = entry.best_move;
        if entry.depth >= remaining {
            let value = from_tt_value(entry.value, from_root);
            match entry.flag {
                TTFlag::Exact => return value,
                TTFlag::Alpha if value <= alpha => return value,
                TTFlag::Beta if value >= beta => return value,
                _ => {}
            }
        }
    }

    let in_check = board.in_check();
    if !in_check && hash_move.is_null() {
        let static_eval = board.evaluate();
        if should_razor(remaining, false, static_eval, beta) {
            let margin = 200 * remaining;
            let razor_beta = beta - margin;
            let score = quiescence(board, razor_beta - 1, razor_beta, 0);
            if score < razor_beta {
                return score;
            }
        }
    }

    if allow_null && !in_check {
        let static_eval = board.evaluate();
        if should_try_null_move(board, remaining, beta, static_eval) {
            let r = null_move_reduction(remaining);
            let ep = board.make_null_move();
            let score = -all_cut_node(board, remaining - 1 - r, from_root + 1, -(beta - 1), false);
            board.unmake_null_move(ep);
            if board.search_valid && score >= beta {
                return score;
            }
        }
    }

    let original_alpha = alpha;
    let mut alpha = alpha;
    let ply = killer_ply(from_root);
    let mut picker = MovePicker::new(board, hash_move, ply);

    let mut best_score = MIN_EVAL;
    let mut best_move = Move::NULL;
    let mut move_count = 0usize;
    let mut quiet_count = 0usize;

    while let Some(mv) = picker.next() {
        let capture = is_capture(board, mv);
        let piece_code = board.piece_at(mv.from_sq());
        if !board.make_move(mv) {
            continue;
        }
        move_count += 1;
        if !capture {
            quiet_count += 1;
        }

        let extension = check_extension(board.in_check());
        let score = if !capture && extension == 0 {
            match lmr_reduction(remaining, quiet_count - 1) {
                Some(r) => {
                    let reduced = -all_cut_node(board, remaining - 1 - r, from_root + 1, -alpha, true);
                    if reduced > alpha {
                        -all_cut_node(board, remaining - 1, from_root + 1, -alpha, true)
                    } else {
                        reduced
                    }
                }
                None => -all_cut_node(board, remaining - 1, from_root + 1, -alpha, true),
            }
        } else {
            -all_cut_node(board, remaining - 1 + extension, from_root + 1, -alpha, true)
        };
        board.unmake_move(mv);

        if !board.search_valid {
            return alpha;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            if !capture {
                board.ordering.record_cutoff(ply, piece_code, mv, remaining);
            }
            board.tt.store(
                hash_low,
                hash_high,
                to_tt_value(alpha, from_root),
                TTFlag::Beta,
                remaining,
                mv,
            );
            return alpha;
        }
    }

    if move_count == 0 {
        return if in_check { MIN_EVAL + from_root } else { 0 };
    }

    let flag = if best_score > original_alpha { TTFlag::Exact } else { TTFlag::Alpha };
    board.tt.store(
        hash_low,
        hash_high,
        to_tt_value(best_score, from_root),
        flag,
        remaining,
        best_move,
    );
    best_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;

    #[test]
    fn mate_in_one_is_found() {
        // White to move, back-rank mate: Rh8#.
        let mut b = Board::from_fen("6k1/8/6K1/8/8/8/8/6R1 w - - 0 1").unwrap();
        let score = alpha_beta(&mut b, 2, 0, MIN_EVAL, MAX_EVAL);
        assert!(score >= MATE_THRESHOLD, "expected a mate score, got {score}");
    }

    #[test]
    fn startpos_search_terminates_and_stores_a_move() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        let score = alpha_beta(&mut b, 3, 0, MIN_EVAL, MAX_EVAL);
        assert!(score.abs() < MATE_THRESHOLD);
        let entry = b.tt.probe(b.hash_low(), b.hash_high()).expect("root stored");
        assert!(!entry.best_move.is_null());
    }

    #[test]
    fn search_does_not_leave_board_mutated() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        let before = b.squares;
        let _ = alpha_beta(&mut b, 3, 0, MIN_EVAL, MAX_EVAL);
        assert_eq!(b.squares, before);
    }

    #[test]
    fn node_budget_aborts_search() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        b.max_fin_cnt = 1;
        let _ = alpha_beta(&mut b, 6, 0, MIN_EVAL, MAX_EVAL);
        assert!(!b.search_valid);
    }
}

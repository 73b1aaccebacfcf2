//! The move picker: a staged, lazy best-first iterator over a position's
//! moves. Stages, in order: hash move, winning/equal captures (MVV-LVA,
//! SEE-filtered), killer 1, killer 2, quiet moves ordered by history,
//! deferred losing captures, end.
//!
//! A dedicated picker type holds a generated-and-ordered move buffer
//! plus a cursor, shaped around these exact seven stages and a
//! "selection sort, one pick per call" picking rule rather than a
//! captures-then-quiets two-bucket sort.

use crate::board::state::Board;
use crate::board::types::{piece_type, Move, MoveList};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Hash,
    Captures,
    Killer1,
    Killer2,
    Quiets,
    LosingCaptures,
    Done,
}

/// MVV-LVA score for a capture: `(victim << 5) - attacker`, per spec
/// glossary. En-passant captures a pawn regardless of the flag's target
/// square contents.
pub(crate) fn mvv_lva_score(board: &Board, mv: Move) -> i32 {
    let attacker = piece_type(board.piece_at(mv.from_sq()));
    let victim = if mv.is_en_passant() {
        crate::board::types::PAWN
    } else {
        piece_type(board.piece_at(mv.to_sq()))
    };
    ((victim as i32) << 5) - attacker as i32
}

/// Pick and remove the highest-scoring entry, scanning the whole
/// remaining slice each call: selection sort, one pick per call.
fn pick_best(scored: &mut Vec<(Move, i32)>) -> Option<Move> {
    if scored.is_empty() {
        return None;
    }
    let mut best_idx = 0;
    for i in 1..scored.len() {
        if scored[i].1 > scored[best_idx].1 {
            best_idx = i;
        }
    }
    Some(scored.swap_remove(best_idx).0)
}

pub struct MovePicker {
    stage: Stage,
    hash_move: Move,
    killer1: Move,
    killer2: Move,
    winning_captures: Vec<(Move, i32)>,
    losing_captures: Vec<(Move, i32)>,
    quiets: Vec<(Move, i32)>,
}

impl MovePicker {
    /// Build a picker for the current position: generates captures and
    /// quiets once, validates the hash move and both killers against
    /// them, and buckets captures into winning/equal (SEE >= 0) versus
    /// losing.
    #[must_use]
    pub fn new(board: &Board, hash_move: Move, ply: usize) -> Self {
        let mut captures = MoveList::new();
        board.generate_captures(&mut captures);
        let mut quiets = MoveList::new();
        board.generate_quiets(&mut quiets);

        let hash_move = if captures.contains(hash_move) || quiets.contains(hash_move) {
            hash_move
        } else {
            Move::NULL
        };

        let raw_killer1 = board.ordering.killer(ply, 0);
        let killer1 = if raw_killer1 != hash_move && quiets.contains(raw_killer1) {
            raw_killer1
        } else {
            Move::NULL
        };
        let raw_killer2 = board.ordering.killer(ply, 1);
        let killer2 = if raw_killer2 != hash_move && raw_killer2 != killer1 && quiets.contains(raw_killer2)
        {
            raw_killer2
        } else {
            Move::NULL
        };

        let mut winning_captures = Vec::with_capacity(captures.len());
        let mut losing_captures = Vec::with_capacity(4);
        for &mv in captures.iter() {
            if mv == hash_move {
                continue;
            }
            let score = mvv_lva_score(board, mv);
            if board.see_is_non_negative(mv) {
                winning_captures.push((mv, score));
            } else {
                losing_captures.push((mv, score));
            }
        }
        losing_captures.sort_by(|a, b| b.1.cmp(&a.1));

        let mut quiet_moves = Vec::with_capacity(quiets.len());
        for &mv in quiets.iter() {
            if mv == hash_move || mv == killer1 || mv == killer2 {
                continue;
            }
            let piece_code = board.piece_at(mv.from_sq());
            let score = board.ordering.history_score(piece_code, mv.to_sq().0);
            quiet_moves.push((mv, score));
        }

        MovePicker {
            stage: Stage::Hash,
            hash_move,
            killer1,
            killer2,
            winning_captures,
            losing_captures,
            quiets: quiet_moves,
        }
    }

    /// Advance to the next move, or `None` once every stage is exhausted.
    pub fn next(&mut self) -> Option<Move> {
        loop {
            match self.stage {
                Stage::Hash => {
                    self.stage = Stage::Captures;
                    if !self.hash_move.is_null() {
                        return Some(self.hash_move);
                    }
                }
                Stage::Captures => {
                    if let Some(mv) = pick_best(&mut self.winning_captures) {
                        return Some(mv);
                    }
                    self.stage = Stage::Killer1;
                }
                Stage::Killer1 => {
                    self.stage = Stage::Killer2;
                    if !self.killer1.is_null() {
                        return Some(self.killer1);
                    }
                }
                Stage::Killer2 => {
                    self.stage = Stage::Quiets;
                    if !self.killer2.is_null() {
                        return Some(self.killer2);
                    }
                }
                Stage::Quiets => {
                    if let Some(mv) = pick_best(&mut self.quiets) {
                        return Some(mv);
                    }
                    self.stage = Stage::LosingCaptures;
                }
                Stage::LosingCaptures => {
                    if let Some((mv, _)) = self.losing_captures.pop() {
                        return Some(mv);
                    }
                    self.stage = Stage::Done;
                }
                Stage::Done => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;
    use crate::board::state::Board;

    #[test]
    fn picker_visits_every_legal_move_exactly_once_from_startpos() {
        let mut board = Board::from_fen(STARTPOS_FEN).unwrap();
        let legal = board.generate_valid_moves();
        let mut picker = MovePicker::new(&board, Move::NULL, 0);
        let mut seen = Vec::new();
        while let Some(mv) = picker.next() {
            seen.push(mv);
        }
        assert_eq!(seen.len(), legal.len());
        for mv in legal.iter() {
            assert!(seen.contains(mv));
        }
    }

    #[test]
    fn hash_move_comes_first_and_is_not_repeated() {
        let board = Board::from_fen(STARTPOS_FEN).unwrap();
        let mut list = MoveList::new();
        board.generate_quiets(&mut list);
        let hash_move = *list.as_slice().first().unwrap();
        let mut picker = MovePicker::new(&board, hash_move, 0);
        assert_eq!(picker.next(), Some(hash_move));
        let mut later_count = 0;
        while let Some(mv) = picker.next() {
            if mv == hash_move {
                later_count += 1;
            }
        }
        assert_eq!(later_count, 0);
    }

    #[test]
    fn losing_capture_deferred_past_quiets() {
        // White queen can take a rook defended by a knight: a losing trade,
        // so it must come after quiet moves in the picker's order.
        let board = Board::from_fen("4k3/8/8/8/3n4/3r4/8/3QK3 w - - 0 1").unwrap();
        let losing = Move::new(
            crate::board::types::Square::from_algebraic("d1").unwrap(),
            crate::board::types::Square::from_algebraic("d3").unwrap(),
            0,
        );
        let mut picker = MovePicker::new(&board, Move::NULL, 0);
        let mut order = Vec::new();
        while let Some(mv) = picker.next() {
            order.push(mv);
        }
        let losing_pos = order.iter().position(|&m| m == losing).unwrap();
        assert!(losing_pos > 0);
        assert!(!board.see_is_non_negative(losing));
    }
}

//! Material + piece-square-table + mobility evaluator, plus a small set of
//! positional adjustments.
//!
//! A single `evaluate()` entry point reads the incrementally maintained
//! material/PST sum and adds a handful of extra terms on top (mobility,
//! bishop pair). Tapered mg/eg blending, pawn-structure, and king-danger
//! terms are deliberately not modeled here.

use super::movegen::is_enemy;
use super::state::Board;
use super::tables::{MOBILITY_UNIT, PIECE_SQUARE_TABLES, SLIDER_DIRS_BISHOP, SLIDER_DIRS_ROOK};
use super::types::{
    piece_code, Color, Square, BISHOP, EMPTY, KING, KNIGHT, OFFBOARD, QUEEN, ROOK,
};

const BISHOP_PAIR_BONUS: i32 = 500;

impl Board {
    fn slider_steps(&self, from: Square, color: Color, dirs: &[i32]) -> i32 {
        let mut total = 0i32;
        for &dir in dirs {
            let mut pos = from.0 as i32 + dir;
            loop {
                let sq = Square(pos as u8);
                if !sq.is_on_board() {
                    break;
                }
                let byte = self.squares[sq.0 as usize];
                if byte == EMPTY {
                    total += 1;
                    pos += dir;
                    continue;
                }
                if is_enemy(byte, color) {
                    total += 1;
                }
                break;
            }
        }
        total
    }

    fn unit_steps(&self, from: Square, color: Color, offsets: &[i32]) -> i32 {
        let idx = color.index();
        let mut total = 0i32;
        for &delta in offsets {
            let to = Square((from.0 as i32 + delta) as u8);
            let byte = if to.is_on_board() {
                self.squares[to.0 as usize]
            } else {
                OFFBOARD
            };
            total += MOBILITY_UNIT[idx][byte as usize] as i32;
        }
        total
    }

    /// Mobility term for one color: per-piece-type step counts, each
    /// offset then scaled, summed across the four mobile piece types.
    fn mobility_score(&self, color: Color) -> i32 {
        let mut knight_steps = 0i32;
        for &sq in self.piece_squares(color, KNIGHT) {
            knight_steps += self.unit_steps(Square(sq), color, &super::tables::KNIGHT_OFFSETS);
        }
        let mut bishop_steps = 0i32;
        for &sq in self.piece_squares(color, BISHOP) {
            bishop_steps += self.slider_steps(Square(sq), color, &SLIDER_DIRS_BISHOP);
        }
        let mut rook_steps = 0i32;
        for &sq in self.piece_squares(color, ROOK) {
            rook_steps += self.slider_steps(Square(sq), color, &SLIDER_DIRS_ROOK);
        }
        let mut queen_steps = 0i32;
        for &sq in self.piece_squares(color, QUEEN) {
            queen_steps += self.slider_steps(Square(sq), color, &SLIDER_DIRS_ROOK);
            queen_steps += self.slider_steps(Square(sq), color, &SLIDER_DIRS_BISHOP);
        }

        (knight_steps - 3) * 65 + (bishop_steps - 4) * 50 + (rook_steps - 4) * 25 + (queen_steps - 2) * 22
    }

    fn king_pst(&self, color: Color) -> i32 {
        let sq = self.king_square(color);
        let table = &PIECE_SQUARE_TABLES[KING as usize];
        match color {
            Color::White => table[sq.0 as usize],
            Color::Black => table[super::tables::FLIP_TABLE[sq.0 as usize] as usize],
        }
    }

    /// Evaluate the current position, always from the perspective of the
    /// side to move.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        // `material_pst` is always white-relative; build the rest of the
        // score white-relative too and negate at the very end, matching
        // `base_eval()`'s own convention.
        let mut score = self.material_pst;

        score += self.mobility_score(Color::White) - self.mobility_score(Color::Black);

        let white_bishops = self.piece_count[piece_code(Color::White, BISHOP) as usize];
        let black_bishops = self.piece_count[piece_code(Color::Black, BISHOP) as usize];
        if white_bishops >= 2 {
            score += BISHOP_PAIR_BONUS;
        }
        if black_bishops >= 2 {
            score -= BISHOP_PAIR_BONUS;
        }

        // King safety relaxation: with the opposing queen off, add the
        // king's own PST back in (it already counted once incrementally),
        // letting an active king be valued without the usual penalty.
        let white_queens = self.piece_count[piece_code(Color::White, QUEEN) as usize];
        let black_queens = self.piece_count[piece_code(Color::Black, QUEEN) as usize];
        if black_queens == 0 {
            score += self.king_pst(Color::White);
        }
        if white_queens == 0 {
            score -= self.king_pst(Color::Black);
        }

        match self.side_to_move {
            Color::White => score,
            Color::Black => -score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;

    #[test]
    fn startpos_eval_is_small() {
        let board = Board::from_fen(STARTPOS_FEN).unwrap();
        // Symmetric position: mobility and material both cancel.
        assert_eq!(board.evaluate(), 0);
    }

    #[test]
    fn evaluate_is_side_relative() {
        // An extra white queen should be large and positive for White to
        // move, and equally negative if it were Black to move instead.
        let white_up =
            Board::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
        assert!(white_up.evaluate() > 5000);

        let black_up =
            Board::from_fen("3qk3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert!(black_up.evaluate() > 5000);
    }

    #[test]
    fn bishop_pair_bonus_applied() {
        let with_pair = Board::from_fen("4k3/8/8/8/8/8/8/2B1KB2 w - - 0 1").unwrap();
        let without_pair = Board::from_fen("4k3/8/8/8/8/8/8/3NKB2 w - - 0 1").unwrap();
        // Swapping a bishop for a knight of equal material drops the pair bonus.
        assert!(with_pair.evaluate() > without_pair.evaluate());
    }

    #[test]
    fn evaluation_symmetry_under_mirror() {
        let board = Board::from_fen(
            "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3",
        )
        .unwrap();
        let mirrored = Board::from_fen(
            "rnbqkb1r/pppp1ppp/5n2/4p3/4P3/2N5/PPPP1PPP/R1BQKBNR b KQkq - 2 3",
        )
        .unwrap();
        assert_eq!(board.evaluate(), mirrored.evaluate());
    }
}

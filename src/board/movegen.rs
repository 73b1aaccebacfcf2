//! Pseudo-legal move generation: captures and quiet moves are produced
//! separately into a caller-owned `MoveList` by walking each piece type's
//! piece list, not by scanning the board.
//!
//! Capture and quiet generators are split, and both walk 0x88 rays rather
//! than magic-bitboard attack sets.

use super::state::Board;
use super::tables::{KNIGHT_OFFSETS, SLIDER_DIRS_BISHOP, SLIDER_DIRS_ROOK};
use super::types::{
    piece_color_mask, Color, Move, MoveList, Square, BISHOP, CASTLE_BLACK_K, CASTLE_BLACK_Q,
    CASTLE_WHITE_K, CASTLE_WHITE_Q, EMPTY, KING, KNIGHT, OFFBOARD, PAWN, PROMOTION_PIECES, QUEEN,
    ROOK,
};

pub(crate) fn is_enemy(byte: u8, color: Color) -> bool {
    byte != EMPTY && byte != OFFBOARD && piece_color_mask(byte) == color.opposite().mask()
}

impl Board {
    fn push_pawn_moves(&self, list: &mut MoveList, from: Square, color: Color, captures_only: bool) {
        let dir: i32 = if color == Color::White { 16 } else { -16 };
        let start_rank = if color == Color::White { 1 } else { 6 };
        let promo_rank = if color == Color::White { 7 } else { 0 };

        let push_one = |list: &mut MoveList, to: Square| {
            if to.rank() == promo_rank {
                for &p in &PROMOTION_PIECES {
                    list.push(Move::new(from, to, Move::promotion_flag(p)));
                }
            } else {
                list.push(Move::new(from, to, 0));
            }
        };

        if !captures_only {
            let one = Square((from.0 as i32 + dir) as u8);
            if one.is_on_board() && self.squares[one.0 as usize] == EMPTY {
                push_one(list, one);
                if from.rank() == start_rank {
                    let two = Square((from.0 as i32 + 2 * dir) as u8);
                    if self.squares[two.0 as usize] == EMPTY {
                        list.push(Move::new(from, two, 0));
                    }
                }
            }
            return;
        }

        for &df in &[15i32, 17] {
            let delta = if color == Color::White { df } else { -df };
            let to = Square((from.0 as i32 + delta) as u8);
            if !to.is_on_board() {
                continue;
            }
            let byte = self.squares[to.0 as usize];
            if is_enemy(byte, color) {
                push_one(list, to);
            } else if Some(to) == self.ep_square {
                list.push(Move::new(from, to, super::types::FLAG_EN_PASSANT));
            }
        }
    }

    fn push_knight_moves(&self, list: &mut MoveList, from: Square, color: Color, captures_only: bool) {
        for &delta in &KNIGHT_OFFSETS {
            let to = Square((from.0 as i32 + delta) as u8);
            if !to.is_on_board() {
                continue;
            }
            let byte = self.squares[to.0 as usize];
            if byte == EMPTY {
                if !captures_only {
                    list.push(Move::new(from, to, 0));
                }
            } else if is_enemy(byte, color) {
                list.push(Move::new(from, to, 0));
            }
        }
    }

    fn push_slider_moves(
        &self,
        list: &mut MoveList,
        from: Square,
        color: Color,
        dirs: &[i32],
        captures_only: bool,
    ) {
        for &dir in dirs {
            let mut pos = from.0 as i32 + dir;
            loop {
                let to = Square(pos as u8);
                if !to.is_on_board() {
                    break;
                }
                let byte = self.squares[to.0 as usize];
                if byte == EMPTY {
                    if !captures_only {
                        list.push(Move::new(from, to, 0));
                    }
                } else {
                    if is_enemy(byte, color) {
                        list.push(Move::new(from, to, 0));
                    }
                    break;
                }
                pos += dir;
            }
        }
    }

    fn push_king_moves(&self, list: &mut MoveList, from: Square, color: Color, captures_only: bool) {
        for &dir in SLIDER_DIRS_ROOK.iter().chain(SLIDER_DIRS_BISHOP.iter()) {
            let to = Square((from.0 as i32 + dir) as u8);
            if !to.is_on_board() {
                continue;
            }
            let byte = self.squares[to.0 as usize];
            if byte == EMPTY {
                if !captures_only {
                    list.push(Move::new(from, to, 0));
                }
            } else if is_enemy(byte, color) {
                list.push(Move::new(from, to, 0));
            }
        }

        if captures_only || self.in_check {
            return;
        }
        let rank = if color == Color::White { 0u8 } else { 7u8 };
        let (king_bit, queen_bit) = match color {
            Color::White => (CASTLE_WHITE_K, CASTLE_WHITE_Q),
            Color::Black => (CASTLE_BLACK_K, CASTLE_BLACK_Q),
        };
        if self.castling.has(king_bit) {
            let f = Square::from_rank_file(rank, 5);
            let g = Square::from_rank_file(rank, 6);
            if self.squares[f.0 as usize] == EMPTY && self.squares[g.0 as usize] == EMPTY {
                list.push(Move::new(from, g, super::types::FLAG_CASTLE_KING));
            }
        }
        if self.castling.has(queen_bit) {
            let d = Square::from_rank_file(rank, 3);
            let c = Square::from_rank_file(rank, 2);
            let b = Square::from_rank_file(rank, 1);
            if self.squares[d.0 as usize] == EMPTY
                && self.squares[c.0 as usize] == EMPTY
                && self.squares[b.0 as usize] == EMPTY
            {
                list.push(Move::new(from, c, super::types::FLAG_CASTLE_QUEEN));
            }
        }
    }

    fn generate_for_piece(&self, list: &mut MoveList, color: Color, piece: u8, captures_only: bool) {
        let squares: Vec<u8> = self.piece_squares(color, piece).to_vec();
        for sq in squares {
            let from = Square(sq);
            match piece {
                PAWN => self.push_pawn_moves(list, from, color, captures_only),
                KNIGHT => self.push_knight_moves(list, from, color, captures_only),
                BISHOP => self.push_slider_moves(list, from, color, &SLIDER_DIRS_BISHOP, captures_only),
                ROOK => self.push_slider_moves(list, from, color, &SLIDER_DIRS_ROOK, captures_only),
                QUEEN => {
                    self.push_slider_moves(list, from, color, &SLIDER_DIRS_ROOK, captures_only);
                    self.push_slider_moves(list, from, color, &SLIDER_DIRS_BISHOP, captures_only);
                }
                KING => self.push_king_moves(list, from, color, captures_only),
                _ => unreachable!(),
            }
        }
    }

    /// Pseudo-legal captures (and promotions, and en-passant) for the side
    /// to move.
    pub fn generate_captures(&self, list: &mut MoveList) {
        let color = self.side_to_move;
        for &piece in &[PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING] {
            self.generate_for_piece(list, color, piece, true);
        }
    }

    /// Pseudo-legal quiet (non-capturing) moves, including castling, for
    /// the side to move.
    pub fn generate_quiets(&self, list: &mut MoveList) {
        let color = self.side_to_move;
        for &piece in &[PAWN, KNIGHT, BISHOP, ROOK, QUEEN, KING] {
            self.generate_for_piece(list, color, piece, false);
        }
    }

    /// All pseudo-legal moves (captures then quiets).
    pub fn generate_pseudo_legal(&self, list: &mut MoveList) {
        self.generate_captures(list);
        self.generate_quiets(list);
    }

    /// Strict legal move list: pseudo-legal moves filtered by attempting
    /// `make_move`/`unmake_move`. Used by
    /// external callers; internal search relies on the picker plus
    /// make/unmake's self-rewinding semantics instead.
    #[must_use]
    pub fn generate_valid_moves(&mut self) -> MoveList {
        let mut pseudo = MoveList::new();
        self.generate_pseudo_legal(&mut pseudo);
        let mut legal = MoveList::new();
        for &mv in pseudo.iter() {
            if self.make_move(mv) {
                self.unmake_move(mv);
                legal.push(mv);
            }
        }
        legal
    }

    /// perft node count at `depth`, for test/benchmark use.
    #[must_use]
    pub fn perft(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let mut pseudo = MoveList::new();
        self.generate_pseudo_legal(&mut pseudo);
        let mut nodes = 0u64;
        for &mv in pseudo.iter() {
            if self.make_move(mv) {
                nodes += self.perft(depth - 1);
                self.unmake_move(mv);
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;

    #[test]
    fn startpos_has_20_legal_moves() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(b.generate_valid_moves().len(), 20);
    }

    #[test]
    fn perft_depth_3_startpos() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        assert_eq!(b.perft(3), 8902);
    }

    #[test]
    fn promotion_generates_four_moves() {
        let mut b = Board::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let moves = b.generate_valid_moves();
        let a8 = Square::from_rank_file(7, 0);
        let count = moves.iter().filter(|m| m.to_sq() == a8).count();
        assert_eq!(count, 4);
    }

    #[test]
    fn captures_and_quiets_are_disjoint_for_pawns() {
        // Black pawn on d4 can capture White's pawn on e3 (diagonal) or
        // push straight to d3 (quiet); each must appear in exactly one
        // of the two generators, never both.
        let b = Board::from_fen("4k3/8/8/8/3p4/4P3/8/4K3 b - - 0 1").unwrap();
        let mut captures = MoveList::new();
        b.generate_captures(&mut captures);
        let mut quiets = MoveList::new();
        b.generate_quiets(&mut quiets);
        let e3 = Square::from_rank_file(2, 4);
        assert_eq!(captures.iter().filter(|m| m.to_sq() == e3).count(), 1);
        assert_eq!(quiets.iter().filter(|m| m.to_sq() == e3).count(), 0);
        let d3 = Square::from_rank_file(2, 3);
        assert_eq!(quiets.iter().filter(|m| m.to_sq() == d3).count(), 1);
        assert_eq!(captures.iter().filter(|m| m.to_sq() == d3).count(), 0);
    }

    #[test]
    fn perft_depth_4_kiwipete_matches_known_value() {
        let mut b = Board::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .unwrap();
        assert_eq!(b.perft(3), 97862);
    }
}

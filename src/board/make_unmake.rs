//! Incremental make/unmake. `make_move` updates the board, piece lists,
//! Zobrist key, incremental eval, castling rights, en-passant square,
//! 50-move counter, repetition stack, and check flag in place; it
//! reports failure and self-rewinds if the move leaves the mover's own
//! king in check or castles through an attacked square.
//!
//! Undo-stack plus scalar restore pattern, built around the 0x88
//! piece-list incremental update helpers in `state.rs` rather than
//! bitboard XORs.

use super::state::{Board, UndoInfo};
use super::types::{
    piece_color_mask, piece_type, CastlingRights, Color, Move, Square, CASTLE_BLACK_K,
    CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q, EMPTY, KING, PAWN, ROOK,
};

pub(crate) fn pawn_forward_step(color: Color) -> i32 {
    match color {
        Color::White => 16,
        Color::Black => -16,
    }
}

fn castle_rook_squares(color: Color, kingside: bool) -> (Square, Square) {
    let rank = if color == Color::White { 0 } else { 7 };
    if kingside {
        (Square::from_rank_file(rank, 7), Square::from_rank_file(rank, 5))
    } else {
        (Square::from_rank_file(rank, 0), Square::from_rank_file(rank, 3))
    }
}

/// The AND-mask applied to `castling` for a given square touched by a
/// move (either end): moving the king or a rook off its home square, or
/// capturing a rook on its home square, clears the corresponding right.
fn castle_clear_mask(sq: Square) -> u8 {
    let e1 = Square::from_rank_file(0, 4);
    let a1 = Square::from_rank_file(0, 0);
    let h1 = Square::from_rank_file(0, 7);
    let e8 = Square::from_rank_file(7, 4);
    let a8 = Square::from_rank_file(7, 0);
    let h8 = Square::from_rank_file(7, 7);
    match sq {
        s if s == e1 => !(CASTLE_WHITE_K | CASTLE_WHITE_Q),
        s if s == a1 => !CASTLE_WHITE_Q,
        s if s == h1 => !CASTLE_WHITE_K,
        s if s == e8 => !(CASTLE_BLACK_K | CASTLE_BLACK_Q),
        s if s == a8 => !CASTLE_BLACK_Q,
        s if s == h8 => !CASTLE_BLACK_K,
        _ => 0xff,
    }
}

impl Board {
    /// Attempt to play `mv`. Returns `false` (and leaves the board
    /// untouched, or fully rewound) if the move is illegal — own king
    /// left in check, or castling through/out of/into an attacked square.
    pub fn make_move(&mut self, mv: Move) -> bool {
        let from = mv.from_sq();
        let to = mv.to_sq();
        let color = self.side_to_move;
        let opponent = color.opposite();

        if mv.is_castle() {
            let king_mid = Square(((from.0 as u16 + to.0 as u16) / 2) as u8);
            if self.is_square_attackable(from, opponent) || self.is_square_attackable(king_mid, opponent)
            {
                return false;
            }
        }

        let mover_byte = self.squares[from.0 as usize];
        let mover_piece = piece_type(mover_byte);
        let is_ep = mv.is_en_passant();
        let captured_sq = if is_ep {
            Square((to.0 as i32 - pawn_forward_step(color)) as u8)
        } else {
            to
        };
        let captured_before = self.squares[captured_sq.0 as usize];

        self.undo_stack.push(UndoInfo {
            mv,
            mover_piece: mover_byte,
            ep_square: self.ep_square,
            castling: self.castling,
            in_check: self.in_check,
            material_pst: self.material_pst,
            hash_low: self.hash_low,
            hash_high: self.hash_high,
            move50: self.move50,
            captured: captured_before,
            captured_sq,
        });

        self.ep_square = None;

        if is_ep {
            self.remove_piece(captured_sq);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(color, mv.is_castle_king());
            self.remove_piece(rook_from);
            self.add_piece(rook_to, color, ROOK);
        } else if captured_before != EMPTY {
            self.remove_piece(to);
        }

        let resets_fifty = mover_piece == PAWN || captured_before != EMPTY;
        if mover_piece == PAWN {
            let step = to.0 as i32 - from.0 as i32;
            if step.abs() == 32 {
                self.ep_square = Some(Square((from.0 as i32 + step / 2) as u8));
            }
        }

        self.castling.0 &= castle_clear_mask(from) & castle_clear_mask(to);

        self.remove_piece(from);
        if let Some(promo) = mv.promotion_piece() {
            self.add_piece(to, color, promo);
        } else {
            self.add_piece(to, color, mover_piece);
        }

        self.move50 = if resets_fifty { 0 } else { self.move50 + 1 };

        self.apply_flip_side();
        self.push_repetition();
        self.moves_made += 1;

        let own_king = self.king_square[color.index()];
        // If the king was already in check before this move, a narrow
        // "did this move uncover a NEW attack" test is not enough — the
        // old checking piece might be untouched by this move entirely.
        // Fast path only applies when nothing was attacking the king
        // beforehand.
        let illegal = if self.undo_stack.last().unwrap().in_check {
            self.is_square_attackable(own_king, opponent)
        } else if mover_piece == KING {
            self.is_square_attackable(own_king, opponent)
        } else {
            self.exposes_check(from, own_king, color)
                || (is_ep && self.exposes_check(captured_sq, own_king, color))
        };
        if illegal {
            self.unmake_move(mv);
            return false;
        }

        let opp_king = self.king_square[opponent.index()];
        let mut gives_check = self.is_square_attackable_from(opp_king, to)
            || self.exposes_check(from, opp_king, color)
            || (is_ep && self.exposes_check(captured_sq, opp_king, color));
        if mv.is_castle() {
            let (_, rook_to) = castle_rook_squares(color, mv.is_castle_king());
            gives_check = gives_check || self.is_square_attackable_from(opp_king, rook_to);
        }
        self.in_check = gives_check;

        true
    }

    /// Exact mechanical inverse of `make_move`.
    pub fn unmake_move(&mut self, mv: Move) {
        let undo = self.undo_stack.pop().expect("unmake without make");
        self.pop_repetition();
        self.moves_made -= 1;

        let color = self.side_to_move.opposite();
        self.side_to_move = color;

        let from = mv.from_sq();
        let to = mv.to_sq();

        if let Some(_promo) = mv.promotion_piece() {
            self.remove_piece(to);
            self.add_piece(from, color, PAWN);
        } else {
            let piece = piece_type(self.squares[to.0 as usize]);
            self.remove_piece(to);
            self.add_piece(from, color, piece);
        }

        if mv.is_castle() {
            let (rook_from, rook_to) = castle_rook_squares(color, mv.is_castle_king());
            self.remove_piece(rook_to);
            self.add_piece(rook_from, color, ROOK);
        }

        if undo.captured != EMPTY {
            let cap_color =
                Color::from_mask(piece_color_mask(undo.captured)).expect("valid captured byte");
            let cap_piece = piece_type(undo.captured);
            self.add_piece(undo.captured_sq, cap_color, cap_piece);
        }

        self.ep_square = undo.ep_square;
        self.castling = undo.castling;
        self.in_check = undo.in_check;
        self.material_pst = undo.material_pst;
        self.hash_low = undo.hash_low;
        self.hash_high = undo.hash_high;
        self.move50 = undo.move50;
    }

    /// Play a null move (flip side to move only, used by null-move
    /// pruning). Returns the undo token to pass to `unmake_null`.
    pub(crate) fn make_null_move(&mut self) -> Option<Square> {
        let ep = self.ep_square;
        self.ep_square = None;
        self.apply_flip_side();
        ep
    }

    pub(crate) fn unmake_null_move(&mut self, ep: Option<Square>) {
        self.apply_flip_side();
        self.ep_square = ep;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fen::STARTPOS_FEN;

    #[test]
    fn make_unmake_restores_everything() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        let before_squares = b.squares;
        let before_hash = (b.hash_low, b.hash_high);
        let before_material = b.material_pst;

        let mv = Move::new(
            Square::from_rank_file(1, 4),
            Square::from_rank_file(3, 4),
            0,
        );
        assert!(b.make_move(mv));
        assert_ne!(b.squares, before_squares);
        b.unmake_move(mv);

        assert_eq!(b.squares, before_squares);
        assert_eq!((b.hash_low, b.hash_high), before_hash);
        assert_eq!(b.material_pst, before_material);
        assert_eq!(b.side_to_move, Color::White);
    }

    #[test]
    fn incremental_hash_matches_recomputed() {
        let mut b = Board::from_fen(STARTPOS_FEN).unwrap();
        for uci in ["e2e4", "e7e5", "g1f3", "b8c6"] {
            let mv = b.parse_move(uci).expect("legal move");
            assert!(b.make_move(mv));
        }
        let (low, high) = b.recompute_hash();
        assert_eq!(low, b.hash_low);
        assert_eq!(high, b.hash_high);
    }

    #[test]
    fn en_passant_capture_removes_pawn_behind_target() {
        let mut b = Board::from_fen("4k3/8/8/8/Pp6/8/8/4K3 b - a3 0 1").unwrap();
        let mv = Move::new(
            Square::from_rank_file(3, 1),
            Square::from_rank_file(2, 0),
            super::super::types::FLAG_EN_PASSANT,
        );
        assert!(b.make_move(mv));
        assert_eq!(b.squares[Square::from_rank_file(3, 0).0 as usize], EMPTY);
        b.unmake_move(mv);
        assert_ne!(b.squares[Square::from_rank_file(3, 0).0 as usize], EMPTY);
    }

    #[test]
    fn illegal_move_self_rewinds() {
        let mut b = Board::from_fen("4k3/8/8/8/8/8/4r3/4K3 w - - 0 1").unwrap();
        // King can't step to e2, still attacked by the rook on e2's file.
        let mv = Move::new(
            Square::from_rank_file(0, 4),
            Square::from_rank_file(1, 4),
            0,
        );
        let before = b.squares;
        assert!(!b.make_move(mv));
        assert_eq!(b.squares, before);
        assert_eq!(b.undo_stack.len(), 0);
    }
}

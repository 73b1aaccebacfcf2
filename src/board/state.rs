//! The per-game `Board`: 0x88 board array, piece lists with reverse
//! index, incremental Zobrist hash and material/PST eval,
//! castling/en-passant/check status, move-undo stack, repetition
//! history, killer/history ordering tables, transposition table, and the
//! cooperative search bookkeeping fields.
//!
//! The one mutable struct everything else operates on, built around 0x88
//! board squares plus piece lists rather than bitboards.

use once_cell::sync::Lazy;

use crate::board::tables::{FLIP_TABLE, PIECE_SQUARE_TABLES};
use crate::board::types::{
    piece_code, piece_color_mask, piece_type, CastlingRights, Color, Move, Square, BISHOP, KING,
    KNIGHT, MAX_PLY, OFFBOARD, PAWN, PIECE_CODES, QUEEN, ROOK, EMPTY,
};
use crate::ordering::OrderingTables;
use crate::tt::TranspositionTable;
use crate::zobrist::Zobrist;

pub(crate) static ZOBRIST: Lazy<Zobrist> = Lazy::new(Zobrist::generate);

/// One entry of the move-undo stack: everything needed to mechanically
/// reverse a `make_move` call.
#[derive(Clone, Copy, Debug)]
pub struct UndoInfo {
    pub mv: Move,
    pub mover_piece: u8,
    pub ep_square: Option<Square>,
    pub castling: CastlingRights,
    pub in_check: bool,
    pub material_pst: i32,
    pub hash_low: u32,
    pub hash_high: u32,
    pub move50: u32,
    pub captured: u8,
    pub captured_sq: Square,
}

pub struct Board {
    pub(crate) squares: [u8; 256],
    pub(crate) piece_list: [u8; PIECE_CODES * 16],
    pub(crate) piece_count: [u8; PIECE_CODES],
    pub(crate) piece_index: [u8; 256],
    pub(crate) king_square: [Square; 2],

    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_square: Option<Square>,

    /// Always white-relative (white material+PST minus black's); a
    /// side-to-move-relative view is derived from this at read time via
    /// `base_eval()`, which flips sign exactly when `side_to_move` flips
    /// — i.e. every ply.
    pub(crate) material_pst: i32,
    pub(crate) hash_low: u32,
    pub(crate) hash_high: u32,
    pub(crate) in_check: bool,
    pub(crate) move50: u32,

    pub(crate) undo_stack: Vec<UndoInfo>,
    pub(crate) rep_stack: Vec<u32>,

    pub(crate) ordering: OrderingTables,
    pub(crate) tt: TranspositionTable,

    pub nodes: u64,
    /// Current search-stack depth: +1 on `make_move`, -1 on `unmake_move`.
    /// Mirrors `undo_stack.len()`, not a cumulative count; the node budget
    /// is tracked separately by `nodes`, which is monotonic.
    pub moves_made: u64,
    pub max_fin_cnt: u64,
    pub timeout_secs: f64,
    pub(crate) start_time: Option<std::time::Instant>,
    pub search_valid: bool,
    pub foundmove: Move,
}

impl Board {
    /// Create a blank state: off-board sentinel in the ring squares,
    /// empty play squares, default `timeout = 5`, `max_fin_cnt = 20000`.
    #[must_use]
    pub fn empty() -> Self {
        let mut squares = [OFFBOARD; 256];
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let sq = Square::from_rank_file(rank, file);
                squares[sq.0 as usize] = EMPTY;
            }
        }
        Board {
            squares,
            piece_list: [0u8; PIECE_CODES * 16],
            piece_count: [0u8; PIECE_CODES],
            piece_index: [0u8; 256],
            king_square: [Square(0), Square(0)],
            side_to_move: Color::White,
            castling: CastlingRights::none(),
            ep_square: None,
            material_pst: 0,
            hash_low: 0,
            hash_high: 0,
            in_check: false,
            move50: 0,
            undo_stack: Vec::with_capacity(MAX_PLY * 2),
            rep_stack: Vec::with_capacity(256),
            ordering: OrderingTables::new(),
            tt: TranspositionTable::new(),
            nodes: 0,
            moves_made: 0,
            max_fin_cnt: 20_000,
            timeout_secs: 5.0,
            start_time: None,
            search_valid: true,
            foundmove: Move::NULL,
        }
    }

    /// Convenience constructor: the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_fen(crate::board::fen::STARTPOS_FEN).expect("startpos FEN is well-formed")
    }

    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[must_use]
    pub fn piece_at(&self, sq: Square) -> u8 {
        self.squares[sq.0 as usize]
    }

    #[must_use]
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.ep_square
    }

    #[must_use]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_square[color.index()]
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.move50
    }

    /// Current move-undo stack depth: how many `make_move` calls are
    /// outstanding without a matching `unmake_move`.
    #[must_use]
    pub fn undo_stack_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Side-to-move-relative material + PST.
    #[must_use]
    pub fn base_eval(&self) -> i32 {
        match self.side_to_move {
            Color::White => self.material_pst,
            Color::Black => -self.material_pst,
        }
    }

    #[must_use]
    pub fn hash_low(&self) -> u32 {
        self.hash_low
    }

    #[must_use]
    pub fn hash_high(&self) -> u32 {
        self.hash_high
    }

    /// Piece-list iteration used by the move generator and evaluator:
    /// all squares currently holding `color`'s `piece` type.
    #[must_use]
    pub(crate) fn piece_squares(&self, color: Color, piece: u8) -> &[u8] {
        let code = piece_code(color, piece) as usize;
        let count = self.piece_count[code] as usize;
        &self.piece_list[code * 16..code * 16 + count]
    }

    fn pst_value(piece: u8, color: Color, sq: Square) -> i32 {
        let table = &PIECE_SQUARE_TABLES[piece as usize];
        match color {
            Color::White => table[sq.0 as usize],
            Color::Black => table[FLIP_TABLE[sq.0 as usize] as usize],
        }
    }

    /// Place a piece on an empty square, updating the piece list,
    /// incremental hash, incremental eval, and king-square cache.
    pub(crate) fn add_piece(&mut self, sq: Square, color: Color, piece: u8) {
        let byte = piece_code(color, piece);
        self.squares[sq.0 as usize] = byte;

        let code = byte as usize;
        let idx = self.piece_count[code];
        self.piece_list[code * 16 + idx as usize] = sq.0;
        self.piece_index[sq.0 as usize] = idx;
        self.piece_count[code] += 1;

        let material = crate::board::tables::MATERIAL[piece as usize];
        let pst = Self::pst_value(piece, color, sq);
        let signed = match color {
            Color::White => material + pst,
            Color::Black => -(material + pst),
        };
        self.material_pst += signed;

        self.hash_low ^= ZOBRIST.low[sq.0 as usize][code];
        self.hash_high ^= ZOBRIST.high[sq.0 as usize][code];

        if piece == KING {
            self.king_square[color.index()] = sq;
        }
    }

    /// Remove whatever piece sits on `sq` (must be occupied), swapping the
    /// vacated piece-list slot with the list's last entry.
    pub(crate) fn remove_piece(&mut self, sq: Square) {
        let byte = self.squares[sq.0 as usize];
        debug_assert_ne!(byte, EMPTY);
        debug_assert_ne!(byte, OFFBOARD);
        let code = byte as usize;
        let piece = piece_type(byte);
        let color = Color::from_mask(piece_color_mask(byte)).expect("valid piece byte");

        let idx = self.piece_index[sq.0 as usize];
        let last = self.piece_count[code] - 1;
        let last_sq = self.piece_list[code * 16 + last as usize];
        self.piece_list[code * 16 + idx as usize] = last_sq;
        self.piece_index[last_sq as usize] = idx;
        self.piece_count[code] = last;

        self.squares[sq.0 as usize] = EMPTY;

        let material = crate::board::tables::MATERIAL[piece as usize];
        let pst = Self::pst_value(piece, color, sq);
        let signed = match color {
            Color::White => material + pst,
            Color::Black => -(material + pst),
        };
        self.material_pst -= signed;

        self.hash_low ^= ZOBRIST.low[sq.0 as usize][code];
        self.hash_high ^= ZOBRIST.high[sq.0 as usize][code];
    }

    fn flip_side_to_move(&mut self) {
        self.side_to_move = self.side_to_move.opposite();
        self.hash_low ^= ZOBRIST.black_to_move_low;
        self.hash_high ^= ZOBRIST.black_to_move_high;
    }

    /// Recompute the hash from scratch by scanning the board; used only by
    /// tests verifying the incremental-hash invariant.
    #[must_use]
    pub fn recompute_hash(&self) -> (u32, u32) {
        let mut low = 0u32;
        let mut high = 0u32;
        for sq in 0..256u16 {
            let byte = self.squares[sq as usize];
            if byte != EMPTY && byte != OFFBOARD {
                low ^= ZOBRIST.low[sq as usize][byte as usize];
                high ^= ZOBRIST.high[sq as usize][byte as usize];
            }
        }
        if self.side_to_move == Color::Black {
            low ^= ZOBRIST.black_to_move_low;
            high ^= ZOBRIST.black_to_move_high;
        }
        (low, high)
    }

    /// Recompute the incremental material+PST sum from scratch; used only
    /// by tests and by `BoardBuilder`.
    pub(crate) fn recompute_material_pst(&mut self) {
        let mut total = 0i32;
        for sq in 0..256u16 {
            let byte = self.squares[sq as usize];
            if byte == EMPTY || byte == OFFBOARD {
                continue;
            }
            let piece = piece_type(byte);
            let color = Color::from_mask(piece_color_mask(byte)).unwrap();
            let material = crate::board::tables::MATERIAL[piece as usize];
            let pst = Self::pst_value(piece, color, Square(sq as u8));
            total += match color {
                Color::White => material + pst,
                Color::Black => -(material + pst),
            };
        }
        self.material_pst = total;
    }

    pub(crate) fn push_repetition(&mut self) {
        self.rep_stack.push(self.hash_low);
    }

    pub(crate) fn pop_repetition(&mut self) {
        self.rep_stack.pop();
    }

    /// True if the current position's hash has occurred earlier in this
    /// game's move history.
    #[must_use]
    pub fn is_rep_draw(&self) -> bool {
        let n = self.rep_stack.len();
        if n < 2 {
            return false;
        }
        let window = self.move50 as usize;
        let start = n.saturating_sub(window);
        self.rep_stack[start..n - 1]
            .iter()
            .any(|&h| h == self.hash_low)
    }

    pub(crate) fn apply_flip_side(&mut self) {
        self.flip_side_to_move();
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn is_pawn_type(p: u8) -> bool {
    p == PAWN
}
pub(crate) fn is_slider(p: u8) -> bool {
    matches!(p, BISHOP | ROOK | QUEEN)
}
pub(crate) fn is_minor_or_major(p: u8) -> bool {
    matches!(p, KNIGHT | BISHOP | ROOK | QUEEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_has_offboard_ring_and_empty_play_area() {
        let b = Board::empty();
        assert_eq!(b.squares[0], OFFBOARD);
        let e4 = Square::from_rank_file(3, 4);
        assert_eq!(b.squares[e4.0 as usize], EMPTY);
    }

    #[test]
    fn add_then_remove_piece_restores_material() {
        let mut b = Board::empty();
        let before = b.material_pst;
        let sq = Square::from_rank_file(3, 4);
        b.add_piece(sq, Color::White, QUEEN);
        assert_ne!(b.material_pst, before);
        b.remove_piece(sq);
        assert_eq!(b.material_pst, before);
        assert_eq!(b.squares[sq.0 as usize], EMPTY);
    }

    #[test]
    fn piece_list_reverse_index_consistent_after_removal_with_swap() {
        let mut b = Board::empty();
        let a = Square::from_rank_file(1, 0);
        let c = Square::from_rank_file(1, 2);
        let d = Square::from_rank_file(1, 3);
        b.add_piece(a, Color::White, PAWN);
        b.add_piece(c, Color::White, PAWN);
        b.add_piece(d, Color::White, PAWN);
        b.remove_piece(a); // triggers swap-with-last in the piece list
        let code = piece_code(Color::White, PAWN) as usize;
        let count = b.piece_count[code] as usize;
        for i in 0..count {
            let sq = b.piece_list[code * 16 + i];
            assert_eq!(b.piece_index[sq as usize] as usize, i);
        }
    }

    #[test]
    fn king_square_cache_updates_on_add() {
        let mut b = Board::empty();
        let e1 = Square::from_rank_file(0, 4);
        b.add_piece(e1, Color::White, KING);
        assert_eq!(b.king_square(Color::White), e1);
    }
}

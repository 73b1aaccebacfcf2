//! FEN (de)serialization and UCI long-algebraic move parsing.
//!
//! `try_from_fen`/`to_fen`/`parse_move`, built against the 0x88
//! `Square`/`Board` types. Per the redesign decision recorded in
//! DESIGN.md, malformed FEN is always rejected with a `FenError` rather
//! than best-effort-repaired.

use super::error::{FenError, MoveParseError};
use super::state::Board;
use super::types::{
    Color, Move, Square, BISHOP, CASTLE_BLACK_K, CASTLE_BLACK_Q, CASTLE_WHITE_K, CASTLE_WHITE_Q,
    KING, KNIGHT, PAWN, QUEEN, ROOK,
};

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

fn piece_from_char(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        'p' => Some(PAWN),
        'n' => Some(KNIGHT),
        'b' => Some(BISHOP),
        'r' => Some(ROOK),
        'q' => Some(QUEEN),
        'k' => Some(KING),
        _ => None,
    }
}

fn piece_to_char(piece: u8, color: Color) -> char {
    let c = match piece {
        PAWN => 'p',
        KNIGHT => 'n',
        BISHOP => 'b',
        ROOK => 'r',
        QUEEN => 'q',
        KING => 'k',
        _ => unreachable!("invalid piece type"),
    };
    if color == Color::White {
        c.to_ascii_uppercase()
    } else {
        c
    }
}

impl Board {
    /// Parse a board position from FEN notation. Rejects any malformed
    /// input rather than attempting a best-effort repair.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::TooFewParts { found: parts.len() });
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidRank { rank: ranks.len() });
        }
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file: u32 = 0;
            for c in rank_str.chars() {
                if let Some(d) = c.to_digit(10) {
                    file += d;
                } else {
                    let color = if c.is_uppercase() { Color::White } else { Color::Black };
                    let piece = piece_from_char(c).ok_or(FenError::InvalidPiece { char: c })?;
                    if file >= 8 {
                        return Err(FenError::TooManyFiles {
                            rank: rank_idx,
                            files: file as usize + 1,
                        });
                    }
                    board.add_piece(Square::from_rank_file(rank, file as u8), color, piece);
                    file += 1;
                }
            }
            if file != 8 {
                return Err(FenError::TooManyFiles {
                    rank: rank_idx,
                    files: file as usize,
                });
            }
        }

        board.side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => {
                return Err(FenError::InvalidSideToMove {
                    found: other.to_string(),
                })
            }
        };

        let mut castling = 0u8;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                castling |= match c {
                    'K' => CASTLE_WHITE_K,
                    'Q' => CASTLE_WHITE_Q,
                    'k' => CASTLE_BLACK_K,
                    'q' => CASTLE_BLACK_Q,
                    _ => return Err(FenError::InvalidCastling { char: c }),
                };
            }
        }
        board.castling = super::types::CastlingRights(castling);

        board.ep_square = if parts[3] == "-" {
            None
        } else {
            Some(
                Square::from_algebraic(parts[3]).ok_or_else(|| FenError::InvalidEnPassant {
                    found: parts[3].to_string(),
                })?,
            )
        };

        board.move50 = parts.get(4).and_then(|s| s.parse().ok()).unwrap_or(0);

        if board.side_to_move == Color::Black {
            board.hash_low ^= super::state::ZOBRIST.black_to_move_low;
            board.hash_high ^= super::state::ZOBRIST.black_to_move_high;
        }
        let opponent = board.side_to_move.opposite();
        board.in_check = board.is_square_attackable(board.king_square(board.side_to_move), opponent);
        board.push_repetition();

        Ok(board)
    }

    /// Render the current position as a FEN string.
    #[must_use]
    pub fn to_fen(&self) -> String {
        let mut rows = Vec::with_capacity(8);
        for rank in (0..8u8).rev() {
            let mut row = String::new();
            let mut empty = 0;
            for file in 0..8u8 {
                let sq = Square::from_rank_file(rank, file);
                let byte = self.squares[sq.0 as usize];
                if byte == super::types::EMPTY {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    row.push_str(&empty.to_string());
                    empty = 0;
                }
                let piece = super::types::piece_type(byte);
                let color =
                    Color::from_mask(super::types::piece_color_mask(byte)).expect("valid piece");
                row.push(piece_to_char(piece, color));
            }
            if empty > 0 {
                row.push_str(&empty.to_string());
            }
            rows.push(row);
        }

        let active = if self.side_to_move == Color::White { "w" } else { "b" };
        let mut castling = String::new();
        if self.castling.has(CASTLE_WHITE_K) {
            castling.push('K');
        }
        if self.castling.has(CASTLE_WHITE_Q) {
            castling.push('Q');
        }
        if self.castling.has(CASTLE_BLACK_K) {
            castling.push('k');
        }
        if self.castling.has(CASTLE_BLACK_Q) {
            castling.push('q');
        }
        if castling.is_empty() {
            castling.push('-');
        }
        let ep = self.ep_square.map_or_else(|| "-".to_string(), Square::to_algebraic);

        format!(
            "{} {} {} {} {} 1",
            rows.join("/"),
            active,
            castling,
            ep,
            self.move50
        )
    }

    /// Parse a move in UCI long algebraic notation (e.g. "e2e4", "e7e8q")
    /// and resolve it against the set of currently legal moves.
    pub fn parse_move(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        if uci.len() < 4 || uci.len() > 5 {
            return Err(MoveParseError::InvalidLength { len: uci.len() });
        }
        let from = Square::from_algebraic(&uci[0..2]).ok_or_else(|| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;
        let to = Square::from_algebraic(&uci[2..4]).ok_or_else(|| MoveParseError::InvalidSquare {
            notation: uci.to_string(),
        })?;
        let promotion = if uci.len() == 5 {
            let c = uci.chars().nth(4).unwrap();
            let piece = piece_from_char(c).ok_or(MoveParseError::InvalidPromotion { char: c })?;
            if matches!(piece, PAWN | KING) {
                return Err(MoveParseError::InvalidPromotion { char: c });
            }
            Some(piece)
        } else {
            None
        };

        let legal = self.generate_valid_moves();
        for &mv in legal.iter() {
            if mv.from_sq() == from && mv.to_sq() == to && mv.promotion_piece() == promotion {
                return Ok(mv);
            }
        }
        Err(MoveParseError::IllegalMove {
            notation: uci.to_string(),
        })
    }

    /// Parse and immediately play a UCI move.
    pub fn make_move_uci(&mut self, uci: &str) -> Result<Move, MoveParseError> {
        let mv = self.parse_move(uci)?;
        self.make_move(mv);
        Ok(mv)
    }
}

//! A thin UCI front end: a CLI binary layered over the engine crate, not
//! part of the core itself. Understands `uci`, `isready`, `ucinewgame`,
//! `position [startpos|fen ...] [moves ...]`, `go depth N`, and `quit`;
//! calls only the core's public entry points (`Board::new`,
//! `Board::from_fen`, `engine::search_async`, `Board::foundmove`,
//! `Move::format`).
//!
//! A `BufRead`-driven command loop dispatching on `parts[0]`. The core
//! runs one depth-limited search per `go` synchronously rather than in a
//! cancellable background thread, so there's no pondering or streamed
//! `info` lines here.

use std::io::{self, BufRead, Write};

use crate::board::Board;
use crate::engine::{search_async, SearchLimits};

fn parse_position_command(board: &mut Board, parts: &[&str]) {
    let mut i = 1;
    if parts.get(i) == Some(&"startpos") {
        *board = Board::new();
        i += 1;
    } else if parts.get(i) == Some(&"fen") {
        let fen_end = (i + 1..parts.len())
            .find(|&j| parts[j] == "moves")
            .unwrap_or(parts.len());
        let fen = parts[i + 1..fen_end].join(" ");
        match Board::from_fen(&fen) {
            Ok(parsed) => *board = parsed,
            Err(e) => {
                eprintln!("info string invalid fen: {e}");
                return;
            }
        }
        i = fen_end;
    }

    if parts.get(i) == Some(&"moves") {
        i += 1;
        while i < parts.len() {
            if board.make_move_uci(parts[i]).is_err() {
                eprintln!("info string invalid move: {}", parts[i]);
                break;
            }
            i += 1;
        }
    }
}

fn handle_go(board: &mut Board, parts: &[&str], out: &mut impl Write) {
    let mut depth = 4;
    let mut i = 1;
    while i < parts.len() {
        if parts[i] == "depth" {
            if let Some(d) = parts.get(i + 1).and_then(|s| s.parse::<i32>().ok()) {
                depth = d;
            }
            i += 2;
        } else {
            i += 1;
        }
    }

    let limits = SearchLimits::new(depth);
    search_async(board, limits, || {}, |best_move| {
        let line = if best_move.is_null() {
            "bestmove 0000".to_string()
        } else {
            format!("bestmove {}", best_move.format())
        };
        writeln!(out, "{line}").ok();
        out.flush().ok();
    });
}

/// Drive a UCI session over stdin/stdout until `quit` or EOF.
pub fn run_uci_loop() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut board = Board::new();

    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            continue;
        }

        match parts[0] {
            "uci" => {
                writeln!(stdout, "id name garbochess-core").ok();
                writeln!(stdout, "id author the garbochess-core authors").ok();
                writeln!(stdout, "uciok").ok();
                stdout.flush().ok();
            }
            "isready" => {
                writeln!(stdout, "readyok").ok();
                stdout.flush().ok();
            }
            "ucinewgame" => board = Board::new(),
            "position" => parse_position_command(&mut board, &parts),
            "go" => handle_go(&mut board, &parts, &mut stdout),
            "quit" => break,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_startpos_with_moves_applies_them() {
        let mut board = Board::new();
        parse_position_command(&mut board, &["position", "startpos", "moves", "e2e4", "e7e5"]);
        assert_eq!(board.undo_stack_len(), 2);
    }

    #[test]
    fn position_fen_without_moves_matches_from_fen() {
        let fen = "8/P7/8/8/8/8/8/4K2k w - - 0 1";
        let command = format!("position fen {fen}");
        let parts: Vec<&str> = command.split_whitespace().collect();
        let mut board = Board::new();
        parse_position_command(&mut board, &parts);
        assert_eq!(board.to_fen(), Board::from_fen(fen).unwrap().to_fen());
    }

    #[test]
    fn go_depth_writes_a_bestmove_line() {
        let mut board = Board::new();
        let mut out = Vec::new();
        handle_go(&mut board, &["go", "depth", "2"], &mut out);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("bestmove "));
    }
}

//! Transposition table: a fixed `2^22`-slot, open-addressed,
//! always-replace table keyed by the low half of the Zobrist hash.
//!
//! A fixed-size array with a lock word to detect collisions, storing
//! depth, flag, and best move per slot, keyed by the hash-low/hash-high
//! split.

use crate::board::types::Move;

pub const TT_BITS: u32 = 22;
pub const TT_SIZE: usize = 1 << TT_BITS;
const TT_MASK: u32 = (TT_SIZE as u32) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TTFlag {
    Alpha,
    Beta,
    Exact,
}

#[derive(Clone, Copy, Debug)]
pub struct TTEntry {
    pub lock: u32,
    pub value: i32,
    pub flag: TTFlag,
    pub depth: i32,
    pub best_move: Move,
}

impl Default for TTEntry {
    fn default() -> Self {
        TTEntry {
            lock: 0,
            value: 0,
            flag: TTFlag::Alpha,
            depth: -1,
            best_move: Move::NULL,
        }
    }
}

pub struct TranspositionTable {
    entries: Vec<TTEntry>,
}

impl TranspositionTable {
    #[must_use]
    pub fn new() -> Self {
        TranspositionTable {
            entries: vec![TTEntry::default(); TT_SIZE],
        }
    }

    fn slot(hash_low: u32) -> usize {
        (hash_low & TT_MASK) as usize
    }

    /// Probe for an entry matching `hash_high` ("the lock"). Returns
    /// `None` on a slot miss or lock mismatch.
    #[must_use]
    pub fn probe(&self, hash_low: u32, hash_high: u32) -> Option<&TTEntry> {
        let entry = &self.entries[Self::slot(hash_low)];
        if entry.depth >= 0 && entry.lock == hash_high {
            Some(entry)
        } else {
            None
        }
    }

    /// Always-replace store.
    pub fn store(
        &mut self,
        hash_low: u32,
        hash_high: u32,
        value: i32,
        flag: TTFlag,
        depth: i32,
        best_move: Move,
    ) {
        self.entries[Self::slot(hash_low)] = TTEntry {
            lock: hash_high,
            value,
            flag,
            depth,
            best_move,
        };
    }

    pub fn clear(&mut self) {
        for e in &mut self.entries {
            *e = TTEntry::default();
        }
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_then_probe_roundtrips() {
        let mut tt = TranspositionTable::new();
        let mv = Move::new(
            crate::board::types::Square::from_rank_file(1, 4),
            crate::board::types::Square::from_rank_file(3, 4),
            0,
        );
        tt.store(12345, 999, 57, TTFlag::Exact, 6, mv);
        let entry = tt.probe(12345, 999).expect("entry present");
        assert_eq!(entry.value, 57);
        assert_eq!(entry.depth, 6);
        assert_eq!(entry.best_move, mv);
        assert_eq!(entry.flag, TTFlag::Exact);
    }

    #[test]
    fn lock_mismatch_misses() {
        let mut tt = TranspositionTable::new();
        tt.store(42, 1, 0, TTFlag::Alpha, 1, Move::NULL);
        assert!(tt.probe(42, 2).is_none());
    }

    #[test]
    fn always_replace_overwrites() {
        let mut tt = TranspositionTable::new();
        tt.store(7, 1, 10, TTFlag::Alpha, 1, Move::NULL);
        tt.store(7, 2, 20, TTFlag::Beta, 2, Move::NULL);
        assert!(tt.probe(7, 1).is_none());
        let entry = tt.probe(7, 2).unwrap();
        assert_eq!(entry.value, 20);
    }
}

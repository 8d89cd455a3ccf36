//! Transposition cache keyed by Zobrist hash.
//!
//! Unbounded map with depth-preferred replacement: an entry is only
//! overwritten by one computed for at least the same remaining depth. The
//! opening book primes it before play begins.

use std::collections::HashMap;

use crate::game_state::chess_types::{Move, Score};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry {
    /// Remaining depth the score was computed for.
    pub depth: u8,
    pub score: Score,
    pub best_move: Option<Move>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TTStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
}

#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TTEntry>,
    stats: TTStats,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry for `key`, returning it if there was one.
    pub fn remove(&mut self, key: u64) -> Option<TTEntry> {
        self.entries.remove(&key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn stats(&self) -> TTStats {
        self.stats
    }

    /// Look up `key`, counting a hit only when the entry covers at least
    /// `min_depth` remaining plies.
    pub fn probe(&mut self, key: u64, min_depth: u8) -> Option<TTEntry> {
        self.stats.probes += 1;
        let hit = self
            .entries
            .get(&key)
            .copied()
            .filter(|e| e.depth >= min_depth);
        if hit.is_some() {
            self.stats.hits += 1;
        }
        hit
    }

    /// Peek without touching the statistics.
    pub fn get(&self, key: u64) -> Option<&TTEntry> {
        self.entries.get(&key)
    }

    /// Store `entry` unless a deeper one already exists for `key`. Returns
    /// whether the table changed.
    pub fn store(&mut self, key: u64, entry: TTEntry) -> bool {
        self.stats.stores += 1;
        match self.entries.get(&key) {
            Some(existing) if existing.depth > entry.depth => false,
            _ => {
                self.entries.insert(key, entry);
                true
            }
        }
    }
}

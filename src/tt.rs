//! Transposition table for caching search results.
//!
//! Uses Zobrist hashes to store and retrieve position evaluations,
//! enabling significant search tree pruning. The table is direct-mapped:
//! each hash owns exactly one slot, verified against the full 64-bit key.
//! Slots are overwritten on collision, so memory stays fixed.

use std::mem;

use crate::board::{Move, MATE_THRESHOLD};

/// Default table size in megabytes
pub const DEFAULT_TT_MB: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BoundType {
    #[default]
    Exact, // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

/// Entry returned by a successful probe, with mate scores relative to the probing node
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub depth: u8,
    pub score: i32,
    pub bound_type: BoundType,
    pub best_move: Option<Move>,
}

impl TTEntry {
    #[must_use]
    pub fn depth(&self) -> u32 {
        u32::from(self.depth)
    }

    #[must_use]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub fn bound_type(&self) -> BoundType {
        self.bound_type
    }

    #[must_use]
    pub fn best_move(&self) -> Option<Move> {
        self.best_move
    }
}

#[derive(Clone, Copy, Default)]
struct TTSlot {
    key: u64,
    score: i32,
    mv: u16,
    depth: u8,
    bound: BoundType,
    generation: u8,
    used: bool,
}

/// Convert a score relative to the current node into one relative to the root
/// distance stored in the table (mate distances are path independent there).
#[inline]
fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

/// Single-threaded direct-mapped transposition table.
pub struct TranspositionTable {
    slots: Vec<TTSlot>,
    mask: usize,
    generation: u8,
    collisions: u64,
}

impl TranspositionTable {
    /// Create a table of roughly `size_mb` megabytes, rounded down to a power of two slots.
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let wanted = (size_mb * 1024 * 1024) / mem::size_of::<TTSlot>();
        let count = if wanted == 0 {
            1024
        } else {
            1usize << (usize::BITS - 1 - wanted.leading_zeros())
        };

        TranspositionTable {
            slots: vec![TTSlot::default(); count],
            mask: count - 1,
            generation: 0,
            collisions: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Probe for `hash` from a node `ply` plies below the root.
    ///
    /// A slot owned by a different key counts as a collision and misses.
    pub fn probe(&mut self, hash: u64, ply: usize) -> Option<TTEntry> {
        let slot = self.slots[self.index(hash)];
        if !slot.used {
            return None;
        }
        if slot.key != hash {
            self.collisions += 1;
            return None;
        }
        Some(TTEntry {
            depth: slot.depth,
            score: score_from_tt(slot.score, ply),
            bound_type: slot.bound,
            best_move: if slot.mv == 0 {
                None
            } else {
                Some(Move::from_u16(slot.mv))
            },
        })
    }

    /// Store a search result.
    ///
    /// An occupied slot from the current search is only replaced by the same
    /// position or by a result searched at least as deep.
    pub fn store(
        &mut self,
        hash: u64,
        depth: u32,
        score: i32,
        bound_type: BoundType,
        best_move: Option<Move>,
        ply: usize,
    ) {
        let idx = self.index(hash);
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let current = self.slots[idx];
        let replace = !current.used
            || current.generation != self.generation
            || current.key == hash
            || depth >= current.depth;
        if !replace {
            return;
        }

        self.slots[idx] = TTSlot {
            key: hash,
            score: score_to_tt(score, ply),
            mv: best_move.map_or(0, Move::as_u16),
            depth,
            bound: bound_type,
            generation: self.generation,
            used: true,
        };
    }

    /// Mark every existing entry as belonging to an earlier search.
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns hash table fullness in per mille (0-1000), counting current-search entries.
    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        // Sample the first 1000 slots
        let sample = self.slots.len().min(1000);
        let occupied = self
            .slots
            .iter()
            .take(sample)
            .filter(|s| s.used && s.generation == self.generation)
            .count();
        ((occupied * 1000) / sample) as u32
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.slots.fill(TTSlot::default());
        self.generation = 0;
        self.collisions = 0;
    }

    /// Probes that found a slot owned by a different position
    #[must_use]
    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB)
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("slots", &self.slots.len())
            .field("generation", &self.generation)
            .field("collisions", &self.collisions)
            .finish()
    }
}

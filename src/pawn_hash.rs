//! Pawn hash table for caching pawn structure evaluation.
//!
//! Pawn structure only depends on pawn positions, so it can be cached
//! using a pawn-only Zobrist hash. Pawns rarely move, so most probes hit.

use std::mem;

/// Default size of the pawn table in kilobytes
pub const DEFAULT_PAWN_HASH_KB: usize = 1024;

/// Cached pawn-structure score as `[opening, ending]`, White's point of view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PawnHashEntry {
    pub opening: i32,
    pub ending: i32,
}

#[derive(Clone, Copy, Default)]
struct PawnSlot {
    key: u64,
    opening: i32,
    ending: i32,
    used: bool,
}

/// Direct-mapped pawn-structure cache with full-key verification.
pub struct PawnHashTable {
    slots: Vec<PawnSlot>,
    mask: usize,
    hits: u64,
    misses: u64,
}

impl PawnHashTable {
    /// Create a table of roughly `size_kb` kilobytes, rounded down to a power of two slots.
    #[must_use]
    pub fn new(size_kb: usize) -> Self {
        let wanted = (size_kb * 1024) / mem::size_of::<PawnSlot>();
        let count = if wanted == 0 {
            1
        } else {
            // largest power of two not above the budget
            1usize << (usize::BITS - 1 - wanted.leading_zeros())
        };

        PawnHashTable {
            slots: vec![PawnSlot::default(); count],
            mask: count - 1,
            hits: 0,
            misses: 0,
        }
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & self.mask
    }

    /// Look up a pawn structure, counting the hit or miss.
    pub fn probe(&mut self, pawn_hash: u64) -> Option<PawnHashEntry> {
        let slot = self.slots[self.index(pawn_hash)];
        if slot.used && slot.key == pawn_hash {
            self.hits += 1;
            Some(PawnHashEntry {
                opening: slot.opening,
                ending: slot.ending,
            })
        } else {
            self.misses += 1;
            None
        }
    }

    /// Store a score, overwriting whatever shared the slot.
    pub fn store(&mut self, pawn_hash: u64, opening: i32, ending: i32) {
        let idx = self.index(pawn_hash);
        self.slots[idx] = PawnSlot {
            key: pawn_hash,
            opening,
            ending,
            used: true,
        };
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.slots.fill(PawnSlot::default());
        self.hits = 0;
        self.misses = 0;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for PawnHashTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAWN_HASH_KB)
    }
}

impl std::fmt::Debug for PawnHashTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PawnHashTable")
            .field("slots", &self.slots.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_power_of_two() {
        for kb in [0, 1, 3, 64, 1000] {
            let table = PawnHashTable::new(kb);
            assert!(table.len().is_power_of_two());
            assert!(table.len() * mem::size_of::<PawnSlot>() <= (kb * 1024).max(mem::size_of::<PawnSlot>()));
        }
    }

    #[test]
    fn store_and_probe() {
        let mut table = PawnHashTable::new(64);
        let hash = 0x1234_5678_9ABC_DEF0;

        table.store(hash, 150, -50);

        let entry = table.probe(hash).expect("should find entry");
        assert_eq!(entry, PawnHashEntry { opening: 150, ending: -50 });
        assert_eq!(table.hits(), 1);
    }

    #[test]
    fn no_false_positives() {
        let mut table = PawnHashTable::new(64);
        let hash = 0x1234_5678_9ABC_DEF0;
        // same slot, different key
        let alias = hash ^ (1 << 60);

        table.store(hash, 100, 200);

        assert!(table.probe(alias).is_none());
        assert_eq!(table.misses(), 1);
    }

    #[test]
    fn zero_hash_is_cacheable() {
        let mut table = PawnHashTable::new(1);
        assert!(table.probe(0).is_none());
        table.store(0, 7, 9);
        assert_eq!(table.probe(0).map(|e| e.ending), Some(9));
    }

    #[test]
    fn clear_resets() {
        let mut table = PawnHashTable::new(64);
        let hash = 0x1234_5678_9ABC_DEF0;

        table.store(hash, 100, 200);
        assert!(table.probe(hash).is_some());

        table.clear();
        assert!(table.probe(hash).is_none());
        assert_eq!(table.hits(), 0);
    }
}

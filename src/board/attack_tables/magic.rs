//! Magic bitboard tables for sliding pieces.
//!
//! For every square the relevant occupancy mask (the piece's rays minus the
//! board edge at the end of each ray) is hashed to a dense slot with
//! `((occ & mask) * magic) >> shift`. All slots for all squares live in one
//! flat vector; each square records its own offset.

use rand::rngs::StdRng;
use rand::Rng;

use crate::board::error::MagicError;
use crate::board::{Bitboard, Piece};

/// Attempts per square before the random search gives up
const MAX_MAGIC_ATTEMPTS: usize = 10_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Slider {
    Rook,
    Bishop,
}

impl Slider {
    fn directions(self) -> [(isize, isize); 4] {
        match self {
            Slider::Rook => [(1, 0), (-1, 0), (0, 1), (0, -1)],
            Slider::Bishop => [(1, 1), (1, -1), (-1, 1), (-1, -1)],
        }
    }

    fn piece(self) -> Piece {
        match self {
            Slider::Rook => Piece::Rook,
            Slider::Bishop => Piece::Bishop,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct MagicEntry {
    mask: u64,
    magic: u64,
    shift: u32,
    offset: usize,
}

#[derive(Clone, Debug)]
pub(super) struct SliderTable {
    entries: [MagicEntry; 64],
    attacks: Vec<Bitboard>,
}

impl SliderTable {
    /// Build the table, either verifying `supplied` constants or searching for new ones.
    pub(super) fn build(
        slider: Slider,
        supplied: Option<&[u64]>,
        rng: &mut StdRng,
    ) -> Result<Self, MagicError> {
        let mut entries = [MagicEntry::default(); 64];
        let mut attacks = Vec::new();
        let mut scratch: Vec<u64> = Vec::new();

        for (sq, entry) in entries.iter_mut().enumerate() {
            let mask = relevant_mask(slider, sq);
            let bits = mask.count_ones();
            let shift = 64 - bits;
            let occupancies = subsets(mask);
            let targets: Vec<u64> = occupancies
                .iter()
                .map(|&occ| ray_attacks(slider, sq, occ))
                .collect();
            scratch.clear();
            scratch.resize(1 << bits, 0);

            let magic = match supplied {
                Some(magics) => {
                    let magic = magics[sq];
                    if !fill_slots(magic, shift, &occupancies, &targets, &mut scratch) {
                        return Err(MagicError::Collision {
                            piece: slider.piece(),
                            square: sq,
                        });
                    }
                    magic
                }
                None => find_magic(mask, shift, &occupancies, &targets, &mut scratch, rng)
                    .ok_or(MagicError::SearchExhausted {
                        piece: slider.piece(),
                        square: sq,
                    })?,
            };

            *entry = MagicEntry {
                mask,
                magic,
                shift,
                offset: attacks.len(),
            };
            attacks.extend(scratch.iter().map(|&bb| Bitboard(bb)));
        }

        Ok(SliderTable { entries, attacks })
    }

    #[inline]
    pub(super) fn attacks(&self, sq: usize, occupied: Bitboard) -> Bitboard {
        let e = &self.entries[sq];
        let idx = ((occupied.0 & e.mask).wrapping_mul(e.magic) >> e.shift) as usize;
        self.attacks[e.offset + idx]
    }

    pub(super) fn magics(&self) -> Vec<u64> {
        self.entries.iter().map(|e| e.magic).collect()
    }
}

/// Rays from `sq`, excluding the last square of every ray
pub(super) fn relevant_mask(slider: Slider, sq: usize) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut mask = 0u64;
    for (dr, df) in slider.directions() {
        let (mut nr, mut nf) = (r + dr, f + df);
        while (0..8).contains(&(nr + dr)) && (0..8).contains(&(nf + df)) {
            mask |= 1u64 << (nr * 8 + nf);
            nr += dr;
            nf += df;
        }
    }
    mask
}

/// Ray-cast attacks; a blocker square is included and stops the ray
pub(super) fn ray_attacks(slider: Slider, sq: usize, occupied: u64) -> u64 {
    let r = (sq / 8) as isize;
    let f = (sq % 8) as isize;
    let mut attacks = 0u64;
    for (dr, df) in slider.directions() {
        let (mut nr, mut nf) = (r + dr, f + df);
        while (0..8).contains(&nr) && (0..8).contains(&nf) {
            let bit = 1u64 << (nr * 8 + nf);
            attacks |= bit;
            if occupied & bit != 0 {
                break;
            }
            nr += dr;
            nf += df;
        }
    }
    attacks
}

/// Every subset of `mask` (Carry-Rippler enumeration)
fn subsets(mask: u64) -> Vec<u64> {
    let mut result = Vec::with_capacity(1 << mask.count_ones());
    let mut subset = 0u64;
    loop {
        result.push(subset);
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    result
}

/// Place every occupancy's attack set; false on a destructive collision.
/// Attack sets are never empty, so zero marks a free slot.
fn fill_slots(magic: u64, shift: u32, occupancies: &[u64], targets: &[u64], slots: &mut [u64]) -> bool {
    slots.fill(0);
    for (&occ, &target) in occupancies.iter().zip(targets) {
        let idx = (occ.wrapping_mul(magic) >> shift) as usize;
        if slots[idx] == 0 {
            slots[idx] = target;
        } else if slots[idx] != target {
            return false;
        }
    }
    true
}

fn find_magic(
    mask: u64,
    shift: u32,
    occupancies: &[u64],
    targets: &[u64],
    slots: &mut [u64],
    rng: &mut StdRng,
) -> Option<u64> {
    for _ in 0..MAX_MAGIC_ATTEMPTS {
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        if fill_slots(magic, shift, occupancies, targets, slots) {
            return Some(magic);
        }
    }
    None
}

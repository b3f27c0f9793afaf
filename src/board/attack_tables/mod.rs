//! Attack tables for move generation.
//!
//! Leaper pieces (knight, king, pawn) use plain per-square lookups. Sliding
//! pieces use magic bitboards: either verified caller-supplied constants or
//! constants found at construction time by a seeded random search.
//! Everything here is immutable once built.

mod leapers;
mod magic;

use rand::rngs::StdRng;
use rand::SeedableRng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::MagicError;
use super::{Bitboard, Color, Piece, Square};
use magic::{Slider, SliderTable};

/// Seed used when no magic constants are supplied
pub const DEFAULT_MAGIC_SEED: u64 = 0x00C0_FFEE_D00D_F00D;

/// Where the slider magic constants come from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MagicSource {
    /// Random search driven by a deterministic seed
    Generated { seed: u64 },
    /// Previously found constants, one per square, verified on load
    Supplied { rook: Vec<u64>, bishop: Vec<u64> },
}

impl Default for MagicSource {
    fn default() -> Self {
        MagicSource::Generated {
            seed: DEFAULT_MAGIC_SEED,
        }
    }
}

/// Precomputed attack sets for every piece type.
#[derive(Clone, Debug)]
pub struct AttackTables {
    knight: [Bitboard; 64],
    king: [Bitboard; 64],
    pawn: [[Bitboard; 64]; 2],
    rook: SliderTable,
    bishop: SliderTable,
}

impl AttackTables {
    /// Build every table.
    ///
    /// # Errors
    /// Returns [`MagicError`] when supplied constants are malformed or collide,
    /// or when the random search fails to find a constant.
    pub fn new(source: &MagicSource) -> Result<Self, MagicError> {
        let (rook, bishop) = match source {
            MagicSource::Generated { seed } => {
                let mut rng = StdRng::seed_from_u64(*seed);
                let rook = SliderTable::build(Slider::Rook, None, &mut rng)?;
                let bishop = SliderTable::build(Slider::Bishop, None, &mut rng)?;
                (rook, bishop)
            }
            MagicSource::Supplied { rook, bishop } => {
                check_len(Piece::Rook, rook)?;
                check_len(Piece::Bishop, bishop)?;
                // rng is unused when every constant is supplied
                let mut rng = StdRng::seed_from_u64(0);
                (
                    SliderTable::build(Slider::Rook, Some(rook), &mut rng)?,
                    SliderTable::build(Slider::Bishop, Some(bishop), &mut rng)?,
                )
            }
        };

        Ok(AttackTables {
            knight: leapers::knight_table(),
            king: leapers::king_table(),
            pawn: leapers::pawn_table(),
            rook,
            bishop,
        })
    }

    /// The constants in use, in a form that can be fed back as [`MagicSource::Supplied`].
    #[must_use]
    pub fn magics(&self) -> MagicSource {
        MagicSource::Supplied {
            rook: self.rook.magics(),
            bishop: self.bishop.magics(),
        }
    }

    #[inline]
    #[must_use]
    pub fn knight_attacks(&self, sq: Square) -> Bitboard {
        self.knight[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn king_attacks(&self, sq: Square) -> Bitboard {
        self.king[sq.index()]
    }

    /// Squares a pawn of `color` standing on `sq` attacks
    #[inline]
    #[must_use]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> Bitboard {
        self.pawn[color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn rook_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook.attacks(sq.index(), occupied)
    }

    #[inline]
    #[must_use]
    pub fn bishop_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.bishop.attacks(sq.index(), occupied)
    }

    #[inline]
    #[must_use]
    pub fn queen_attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        self.rook_attacks(sq, occupied) | self.bishop_attacks(sq, occupied)
    }

    /// Attacks of a non-pawn piece on `sq`
    #[inline]
    #[must_use]
    pub fn piece_attacks(&self, piece: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
        match piece {
            Piece::Knight => self.knight_attacks(sq),
            Piece::Bishop => self.bishop_attacks(sq, occupied),
            Piece::Rook => self.rook_attacks(sq, occupied),
            Piece::Queen => self.queen_attacks(sq, occupied),
            Piece::King => self.king_attacks(sq),
            Piece::Pawn => panic!("pawn attacks depend on color; use pawn_attacks"),
        }
    }
}

fn check_len(piece: Piece, magics: &[u64]) -> Result<(), MagicError> {
    if magics.len() == 64 {
        Ok(())
    } else {
        Err(MagicError::WrongLength {
            piece,
            found: magics.len(),
        })
    }
}

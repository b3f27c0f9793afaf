//! Precomputed, immutable lookup tables shared by the board, evaluation and search.
//!
//! A [`Tables`] value is built once per engine session and handed out as
//! `Arc<Tables>`; nothing in the crate reaches for global table state.

use std::sync::Arc;
use std::time::Instant;

use log::debug;

use crate::board::eval::params::{PST_ENDING, PST_OPENING};
use crate::board::{AttackTables, Color, EvalParams, MagicError, MagicSource, Piece, SeeTable, Square};
use crate::zobrist::ZobristKeys;

#[derive(Debug)]
pub struct Tables {
    attacks: AttackTables,
    zobrist: ZobristKeys,
    see: SeeTable,
    // pst[color][piece][square] = [opening, ending]
    pst: Box<[[[[i32; 2]; 64]; 6]; 2]>,
    params: EvalParams,
}

impl Tables {
    /// Build every table for the given evaluation weights and magic source.
    ///
    /// # Errors
    /// Propagates [`MagicError`] from the slider table construction.
    pub fn new(params: EvalParams, magics: &MagicSource) -> Result<Self, MagicError> {
        let start = Instant::now();
        let attacks = AttackTables::new(magics)?;
        let see = SeeTable::new(&params.material);
        let pst = build_pst();
        debug!("lookup tables built in {:?}", start.elapsed());

        Ok(Tables {
            attacks,
            zobrist: ZobristKeys::new(),
            see,
            pst,
            params,
        })
    }

    /// Default weights and generated magics, wrapped for sharing.
    ///
    /// # Errors
    /// Propagates [`MagicError`] from the slider table construction.
    pub fn shared_default() -> Result<Arc<Self>, MagicError> {
        Tables::new(EvalParams::default(), &MagicSource::default()).map(Arc::new)
    }

    /// Same attack tables and keys with different evaluation weights.
    #[must_use]
    pub fn with_params(&self, params: EvalParams) -> Self {
        Tables {
            attacks: self.attacks.clone(),
            zobrist: self.zobrist.clone(),
            see: SeeTable::new(&params.material),
            pst: self.pst.clone(),
            params,
        }
    }

    #[inline]
    #[must_use]
    pub fn attacks(&self) -> &AttackTables {
        &self.attacks
    }

    #[inline]
    #[must_use]
    pub fn zobrist(&self) -> &ZobristKeys {
        &self.zobrist
    }

    #[inline]
    #[must_use]
    pub fn see(&self) -> &SeeTable {
        &self.see
    }

    #[inline]
    #[must_use]
    pub fn params(&self) -> &EvalParams {
        &self.params
    }

    /// Opening and ending piece-square bonus for a piece of `color` on `sq`
    #[inline]
    #[must_use]
    pub fn pst(&self, color: Color, piece: Piece, sq: Square) -> [i32; 2] {
        self.pst[color.index()][piece.index()][sq.index()]
    }
}

fn build_pst() -> Box<[[[[i32; 2]; 64]; 6]; 2]> {
    let mut pst = Box::new([[[[0; 2]; 64]; 6]; 2]);
    for color in Color::BOTH {
        for piece in Piece::ALL {
            for idx in 0..64 {
                // Black reads the White table mirrored across the middle rank
                let src = if color == Color::White { idx } else { idx ^ 56 };
                pst[color.index()][piece.index()][idx] = [
                    PST_OPENING[piece.index()][src],
                    PST_ENDING[piece.index()][src],
                ];
            }
        }
    }
    pst
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pst_is_color_symmetric() {
        let tables = Tables::shared_default().expect("tables");
        for piece in Piece::ALL {
            for idx in 0..64 {
                let sq = Square::from_index(idx);
                assert_eq!(
                    tables.pst(Color::White, piece, sq),
                    tables.pst(Color::Black, piece, sq.flip_vertical())
                );
            }
        }
    }
}

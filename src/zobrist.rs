//! Zobrist hashing for chess positions.
//!
//! Provides incrementally-updatable 64-bit position hashes for the
//! transposition table and a pawn-only hash for the pawn structure cache.

use rand::prelude::*;

use crate::board::{CastlingRights, Color, Piece, Square};

/// Fixed seed so hashes are reproducible across runs
const ZOBRIST_SEED: u64 = 1_234_567_890;

#[derive(Clone, Debug)]
pub struct ZobristKeys {
    // piece_keys[piece_type][color][square_index]
    piece_keys: [[[u64; 64]; 2]; 6],
    black_to_move_key: u64,
    // one key per castling-rights bit (WK, WQ, BK, BQ)
    castling_keys: [u64; 4],
    // en_passant_keys[file_index] (only file matters for EP target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(ZOBRIST_SEED)
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_keys = [[[0; 64]; 2]; 6];
        let mut castling_keys = [0; 4];
        let mut en_passant_keys = [0; 8];

        for piece in &mut piece_keys {
            for color in piece.iter_mut() {
                for key in color.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        let black_to_move_key = rng.gen();

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            black_to_move_key,
            castling_keys,
            en_passant_keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn piece(&self, color: Color, piece: Piece, sq: Square) -> u64 {
        self.piece_keys[piece.index()][color.index()][sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> u64 {
        self.black_to_move_key
    }

    /// XOR of the keys of every right present in `rights`
    #[inline]
    #[must_use]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let bits = rights.as_u8();
        let mut key = 0;
        for (i, k) in self.castling_keys.iter().enumerate() {
            if bits & (1 << i) != 0 {
                key ^= k;
            }
        }
        key
    }

    #[inline]
    #[must_use]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant_keys[sq.file()]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

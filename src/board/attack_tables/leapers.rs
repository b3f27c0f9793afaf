//! Precomputed attack tables for leaper pieces (knights, kings, pawns).

use crate::board::{Bitboard, Color};

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (2, 1),
    (1, 2),
    (-1, 2),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
    (2, -1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

fn leaper_table(deltas: &[(isize, isize)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    for (sq, slot) in attacks.iter_mut().enumerate() {
        let r = (sq / 8) as isize;
        let f = (sq % 8) as isize;
        let mut mask = 0u64;
        for &(dr, df) in deltas {
            let nr = r + dr;
            let nf = f + df;
            if (0..8).contains(&nr) && (0..8).contains(&nf) {
                mask |= 1u64 << (nr * 8 + nf);
            }
        }
        *slot = Bitboard(mask);
    }
    attacks
}

pub(super) fn knight_table() -> [Bitboard; 64] {
    leaper_table(&KNIGHT_DELTAS)
}

pub(super) fn king_table() -> [Bitboard; 64] {
    leaper_table(&KING_DELTAS)
}

/// Squares attacked by a pawn of each color, `[color][square]`
pub(super) fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut attacks = [[Bitboard::EMPTY; 64]; 2];
    for color in Color::BOTH {
        let dr = if color == Color::White { 1 } else { -1 };
        attacks[color.index()] = leaper_table(&[(dr, -1), (dr, 1)]);
    }
    attacks
}

//! Pawn structure evaluation.
//!
//! Doubled, isolated, chained (pawn-defended) and passed pawns. Depends only
//! on pawn placement, which is what makes the pawn hash cache valid.

use crate::board::{Bitboard, Board, Color, Piece, Square};

/// Files adjacent to `file`
fn adjacent_files(file: usize) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    if file > 0 {
        mask |= Bitboard::file_mask(file - 1);
    }
    if file < 7 {
        mask |= Bitboard::file_mask(file + 1);
    }
    mask
}

/// Squares strictly ahead of `sq` from `color`'s point of view, on all ranks
fn ranks_ahead(color: Color, sq: Square) -> Bitboard {
    match color {
        Color::White if sq.rank() < 7 => Bitboard(u64::MAX << (8 * (sq.rank() + 1))),
        Color::Black if sq.rank() > 0 => Bitboard((1u64 << (8 * sq.rank())) - 1),
        _ => Bitboard::EMPTY,
    }
}

impl Board {
    fn pawn_structure_for(&self, color: Color) -> [i32; 2] {
        let params = self.tables.params();
        let attacks = self.tables.attacks();
        let own = self.pieces(color, Piece::Pawn);
        let enemy = self.pieces(color.opponent(), Piece::Pawn);

        let mut doubled = 0;
        for file in 0..8 {
            let count = (own & Bitboard::file_mask(file)).popcount() as i32;
            if count > 1 {
                doubled += count - 1;
            }
        }

        let (mut isolated, mut chained, mut passing) = (0, 0, 0);
        for sq in own {
            let neighbours = adjacent_files(sq.file());
            if (own & neighbours).is_empty() {
                isolated += 1;
            }
            // defended by an own pawn diagonally behind
            if (attacks.pawn_attacks(color.opponent(), sq) & own).is_not_empty() {
                chained += 1;
            }
            let span = (neighbours | Bitboard::file_mask(sq.file())) & ranks_ahead(color, sq);
            if (span & enemy).is_empty() {
                passing += 1;
            }
        }

        let mut pair = [0; 2];
        for (phase, slot) in pair.iter_mut().enumerate() {
            *slot = doubled * params.doubled_pawns[phase]
                + isolated * params.isolated_pawns[phase]
                + chained * params.chained_pawns[phase]
                + passing * params.passing_pawns[phase];
        }
        pair
    }

    /// Pawn structure as `[opening, ending]`, White minus Black.
    #[must_use]
    pub fn eval_pawn_structure(&self) -> [i32; 2] {
        let white = self.pawn_structure_for(Color::White);
        let black = self.pawn_structure_for(Color::Black);
        [white[0] - black[0], white[1] - black[1]]
    }
}

//! King safety: enemy pressure around the king, the pawn shield and castling status.

use crate::board::{Bitboard, Board, Color, Piece};

impl Board {
    fn king_safety_for(&self, color: Color, enemy_attacks: Bitboard) -> [i32; 2] {
        let Some(king) = self.king_square(color) else {
            return [0; 2];
        };
        let params = self.tables.params();
        let zone = self.tables.attacks().king_attacks(king);

        let danger = (zone & enemy_attacks).popcount() as i32;
        let shield = (zone & self.pieces(color, Piece::Pawn)).popcount() as i32;

        let castling = if self.has_castled(color) {
            params.castling_done
        } else if !self.castling_rights().has(color, true) && !self.castling_rights().has(color, false) {
            params.castling_failed
        } else {
            [0; 2]
        };

        let mut pair = [0; 2];
        for (phase, slot) in pair.iter_mut().enumerate() {
            *slot = danger * params.king_in_danger[phase]
                + shield * params.pawn_shield[phase]
                + castling[phase];
        }
        pair
    }

    /// King safety as `[opening, ending]`, White minus Black. `attacked` holds
    /// the squares attacked by each side's pieces, indexed by color.
    pub(crate) fn eval_king_safety(&self, attacked: &[Bitboard; 2]) -> [i32; 2] {
        let white = self.king_safety_for(Color::White, attacked[Color::Black.index()]);
        let black = self.king_safety_for(Color::Black, attacked[Color::White.index()]);
        [white[0] - black[0], white[1] - black[1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::tables;
    use crate::board::EvalParams;

    #[test]
    fn shield_and_castling_status() {
        let p = EvalParams::default();
        // white has castled behind three pawns, black has lost its rights
        let mut b = Board::from_fen("4k3/8/8/8/8/8/5PPP/4K2R w K - 0 1", tables()).expect("fen");
        let castle = b.parse_move("e1g1").expect("legal");
        b.make_move(castle);
        let pair = b.eval_king_safety(&[Bitboard::EMPTY; 2]);
        let white = 3 * p.pawn_shield[0] + p.castling_done[0];
        let black = p.castling_failed[0];
        assert_eq!(pair[0], white - black);
    }

    #[test]
    fn attacked_zone_squares_count() {
        let p = EvalParams::default();
        let b = Board::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1", tables()).expect("fen");
        let mut attacked = [Bitboard::EMPTY; 2];
        attacked[Color::Black.index()] = Bitboard::RANK_2;
        let pair = b.eval_king_safety(&attacked);
        // d2, e2, f2 next to the white king
        assert_eq!(pair[1], 3 * p.king_in_danger[1]);
    }
}

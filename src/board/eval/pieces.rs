//! Mobility, rook file and bishop terms.

use crate::board::{Bitboard, Board, Color, Piece};

const LONG_DIAGONALS: Bitboard = Bitboard(0x8040_2010_0804_0201 | 0x0102_0408_1020_4080);

/// Mobility score plus the squares each side's pieces attack, reused by king safety.
pub(crate) struct Mobility {
    pub(crate) score: [i32; 2],
    pub(crate) attacked: [Bitboard; 2],
}

impl Board {
    fn mobility_for(&self, color: Color) -> (i32, Bitboard) {
        let attacks = self.tables.attacks();
        let occupied = self.all_occupied();
        let own = self.occupancy(color);
        let mut reachable = 0;
        let mut attacked = Bitboard::EMPTY;

        for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
            for sq in self.pieces(color, piece) {
                let targets = attacks.piece_attacks(piece, sq, occupied);
                attacked |= targets;
                reachable += (targets & !own).popcount() as i32;
            }
        }
        (reachable, attacked)
    }

    pub(crate) fn eval_mobility(&self) -> Mobility {
        let weights = self.tables.params().mobility;
        let (white, white_attacked) = self.mobility_for(Color::White);
        let (black, black_attacked) = self.mobility_for(Color::Black);
        let diff = white - black;
        Mobility {
            score: [diff * weights[0], diff * weights[1]],
            attacked: [white_attacked, black_attacked],
        }
    }

    fn rooks_for(&self, color: Color) -> [i32; 2] {
        let params = self.tables.params();
        let own_pawns = self.pieces(color, Piece::Pawn);
        let enemy_pawns = self.pieces(color.opponent(), Piece::Pawn);
        let mut pair = [0; 2];

        for sq in self.pieces(color, Piece::Rook) {
            let file = Bitboard::file_mask(sq.file());
            if (file & own_pawns).is_not_empty() {
                continue;
            }
            let bonus = if (file & enemy_pawns).is_empty() {
                params.rook_open_file
            } else {
                params.rook_semi_open_file
            };
            pair[0] += bonus[0];
            pair[1] += bonus[1];
        }
        pair
    }

    /// Rooks on open and semi-open files, White minus Black.
    pub(crate) fn eval_rooks(&self) -> [i32; 2] {
        let white = self.rooks_for(Color::White);
        let black = self.rooks_for(Color::Black);
        [white[0] - black[0], white[1] - black[1]]
    }

    fn bishops_for(&self, color: Color) -> [i32; 2] {
        let params = self.tables.params();
        let bishops = self.pieces(color, Piece::Bishop);
        let on_diagonal = (bishops & LONG_DIAGONALS).popcount() as i32;
        let pair_bonus = i32::from(bishops.popcount() >= 2);

        [
            pair_bonus * params.bishop_pair[0] + on_diagonal * params.bishop_long_diagonal[0],
            pair_bonus * params.bishop_pair[1] + on_diagonal * params.bishop_long_diagonal[1],
        ]
    }

    /// Bishop pair and long-diagonal bishops, White minus Black.
    pub(crate) fn eval_bishops(&self) -> [i32; 2] {
        let white = self.bishops_for(Color::White);
        let black = self.bishops_for(Color::Black);
        [white[0] - black[0], white[1] - black[1]]
    }
}

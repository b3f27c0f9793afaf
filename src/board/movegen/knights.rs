use super::super::{Bitboard, Board, Move, MoveList, Square};
use super::GenKind;
use crate::board::Piece;

impl Board {
    pub(super) fn knight_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        for from in self.pieces(us, Piece::Knight) {
            let attacks = self.tables.attacks().knight_attacks(from);
            self.push_targets(from, attacks, kind, moves);
        }
    }

    /// One move per destination in `attacks`, flagged as capture or quiet.
    pub(super) fn push_targets(&self, from: Square, attacks: Bitboard, kind: GenKind, moves: &mut MoveList) {
        let enemies = self.occupancy(self.side_to_move().opponent());
        if kind.loud() {
            for to in attacks & enemies {
                moves.push(Move::capture(from, to));
            }
        }
        if kind.quiet() {
            for to in attacks & !self.all_occupied() {
                moves.push(Move::quiet(from, to));
            }
        }
    }
}

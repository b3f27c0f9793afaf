use super::super::{Board, MoveList, Piece};
use super::GenKind;

impl Board {
    pub(super) fn slider_moves(&self, piece: Piece, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        let occupied = self.all_occupied();
        let tables = self.tables.attacks();
        for from in self.pieces(us, piece) {
            let attacks = tables.piece_attacks(piece, from, occupied);
            self.push_targets(from, attacks, kind, moves);
        }
    }
}

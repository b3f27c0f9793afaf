use super::super::{Board, Move, MoveList, PROMOTION_PIECES};
use super::GenKind;
use crate::board::Piece;

impl Board {
    pub(super) fn pawn_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        let enemies = self.occupancy(us.opponent());
        let attacks = self.tables.attacks();

        for from in self.pieces(us, Piece::Pawn) {
            let to = from.offset(us.pawn_push());
            let promotes = to.rank() == us.promotion_rank();

            if self.piece_at(to).is_none() {
                if promotes {
                    if kind.loud() {
                        for piece in PROMOTION_PIECES {
                            moves.push(Move::new_promotion(from, to, piece));
                        }
                    }
                } else if kind.quiet() {
                    moves.push(Move::quiet(from, to));
                    if from.rank() == us.pawn_start_rank() {
                        let double = to.offset(us.pawn_push());
                        if self.piece_at(double).is_none() {
                            moves.push(Move::double_pawn_push(from, double));
                        }
                    }
                }
            }

            if !kind.loud() {
                continue;
            }
            let targets = attacks.pawn_attacks(us, from);
            for to in targets & enemies {
                if promotes {
                    for piece in PROMOTION_PIECES {
                        moves.push(Move::new_promotion_capture(from, to, piece));
                    }
                } else {
                    moves.push(Move::capture(from, to));
                }
            }
            if let Some(ep) = (targets & self.en_passant).lsb() {
                moves.push(Move::en_passant(from, ep));
            }
        }
    }
}

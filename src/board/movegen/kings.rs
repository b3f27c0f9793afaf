use super::super::make_unmake::castle_squares;
use super::super::{Bitboard, Board, Color, Move, MoveList, Piece, Square};
use super::GenKind;

impl Board {
    pub(super) fn king_moves(&self, kind: GenKind, moves: &mut MoveList) {
        let us = self.side_to_move();
        let Some(from) = self.king_square(us) else {
            return;
        };
        let attacks = self.tables.attacks().king_attacks(from);
        self.push_targets(from, attacks, kind, moves);

        if kind.quiet() {
            self.castling_moves(us, moves);
        }
    }

    fn castling_moves(&self, us: Color, moves: &mut MoveList) {
        let them = us.opponent();
        for kingside in [true, false] {
            if !self.castling.has(us, kingside) {
                continue;
            }
            let (king_from, king_to, rook_from, _) = castle_squares(us, kingside);
            if (between(king_from, rook_from) & self.all_occupied()).is_not_empty() {
                continue;
            }
            // start, transit and destination squares must be safe
            let transit = Square::from_index((king_from.index() + king_to.index()) / 2);
            if [king_from, transit, king_to]
                .iter()
                .any(|&sq| self.is_field_attacked(them, sq))
            {
                continue;
            }
            moves.push(if kingside {
                Move::castle_kingside(king_from, king_to)
            } else {
                Move::castle_queenside(king_from, king_to)
            });
        }
    }

    /// Whether any piece of `by` attacks `sq` under the current occupancy.
    #[inline(never)]
    #[must_use]
    pub fn is_field_attacked(&self, by: Color, sq: Square) -> bool {
        let attacks = self.tables.attacks();
        let occupied = self.all_occupied();

        if (attacks.pawn_attacks(by.opponent(), sq) & self.pieces(by, Piece::Pawn)).is_not_empty() {
            return true;
        }
        if (attacks.knight_attacks(sq) & self.pieces(by, Piece::Knight)).is_not_empty() {
            return true;
        }
        if (attacks.king_attacks(sq) & self.pieces(by, Piece::King)).is_not_empty() {
            return true;
        }

        let queens = self.pieces(by, Piece::Queen);
        let rook_like = self.pieces(by, Piece::Rook) | queens;
        if (attacks.rook_attacks(sq, occupied) & rook_like).is_not_empty() {
            return true;
        }
        let bishop_like = self.pieces(by, Piece::Bishop) | queens;
        (attacks.bishop_attacks(sq, occupied) & bishop_like).is_not_empty()
    }

    /// Bitmask of the piece types of `by` that attack `sq` (bit n = piece index n).
    #[must_use]
    pub fn attacking_piece_mask(&self, by: Color, sq: Square) -> u8 {
        let attacks = self.tables.attacks();
        let occupied = self.all_occupied();
        let mut mask = 0u8;

        let mut mark = |piece: Piece, from: Bitboard| {
            if (from & self.pieces(by, piece)).is_not_empty() {
                mask |= 1 << piece.index();
            }
        };
        mark(Piece::Pawn, attacks.pawn_attacks(by.opponent(), sq));
        mark(Piece::Knight, attacks.knight_attacks(sq));
        mark(Piece::Bishop, attacks.bishop_attacks(sq, occupied));
        mark(Piece::Rook, attacks.rook_attacks(sq, occupied));
        mark(Piece::Queen, attacks.queen_attacks(sq, occupied));
        mark(Piece::King, attacks.king_attacks(sq));
        mask
    }

    #[must_use]
    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_field_attacked(color.opponent(), king),
            None => false,
        }
    }
}

/// Squares strictly between two squares on the same rank
fn between(a: Square, b: Square) -> Bitboard {
    let (lo, hi) = if a.index() < b.index() {
        (a.index(), b.index())
    } else {
        (b.index(), a.index())
    };
    let mut bb = Bitboard::EMPTY;
    for idx in lo + 1..hi {
        bb |= Bitboard::from_square(Square::from_index(idx));
    }
    bb
}

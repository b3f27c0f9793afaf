use super::state::UndoFrame;
use super::{Bitboard, Board, Color, Move, Piece, Square};

/// King and rook squares for castling: `[color][kingside as usize]`
/// as `(king_from, king_to, rook_from, rook_to)`.
const CASTLE_SQUARES: [[(Square, Square, Square, Square); 2]; 2] = [
    [
        (Square::E1, Square::C1, Square::A1, Square::D1),
        (Square::E1, Square::G1, Square::H1, Square::F1),
    ],
    [
        (Square::E8, Square::C8, Square::A8, Square::D8),
        (Square::E8, Square::G8, Square::H8, Square::F8),
    ],
];

#[inline]
pub(crate) const fn castle_squares(color: Color, kingside: bool) -> (Square, Square, Square, Square) {
    CASTLE_SQUARES[color.index()][kingside as usize]
}

/// Castling right that is lost when a rook leaves or is captured on `sq`.
#[inline]
fn corner_right(sq: Square) -> Option<(Color, bool)> {
    match sq {
        Square::A1 => Some((Color::White, false)),
        Square::H1 => Some((Color::White, true)),
        Square::A8 => Some((Color::Black, false)),
        Square::H8 => Some((Color::Black, true)),
        _ => None,
    }
}

impl Board {
    /// Apply `mv` for the side to move, pushing an undo frame.
    ///
    /// # Panics
    /// Panics if the move has a reserved flag, its origin is empty, or the
    /// undo stack is full. Legality is not checked.
    pub fn make_move(&mut self, mv: Move) {
        assert!(mv.has_valid_flag(), "make_move: reserved move flag in {mv:?}");
        let us = self.side_to_move;
        let them = us.opponent();
        let (from, to) = (mv.from(), mv.to());
        let Some((_, piece)) = self.piece_at(from) else {
            panic!("make_move: no piece on {from} for {mv}");
        };

        let mut frame = UndoFrame {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            hash: self.hash,
            pawn_hash: self.pawn_hash,
            irreversible_moves: self.irreversible_moves,
        };

        if let Some(ep) = self.en_passant.lsb() {
            self.hash ^= self.tables.zobrist().en_passant(ep);
            self.en_passant = Bitboard::EMPTY;
        }

        self.irreversible_moves += 1;
        if piece == Piece::Pawn {
            self.irreversible_moves = 0;
        }

        if mv.is_castling() {
            let (king_from, king_to, rook_from, rook_to) =
                castle_squares(us, mv.is_castle_kingside());
            self.move_piece(us, Piece::King, king_from, king_to);
            self.move_piece(us, Piece::Rook, rook_from, rook_to);
            self.castling_done[us.index()] = true;
        } else if mv.is_en_passant() {
            let victim = to.offset(-us.pawn_push());
            self.remove_piece(them, Piece::Pawn, victim);
            self.move_piece(us, Piece::Pawn, from, to);
            frame.captured = Some(Piece::Pawn);
        } else {
            if mv.is_capture() {
                let Some((_, victim)) = self.piece_at(to) else {
                    panic!("make_move: capture {mv} has no victim");
                };
                self.remove_piece(them, victim, to);
                frame.captured = Some(victim);
                self.irreversible_moves = 0;
                if victim == Piece::Rook {
                    if let Some((color, kingside)) = corner_right(to) {
                        self.castling.remove(color, kingside);
                    }
                }
            }

            if let Some(promoted) = mv.promotion() {
                self.remove_piece(us, Piece::Pawn, from);
                self.add_piece(us, promoted, to);
            } else {
                self.move_piece(us, piece, from, to);
            }

            if mv.is_double_pawn_push() {
                let target = from.offset(us.pawn_push());
                self.en_passant = Bitboard::from_square(target);
                self.hash ^= self.tables.zobrist().en_passant(target);
            }
        }

        match piece {
            Piece::King => self.castling.remove_color(us),
            Piece::Rook => {
                if let Some((color, kingside)) = corner_right(from) {
                    self.castling.remove(color, kingside);
                }
            }
            _ => {}
        }
        if self.castling != frame.castling {
            let z = self.tables.zobrist();
            self.hash ^= z.castling(frame.castling) ^ z.castling(self.castling);
        }

        if us == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = them;
        self.hash ^= self.tables.zobrist().side_to_move();

        self.history.push(frame);
    }

    /// Reverse the most recent [`Board::make_move`], which must have been `mv`.
    ///
    /// # Panics
    /// Panics if the undo stack is empty.
    pub fn undo_move(&mut self, mv: Move) {
        self.side_to_move = self.side_to_move.opponent();
        let us = self.side_to_move;
        let them = us.opponent();
        let frame = self.history.pop();
        let (from, to) = (mv.from(), mv.to());

        if mv.is_castling() {
            let (king_from, king_to, rook_from, rook_to) =
                castle_squares(us, mv.is_castle_kingside());
            self.move_piece(us, Piece::King, king_to, king_from);
            self.move_piece(us, Piece::Rook, rook_to, rook_from);
            self.castling_done[us.index()] = false;
        } else if mv.is_en_passant() {
            self.move_piece(us, Piece::Pawn, to, from);
            self.add_piece(them, Piece::Pawn, to.offset(-us.pawn_push()));
        } else {
            if let Some(promoted) = mv.promotion() {
                self.remove_piece(us, promoted, to);
                self.add_piece(us, Piece::Pawn, from);
            } else {
                let Some((_, piece)) = self.piece_at(to) else {
                    panic!("undo_move: no piece on {to} for {mv}");
                };
                self.move_piece(us, piece, to, from);
            }
            if let Some(victim) = frame.captured {
                self.add_piece(them, victim, to);
            }
        }

        if us == Color::Black {
            self.fullmove_number -= 1;
        }
        self.castling = frame.castling;
        self.en_passant = frame.en_passant;
        self.irreversible_moves = frame.irreversible_moves;
        self.hash = frame.hash;
        self.pawn_hash = frame.pawn_hash;
    }

    /// Pass the turn without moving. Only the hash and en passant state change.
    ///
    /// # Panics
    /// Panics if the undo stack is full.
    pub fn make_null_move(&mut self) {
        self.history.push(UndoFrame {
            captured: None,
            castling: self.castling,
            en_passant: self.en_passant,
            hash: self.hash,
            pawn_hash: self.pawn_hash,
            irreversible_moves: self.irreversible_moves,
        });

        if let Some(ep) = self.en_passant.lsb() {
            self.hash ^= self.tables.zobrist().en_passant(ep);
            self.en_passant = Bitboard::EMPTY;
        }
        self.side_to_move = self.side_to_move.opponent();
        self.hash ^= self.tables.zobrist().side_to_move();
        self.null_moves += 1;
    }

    /// Reverse the most recent [`Board::make_null_move`].
    ///
    /// # Panics
    /// Panics if the undo stack is empty.
    pub fn undo_null_move(&mut self) {
        self.side_to_move = self.side_to_move.opponent();
        let frame = self.history.pop();
        self.en_passant = frame.en_passant;
        self.hash = frame.hash;
        self.null_moves -= 1;
    }
}

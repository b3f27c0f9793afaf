//! Move generation.
//!
//! Pseudo-legal moves are produced per piece type into a caller-owned
//! [`MoveList`] against a target mask: enemy pieces for loud generation,
//! empty squares for quiet generation, both for full generation. Legality is
//! enforced by [`Board::generate_moves`] and friends, which play each
//! candidate, reject those leaving the mover's king attacked and undo it
//! before returning.

mod kings;
mod knights;
mod pawns;
mod sliders;

use super::{Board, Move, MoveList, Piece};

/// Which slice of the pseudo-legal moves to produce
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GenKind {
    All,
    /// Captures, en passant and promotions
    Loud,
    /// Everything else, castling and double pushes included
    Quiet,
}

impl GenKind {
    #[inline]
    fn loud(self) -> bool {
        self != GenKind::Quiet
    }

    #[inline]
    fn quiet(self) -> bool {
        self != GenKind::Loud
    }
}

impl Board {
    fn generate_into(&self, kind: GenKind, moves: &mut MoveList) {
        self.pawn_moves(kind, moves);
        self.knight_moves(kind, moves);
        for piece in [Piece::Bishop, Piece::Rook, Piece::Queen] {
            self.slider_moves(piece, kind, moves);
        }
        self.king_moves(kind, moves);
    }

    /// All pseudo-legal moves for the side to move.
    #[must_use]
    pub fn generate_pseudo_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(GenKind::All, &mut moves);
        moves
    }

    /// Pseudo-legal captures, en passant captures and promotions.
    #[must_use]
    pub fn generate_loud_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(GenKind::Loud, &mut moves);
        moves
    }

    /// Pseudo-legal moves that are not loud.
    #[must_use]
    pub fn generate_quiet_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        self.generate_into(GenKind::Quiet, &mut moves);
        moves
    }

    fn retain_legal(&mut self, pseudo: &MoveList) -> MoveList {
        let us = self.side_to_move();
        let mut legal = MoveList::new();
        for &mv in pseudo {
            self.make_move(mv);
            if !self.is_in_check(us) {
                legal.push(mv);
            }
            self.undo_move(mv);
        }
        legal
    }

    /// Legal moves for the side to move.
    pub fn generate_moves(&mut self) -> MoveList {
        let pseudo = self.generate_pseudo_moves();
        self.retain_legal(&pseudo)
    }

    /// Legal loud moves, the quiescence move set.
    pub fn generate_legal_loud_moves(&mut self) -> MoveList {
        let pseudo = self.generate_loud_moves();
        self.retain_legal(&pseudo)
    }

    /// Whether `mv` is legal here. Accepts arbitrary bit patterns, such as a
    /// move read back from a hash table slot shared with another position.
    pub fn is_move_legal(&mut self, mv: Move) -> bool {
        if mv.is_null() || !mv.has_valid_flag() {
            return false;
        }
        match self.piece_at(mv.from()) {
            Some((color, _)) if color == self.side_to_move() => {}
            _ => return false,
        }
        self.generate_moves().contains(mv)
    }

    pub fn is_checkmate(&mut self) -> bool {
        self.is_in_check(self.side_to_move()) && self.generate_moves().is_empty()
    }

    pub fn is_stalemate(&mut self) -> bool {
        !self.is_in_check(self.side_to_move()) && self.generate_moves().is_empty()
    }
}

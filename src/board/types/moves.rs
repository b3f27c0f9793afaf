//! Move encoding and fixed-capacity move lists.

use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;

const SQUARE_MASK: u16 = 0x3F;
const KIND_SHIFT: u16 = 12;
const PROMOTION_BIT: u16 = 0b1000;
const PROMOTION_CAPTURE_BIT: u16 = 0b0100;

/// Promotion targets in encoding order.
const PROMOTION_ORDER: [Piece; 4] = [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen];

/// What a move does besides relocating a piece.
///
/// Codes 6 and 7 of the 4-bit kind field are unused and never produced by
/// the move generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Quiet,
    DoublePawnPush,
    CastleKingside,
    CastleQueenside,
    Capture,
    EnPassant,
    Promotion(Piece),
    PromotionCapture(Piece),
}

impl MoveKind {
    const fn code(self) -> u16 {
        match self {
            MoveKind::Quiet => 0,
            MoveKind::DoublePawnPush => 1,
            MoveKind::CastleKingside => 2,
            MoveKind::CastleQueenside => 3,
            MoveKind::Capture => 4,
            MoveKind::EnPassant => 5,
            MoveKind::Promotion(piece) => PROMOTION_BIT | promotion_code(piece),
            MoveKind::PromotionCapture(piece) => PROMOTION_BIT | PROMOTION_CAPTURE_BIT | promotion_code(piece),
        }
    }

    const fn from_code(code: u16) -> Option<Self> {
        if code & PROMOTION_BIT != 0 {
            let piece = PROMOTION_ORDER[(code & 0b11) as usize];
            return Some(if code & PROMOTION_CAPTURE_BIT != 0 {
                MoveKind::PromotionCapture(piece)
            } else {
                MoveKind::Promotion(piece)
            });
        }
        match code {
            0 => Some(MoveKind::Quiet),
            1 => Some(MoveKind::DoublePawnPush),
            2 => Some(MoveKind::CastleKingside),
            3 => Some(MoveKind::CastleQueenside),
            4 => Some(MoveKind::Capture),
            5 => Some(MoveKind::EnPassant),
            _ => None,
        }
    }
}

const fn promotion_code(piece: Piece) -> u16 {
    match piece {
        Piece::Knight => 0,
        Piece::Bishop => 1,
        Piece::Rook => 2,
        Piece::Queen => 3,
        Piece::Pawn | Piece::King => panic!("invalid promotion piece"),
    }
}

/// A move packed into 16 bits: source square in bits 0-5, destination in
/// bits 6-11 and the [`MoveKind`] code in bits 12-15.
///
/// Moves carry no board state; the moving and captured pieces are looked up
/// on the board when the move is played.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// All-zero placeholder, `a1a1` quiet. Never legal.
    #[inline]
    #[must_use]
    pub const fn null() -> Self {
        Move(0)
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// # Panics
    /// Panics when `kind` promotes to a pawn or king.
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, kind: MoveKind) -> Self {
        Move(from.index() as u16 | ((to.index() as u16) << 6) | (kind.code() << KIND_SHIFT))
    }

    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::Quiet)
    }

    #[inline]
    #[must_use]
    pub const fn capture(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::Capture)
    }

    #[inline]
    #[must_use]
    pub const fn double_pawn_push(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::DoublePawnPush)
    }

    #[inline]
    #[must_use]
    pub const fn en_passant(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::EnPassant)
    }

    /// King move of a kingside castle; the rook follows implicitly.
    #[inline]
    #[must_use]
    pub const fn castle_kingside(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::CastleKingside)
    }

    #[inline]
    #[must_use]
    pub const fn castle_queenside(from: Square, to: Square) -> Self {
        Move::new(from, to, MoveKind::CastleQueenside)
    }

    /// # Panics
    /// Panics if `piece` is not a legal promotion target.
    #[inline]
    #[must_use]
    pub const fn new_promotion(from: Square, to: Square, piece: Piece) -> Self {
        Move::new(from, to, MoveKind::Promotion(piece))
    }

    /// # Panics
    /// Panics if `piece` is not a legal promotion target.
    #[inline]
    #[must_use]
    pub const fn new_promotion_capture(from: Square, to: Square, piece: Piece) -> Self {
        Move::new(from, to, MoveKind::PromotionCapture(piece))
    }

    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.0 & SQUARE_MASK) as usize)
    }

    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.0 >> 6) & SQUARE_MASK) as usize)
    }

    /// Decoded kind, `None` for the two unused codes.
    #[inline]
    #[must_use]
    pub const fn kind(self) -> Option<MoveKind> {
        MoveKind::from_code(self.0 >> KIND_SHIFT)
    }

    #[inline]
    #[must_use]
    pub const fn has_valid_flag(self) -> bool {
        self.kind().is_some()
    }

    /// Captures a piece, en passant included.
    #[inline]
    #[must_use]
    pub const fn is_capture(self) -> bool {
        matches!(
            self.kind(),
            Some(MoveKind::Capture | MoveKind::EnPassant | MoveKind::PromotionCapture(_))
        )
    }

    #[inline]
    #[must_use]
    pub const fn is_en_passant(self) -> bool {
        matches!(self.kind(), Some(MoveKind::EnPassant))
    }

    #[inline]
    #[must_use]
    pub const fn is_castling(self) -> bool {
        matches!(self.kind(), Some(MoveKind::CastleKingside | MoveKind::CastleQueenside))
    }

    #[inline]
    #[must_use]
    pub const fn is_castle_kingside(self) -> bool {
        matches!(self.kind(), Some(MoveKind::CastleKingside))
    }

    #[inline]
    #[must_use]
    pub const fn is_castle_queenside(self) -> bool {
        matches!(self.kind(), Some(MoveKind::CastleQueenside))
    }

    #[inline]
    #[must_use]
    pub const fn is_double_pawn_push(self) -> bool {
        matches!(self.kind(), Some(MoveKind::DoublePawnPush))
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        self.promotion().is_some()
    }

    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        match self.kind() {
            Some(MoveKind::Promotion(piece) | MoveKind::PromotionCapture(piece)) => Some(piece),
            _ => None,
        }
    }

    /// Plain relocation or double push; castling is neither quiet nor loud.
    #[inline]
    #[must_use]
    pub const fn is_quiet(self) -> bool {
        matches!(self.kind(), Some(MoveKind::Quiet | MoveKind::DoublePawnPush))
    }

    /// Capture or promotion, the moves quiescence search looks at.
    #[inline]
    #[must_use]
    pub const fn is_loud(self) -> bool {
        self.is_capture() || self.is_promotion()
    }

    /// Raw encoding, for table storage.
    #[inline]
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        Move(value)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "Move({}{} {:?})", self.from(), self.to(), kind),
            None => write!(f, "Move({:#06x})", self.0),
        }
    }
}

/// Long algebraic notation: `e2e4`, `e7e8q`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(piece) = self.promotion() {
            write!(f, "{}", piece.to_char())?;
        }
        Ok(())
    }
}

/// Upper bound on legal moves in any chess position is 218.
pub(crate) const MAX_MOVES: usize = 256;
/// Deepest ply the search tables are sized for
pub const MAX_PLY: usize = 128;
pub(crate) const EMPTY_MOVE: Move = Move::null();

/// Moves of one position, stored inline.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub(crate) fn new() -> Self {
        MoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, mv: Move) {
        self.moves[self.len] = mv;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }

    #[must_use]
    pub fn get(&self, idx: usize) -> Option<Move> {
        self.as_slice().get(idx).copied()
    }

    #[must_use]
    pub fn first(&self) -> Option<Move> {
        self.get(0)
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(ToString::to_string)).finish()
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.as_slice()[idx]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`MoveList`].
pub struct MoveListIntoIter {
    list: MoveList,
    next: usize,
}

impl Iterator for MoveListIntoIter {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let mv = self.list.get(self.next)?;
        self.next += 1;
        Some(mv)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.list.len - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MoveListIntoIter {}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = MoveListIntoIter;

    fn into_iter(self) -> Self::IntoIter {
        MoveListIntoIter { list: self, next: 0 }
    }
}

/// A move with its ordering score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Moves paired with ordering scores, consumed best-first.
#[derive(Clone)]
pub struct ScoredMoveList {
    moves: [Move; MAX_MOVES],
    scores: [i32; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [EMPTY_MOVE; MAX_MOVES],
            scores: [0; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        self.moves[self.len] = mv;
        self.scores[self.len] = score;
        self.len += 1;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Selection step: swap the best entry at or after `start` into `start`
    /// and return it. Earlier entries are left alone, so a cutoff never pays
    /// for sorting the tail.
    pub fn pick_best(&mut self, start: usize) -> Option<ScoredMove> {
        if start >= self.len {
            return None;
        }
        let tail = &self.scores[start..self.len];
        let offset = tail
            .iter()
            .enumerate()
            .fold(0, |best, (i, &score)| if score > tail[best] { i } else { best });
        let best = start + offset;
        self.moves.swap(start, best);
        self.scores.swap(start, best);
        Some(ScoredMove {
            mv: self.moves[start],
            score: self.scores[start],
        })
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn encodes_squares_and_kind() {
        let mv = Move::new_promotion_capture(sq("b7"), sq("a8"), Piece::Knight);
        assert_eq!(mv.from(), sq("b7"));
        assert_eq!(mv.to(), sq("a8"));
        assert_eq!(mv.kind(), Some(MoveKind::PromotionCapture(Piece::Knight)));
        assert!(mv.is_capture());
        assert_eq!(mv.promotion(), Some(Piece::Knight));
        assert_eq!(mv.to_string(), "b7a8n");
        assert_eq!(Move::from_u16(mv.as_u16()), mv);
    }

    #[test]
    fn every_promotion_piece_survives_encoding() {
        for piece in PROMOTION_ORDER {
            let quiet = Move::new_promotion(sq("e7"), sq("e8"), piece);
            assert_eq!(quiet.kind(), Some(MoveKind::Promotion(piece)));
            assert!(!quiet.is_capture());
        }
    }

    #[test]
    fn unused_codes_are_rejected() {
        let legal = Move::quiet(sq("e2"), sq("e3"));
        for code in [6u16, 7] {
            let raw = Move::from_u16(legal.as_u16() | (code << KIND_SHIFT));
            assert_eq!(raw.kind(), None);
            assert!(!raw.has_valid_flag());
        }
    }

    #[test]
    fn quiet_and_loud_classification() {
        assert!(Move::double_pawn_push(sq("e2"), sq("e4")).is_quiet());
        assert!(!Move::en_passant(sq("e5"), sq("d6")).is_quiet());
        assert!(Move::en_passant(sq("e5"), sq("d6")).is_loud());
        let castle = Move::castle_kingside(sq("e1"), sq("g1"));
        assert!(!castle.is_loud() && !castle.is_quiet());
    }

    #[test]
    fn pick_best_selects_highest_remaining() {
        let mut list = ScoredMoveList::new();
        list.push(Move::quiet(sq("a2"), sq("a3")), 5);
        list.push(Move::quiet(sq("b2"), sq("b3")), 50);
        list.push(Move::quiet(sq("c2"), sq("c3")), 20);
        assert_eq!(list.pick_best(0).map(|m| m.score), Some(50));
        assert_eq!(list.pick_best(1).map(|m| m.score), Some(20));
        assert_eq!(list.pick_best(2).map(|m| m.mv), Some(Move::quiet(sq("a2"), sq("a3"))));
        assert!(list.pick_best(3).is_none());
    }
}

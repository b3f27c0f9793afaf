use std::fmt;
use std::sync::Arc;

use crate::tables::Tables;

use super::{Bitboard, CastlingRights, Color, Piece, Square, MAX_PLY};

/// Committed plies kept for repetition detection.
pub const REPETITION_WINDOW: usize = 8;

/// Capacity of the undo stack: one full search line plus uncommitted game moves.
pub const MAX_HISTORY: usize = 2 * MAX_PLY;

/// State needed to reverse one move (or null move).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct UndoFrame {
    pub(crate) captured: Option<Piece>,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Bitboard,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
    pub(crate) irreversible_moves: u32,
}

/// Fixed-capacity LIFO of undo frames.
#[derive(Clone)]
pub(crate) struct UndoStack {
    frames: Box<[UndoFrame]>,
    len: usize,
}

impl UndoStack {
    fn new() -> Self {
        UndoStack {
            frames: vec![UndoFrame::default(); MAX_HISTORY].into_boxed_slice(),
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, frame: UndoFrame) {
        assert!(self.len < MAX_HISTORY, "undo stack overflow");
        self.frames[self.len] = frame;
        self.len += 1;
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> UndoFrame {
        assert!(self.len > 0, "undo stack underflow");
        self.len -= 1;
        self.frames[self.len]
    }

    /// Frame `back` entries below the top (0 = most recent)
    #[inline]
    pub(crate) fn peek(&self, back: usize) -> Option<&UndoFrame> {
        if back < self.len {
            Some(&self.frames[self.len - 1 - back])
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Drop all but the `keep` most recent frames.
    pub(crate) fn keep_recent(&mut self, keep: usize) {
        if self.len > keep {
            self.frames.copy_within(self.len - keep..self.len, 0);
            self.len = keep;
        }
    }
}

impl fmt::Debug for UndoStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.frames[..self.len]).finish()
    }
}

/// Bitboard position with incrementally maintained hashes and evaluation accumulators.
#[derive(Clone)]
pub struct Board {
    pub(crate) pieces: [[Bitboard; 6]; 2],
    pub(crate) occupied: [Bitboard; 2],
    pub(crate) all_occupied: Bitboard,
    pub(crate) squares: [Option<(Color, Piece)>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) en_passant: Bitboard,
    pub(crate) castling: CastlingRights,
    pub(crate) castling_done: [bool; 2],
    /// Half-moves since the last pawn move or capture
    pub(crate) irreversible_moves: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) hash: u64,
    pub(crate) pawn_hash: u64,
    pub(crate) material: [i32; 2],
    // position[color][phase]
    pub(crate) position: [[i32; 2]; 2],
    pub(crate) null_moves: u32,
    pub(crate) history: UndoStack,
    pub(crate) tables: Arc<Tables>,
}

impl Board {
    /// Empty board, White to move, no castling rights.
    #[must_use]
    pub fn empty(tables: Arc<Tables>) -> Self {
        Board {
            pieces: [[Bitboard::EMPTY; 6]; 2],
            occupied: [Bitboard::EMPTY; 2],
            all_occupied: Bitboard::EMPTY,
            squares: [None; 64],
            side_to_move: Color::White,
            en_passant: Bitboard::EMPTY,
            castling: CastlingRights::none(),
            castling_done: [false; 2],
            irreversible_moves: 0,
            fullmove_number: 1,
            hash: 0,
            pawn_hash: 0,
            material: [0; 2],
            position: [[0; 2]; 2],
            null_moves: 0,
            history: UndoStack::new(),
            tables,
        }
    }

    /// Place a piece, keeping bitboards, lookup, hashes and accumulators in sync.
    pub(crate) fn add_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        let c = color.index();
        self.pieces[c][piece.index()] |= bit;
        self.occupied[c] |= bit;
        self.all_occupied |= bit;
        self.squares[sq.index()] = Some((color, piece));

        let key = self.tables.zobrist().piece(color, piece, sq);
        self.hash ^= key;
        if piece == Piece::Pawn {
            self.pawn_hash ^= key;
        }

        let [opening, ending] = self.tables.pst(color, piece, sq);
        self.material[c] += self.tables.params().piece_value(piece);
        self.position[c][0] += opening;
        self.position[c][1] += ending;
    }

    pub(crate) fn remove_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        let bit = Bitboard::from_square(sq);
        let c = color.index();
        self.pieces[c][piece.index()] &= !bit;
        self.occupied[c] &= !bit;
        self.all_occupied &= !bit;
        self.squares[sq.index()] = None;

        let key = self.tables.zobrist().piece(color, piece, sq);
        self.hash ^= key;
        if piece == Piece::Pawn {
            self.pawn_hash ^= key;
        }

        let [opening, ending] = self.tables.pst(color, piece, sq);
        self.material[c] -= self.tables.params().piece_value(piece);
        self.position[c][0] -= opening;
        self.position[c][1] -= ending;
    }

    #[inline]
    pub(crate) fn move_piece(&mut self, color: Color, piece: Piece, from: Square, to: Square) {
        self.remove_piece(color, piece, from);
        self.add_piece(color, piece, to);
    }

    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    #[must_use]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    #[must_use]
    pub fn pawn_hash(&self) -> u64 {
        self.pawn_hash
    }

    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.squares[sq.index()]
    }

    #[inline]
    #[must_use]
    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()].map(|(_, piece)| piece)
    }

    #[inline]
    #[must_use]
    pub fn pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    #[inline]
    #[must_use]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn all_occupied(&self) -> Bitboard {
        self.all_occupied
    }

    #[inline]
    #[must_use]
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant.lsb()
    }

    #[inline]
    #[must_use]
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    #[must_use]
    pub fn has_castled(&self, color: Color) -> bool {
        self.castling_done[color.index()]
    }

    /// Half-moves since the last pawn move or capture
    #[inline]
    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.irreversible_moves
    }

    #[inline]
    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Material of one side, king included
    #[inline]
    #[must_use]
    pub fn material(&self, color: Color) -> i32 {
        self.material[color.index()]
    }

    /// Piece-square accumulator of one side as `[opening, ending]`
    #[inline]
    #[must_use]
    pub fn position_score(&self, color: Color) -> [i32; 2] {
        self.position[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn tables(&self) -> &Arc<Tables> {
        &self.tables
    }

    #[inline]
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, Piece::King).lsb()
    }

    /// Number of undo frames currently on the stack
    #[inline]
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Make the moves played so far part of the game.
    ///
    /// Only the last [`REPETITION_WINDOW`] plies stay on the undo stack, which
    /// is all repetition detection reads. Earlier moves can no longer be undone.
    pub fn commit_history(&mut self) {
        self.history.keep_recent(REPETITION_WINDOW);
    }

    #[inline]
    #[must_use]
    pub fn null_move_pending(&self) -> bool {
        self.null_moves > 0
    }

    /// Material without pawns and king, used for the game phase
    #[must_use]
    pub fn non_pawn_material(&self, color: Color) -> i32 {
        let params = self.tables.params();
        let pawns = self.pieces(color, Piece::Pawn).popcount() as i32;
        let kings = self.pieces(color, Piece::King).popcount() as i32;
        self.material(color)
            - pawns * params.piece_value(Piece::Pawn)
            - kings * params.piece_value(Piece::King)
    }

    /// Opening weight in `[0, 1]` from the weaker side's non-pawn material;
    /// the ending weight is `1 - ratio`.
    #[must_use]
    pub fn phase_ratio(&self) -> f32 {
        let params = self.tables.params();
        let weaker = self
            .non_pawn_material(Color::White)
            .min(self.non_pawn_material(Color::Black));
        let edge = params.endgame_material;
        let span = params.opening_material() - edge;
        if span <= 0 {
            return 0.0;
        }
        ((weaker - edge) as f32 / span as f32).clamp(0.0, 1.0)
    }

    /// True when the current hash equals the hashes four and eight plies back.
    ///
    /// Only those two fixed strides are inspected, so repetitions at other
    /// intervals go unnoticed. Never reports while a null move is pending.
    #[must_use]
    pub fn is_threefold_repetition(&self) -> bool {
        if self.null_moves != 0 || self.history.len() < REPETITION_WINDOW {
            return false;
        }
        match (self.history.peek(3), self.history.peek(7)) {
            (Some(four_back), Some(eight_back)) => {
                self.hash == four_back.hash && four_back.hash == eight_back.hash
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn is_fifty_move_draw(&self) -> bool {
        self.null_moves == 0 && self.irreversible_moves >= 100
    }

    /// Neither side can possibly mate: bare kings, or a single minor piece.
    #[must_use]
    pub fn is_insufficient_material(&self) -> bool {
        let heavy_or_pawns = [Piece::Pawn, Piece::Rook, Piece::Queen]
            .iter()
            .any(|&p| (self.pieces(Color::White, p) | self.pieces(Color::Black, p)).is_not_empty());
        if heavy_or_pawns {
            return false;
        }
        let minors = [Piece::Knight, Piece::Bishop]
            .iter()
            .map(|&p| (self.pieces(Color::White, p) | self.pieces(Color::Black, p)).popcount())
            .sum::<u32>();
        minors <= 1
    }

    /// Hash of the current position computed from scratch
    #[must_use]
    pub fn recompute_hash(&self) -> u64 {
        let z = self.tables.zobrist();
        let mut hash = 0u64;
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            if let Some((color, piece)) = self.piece_at(sq) {
                hash ^= z.piece(color, piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= z.side_to_move();
        }
        hash ^= z.castling(self.castling);
        if let Some(ep) = self.en_passant_square() {
            hash ^= z.en_passant(ep);
        }
        hash
    }

    /// Pawn-only hash computed from scratch
    #[must_use]
    pub fn recompute_pawn_hash(&self) -> u64 {
        let z = self.tables.zobrist();
        let mut hash = 0u64;
        for color in Color::BOTH {
            for sq in self.pieces(color, Piece::Pawn) {
                hash ^= z.piece(color, Piece::Pawn, sq);
            }
        }
        hash
    }

    /// Color-flipped mirror: every piece changes color and rank, the other side moves.
    #[must_use]
    pub fn mirror(&self) -> Board {
        let mut mirrored = Board::empty(Arc::clone(&self.tables));
        for idx in 0..64 {
            let sq = Square::from_index(idx);
            if let Some((color, piece)) = self.piece_at(sq) {
                mirrored.add_piece(color.opponent(), piece, sq.flip_vertical());
            }
        }
        mirrored.side_to_move = self.side_to_move.opponent();
        mirrored.castling = self.castling.mirrored();
        mirrored.castling_done = [self.castling_done[1], self.castling_done[0]];
        mirrored.en_passant = self.en_passant.flip_vertical();
        mirrored.irreversible_moves = self.irreversible_moves;
        mirrored.fullmove_number = self.fullmove_number;
        mirrored.hash = mirrored.recompute_hash();
        mirrored
    }

    /// Debug check that bitboards, lookup table and aggregates agree
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let mut union = [Bitboard::EMPTY; 2];
        for color in Color::BOTH {
            let mut seen = Bitboard::EMPTY;
            for piece in Piece::ALL {
                let bb = self.pieces(color, piece);
                if (seen & bb).is_not_empty() {
                    return false;
                }
                seen |= bb;
                for sq in bb {
                    if self.piece_at(sq) != Some((color, piece)) {
                        return false;
                    }
                }
            }
            union[color.index()] = seen;
        }
        let lookup_count = self.squares.iter().filter(|s| s.is_some()).count() as u32;
        union == self.occupied
            && (union[0] & union[1]).is_empty()
            && self.all_occupied == (union[0] | union[1])
            && lookup_count == self.all_occupied.popcount()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.to_fen())
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8 {
                let sq = Square::from_index(rank * 8 + file);
                let c = match self.piece_at(sq) {
                    Some((color, piece)) => piece.to_fen_char(color),
                    None => '.',
                };
                write!(f, "{c} ")?;
            }
            writeln!(f)?;
        }
        write!(f, "  a b c d e f g h")
    }
}

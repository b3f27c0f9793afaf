//! Move ordering utilities for search.

use super::constants::{CAPTURE_SCORE, HASH_MOVE_SCORE, KILLER_SCORE, KILLER_SLOTS, PROMOTION_SCORE};
use crate::board::{Board, Move, MoveList, ScoredMoveList, EMPTY_MOVE, MAX_PLY};

/// Quiet moves that caused a beta cutoff, two per ply.
pub struct KillerTable {
    slots: [[Move; KILLER_SLOTS]; MAX_PLY],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[EMPTY_MOVE; KILLER_SLOTS]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slots.get(ply).is_some_and(|row| row.contains(&mv))
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(EMPTY_MOVE, |row| row[1])
    }

    /// Record a cutoff move; the previous primary slides into the second slot.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    pub fn reset(&mut self) {
        for killers in &mut self.slots {
            *killers = [EMPTY_MOVE; KILLER_SLOTS];
        }
    }
}

/// Ordering score of a single move.
pub(super) fn move_score(board: &Board, mv: Move, hash_move: Option<Move>, killers: &KillerTable, ply: usize) -> i32 {
    if Some(mv) == hash_move {
        return HASH_MOVE_SCORE;
    }

    let mut score = 0;
    if let Some(piece) = mv.promotion() {
        score += PROMOTION_SCORE + board.tables().params().piece_value(piece);
    }
    if mv.is_capture() {
        score += CAPTURE_SCORE + board.see(mv);
    } else if !mv.is_promotion() && killers.is_killer(ply, mv) {
        score += KILLER_SCORE;
    }
    score
}

/// Score every move of `moves` for incremental best-first picking.
pub(super) fn score_moves(
    board: &Board,
    moves: &MoveList,
    hash_move: Option<Move>,
    killers: &KillerTable,
    ply: usize,
) -> ScoredMoveList {
    let mut scored = ScoredMoveList::new();
    for &mv in moves {
        scored.push(mv, move_score(board, mv, hash_move, killers, ply));
    }
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::tables;
    use crate::board::Square;

    #[test]
    fn killers_keep_two_most_recent() {
        let mut killers = KillerTable::new();
        let a = Move::quiet(Square::A1, Square::A8);
        let b = Move::quiet(Square::B1, Square::B8);
        let c = Move::quiet(Square::C1, Square::C8);
        killers.update(3, a);
        killers.update(3, a);
        assert_eq!(killers.secondary(3), EMPTY_MOVE);
        killers.update(3, b);
        killers.update(3, c);
        assert_eq!(killers.primary(3), c);
        assert_eq!(killers.secondary(3), b);
        assert!(!killers.is_killer(3, a));
        assert!(!killers.is_killer(4, c));
        killers.update(MAX_PLY, a);
        killers.reset();
        assert_eq!(killers.primary(3), EMPTY_MOVE);
    }

    #[test]
    fn hash_move_then_promotion_then_winning_capture() {
        // queen can take an undefended rook, pawn can promote
        let mut b = Board::from_fen("r3k3/1P6/8/8/8/8/8/Q3K3 w - - 0 1", tables()).expect("fen");
        let moves = b.generate_moves();
        let take = b.parse_move("a1a8").expect("legal");
        let promote = b.parse_move("b7b8q").expect("legal");
        let quiet = b.parse_move("e1d2").expect("legal");
        let mut killers = KillerTable::new();
        killers.update(0, quiet);

        let mut scored = score_moves(&b, &moves, Some(quiet), &killers, 0);
        assert_eq!(scored.pick_best(0).map(|s| s.mv), Some(quiet));
        assert!(move_score(&b, promote, None, &killers, 0) > move_score(&b, take, None, &killers, 0));
        assert!(move_score(&b, take, None, &killers, 0) > move_score(&b, quiet, None, &killers, 0));
        assert_eq!(move_score(&b, quiet, None, &killers, 0), KILLER_SCORE);
    }
}

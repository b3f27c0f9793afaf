//! Perft: exhaustive move tree walks used to verify the move generator and
//! the make/undo protocol against published node counts.

use std::ops::AddAssign;
use std::time::Instant;

use log::debug;

use crate::board::{Board, Move};

/// Leaf count of a perft walk split by the kind of the last move played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerftResult {
    pub leafs: u64,
    /// Includes en passant captures
    pub captures: u64,
    pub en_passants: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl AddAssign for PerftResult {
    fn add_assign(&mut self, other: Self) {
        self.leafs += other.leafs;
        self.captures += other.captures;
        self.en_passants += other.en_passants;
        self.castles += other.castles;
        self.promotions += other.promotions;
        self.checks += other.checks;
        self.checkmates += other.checkmates;
    }
}

/// Outcome of [`Board::verification_perft`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationResult {
    /// Nodes visited before finishing or hitting the first mismatch
    pub nodes: u64,
    /// FEN of the first position whose incremental state disagreed with a recomputation
    pub failing_fen: Option<String>,
}

impl VerificationResult {
    #[must_use]
    pub fn success(&self) -> bool {
        self.failing_fen.is_none()
    }
}

impl Board {
    /// Walk every legal line to `depth` plies and classify the final moves.
    pub fn perft(&mut self, depth: u32) -> PerftResult {
        let mut result = PerftResult::default();
        if depth == 0 {
            result.leafs = 1;
            return result;
        }

        let moves = self.generate_moves();
        for mv in moves {
            self.make_move(mv);
            if depth == 1 {
                self.classify_leaf(mv, &mut result);
            } else {
                result += self.perft(depth - 1);
            }
            self.undo_move(mv);
        }
        result
    }

    fn classify_leaf(&mut self, mv: Move, result: &mut PerftResult) {
        result.leafs += 1;
        if mv.is_capture() {
            result.captures += 1;
        }
        if mv.is_en_passant() {
            result.en_passants += 1;
        }
        if mv.is_castling() {
            result.castles += 1;
        }
        if mv.is_promotion() {
            result.promotions += 1;
        }
        if self.is_in_check(self.side_to_move()) {
            result.checks += 1;
            if self.generate_moves().is_empty() {
                result.checkmates += 1;
            }
        }
    }

    /// Leaf count only, counting the last ply in bulk.
    pub fn perft_leaves(&mut self, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }

        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }

        let mut nodes = 0;
        for mv in moves {
            self.make_move(mv);
            nodes += self.perft_leaves(depth - 1);
            self.undo_move(mv);
        }
        nodes
    }

    /// Leaf count below each root move, in generation order.
    pub fn divide(&mut self, depth: u32) -> Vec<(Move, u64)> {
        let start = Instant::now();
        let moves = self.generate_moves();
        let mut split = Vec::with_capacity(moves.len());

        for mv in moves {
            self.make_move(mv);
            let nodes = self.perft_leaves(depth.saturating_sub(1));
            self.undo_move(mv);
            debug!("{mv}: {nodes}");
            split.push((mv, nodes));
        }

        let total: u64 = split.iter().map(|(_, n)| n).sum();
        debug!("divide depth {depth}: {total} nodes in {:?}", start.elapsed());
        split
    }

    /// Perft walk that checks, at every node, the incremental hashes and the
    /// piece bookkeeping against a from-scratch recomputation.
    pub fn verification_perft(&mut self, depth: u32) -> VerificationResult {
        let mut result = VerificationResult::default();
        self.verify_node(depth, &mut result);
        result
    }

    fn verify_node(&mut self, depth: u32, result: &mut VerificationResult) {
        result.nodes += 1;
        if self.hash() != self.recompute_hash()
            || self.pawn_hash() != self.recompute_pawn_hash()
            || !self.is_consistent()
        {
            result.failing_fen = Some(self.to_fen());
            return;
        }
        if depth == 0 {
            return;
        }

        let moves = self.generate_moves();
        for mv in moves {
            self.make_move(mv);
            self.verify_node(depth - 1, result);
            self.undo_move(mv);
            if !result.success() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::tables;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen, tables()).expect("valid FEN")
    }

    #[test]
    fn startpos_categories() {
        let mut b = Board::startpos(tables());
        let result = b.perft(3);
        assert_eq!(
            result,
            PerftResult {
                leafs: 8902,
                captures: 34,
                en_passants: 0,
                castles: 0,
                promotions: 0,
                checks: 12,
                checkmates: 0,
            }
        );
        assert_eq!(b.perft(4).checkmates, 8);
    }

    #[test]
    fn kiwipete_categories() {
        let mut b = board("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let result = b.perft(2);
        assert_eq!(result.leafs, 2039);
        assert_eq!(result.captures, 351);
        assert_eq!(result.en_passants, 1);
        assert_eq!(result.castles, 91);
        assert_eq!(result.checks, 3);
        let deeper = b.perft(3);
        assert_eq!(deeper.captures, 17102);
        assert_eq!(deeper.en_passants, 45);
        assert_eq!(deeper.castles, 3162);
        assert_eq!(deeper.checks, 993);
        assert_eq!(deeper.checkmates, 1);
    }

    #[test]
    fn divide_sums_to_perft() {
        let mut b = board("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        let split = b.divide(3);
        assert_eq!(split.len(), 14);
        assert_eq!(split.iter().map(|(_, n)| n).sum::<u64>(), 2812);
    }

    #[test]
    fn depth_zero_is_one_leaf() {
        let mut b = Board::startpos(tables());
        assert_eq!(b.perft(0).leafs, 1);
        assert_eq!(b.perft_leaves(0), 1);
    }

    #[test]
    fn verification_walk_passes() {
        let mut b = board("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1");
        let result = b.verification_perft(3);
        assert!(result.success(), "{:?}", result.failing_fen);
        assert_eq!(result.nodes, 1 + 6 + 264 + 9467);
    }
}

//! Tapered static evaluation.
//!
//! Every term produces an `[opening, ending]` pair from White's point of
//! view. Pairs are blended with the board's phase ratio, summed with the
//! untapered material balance, and finally negated when Black is to move.
//!
//! Material and piece-square scores come from the board's incremental
//! accumulators. Pawn structure is cached in a [`PawnHashTable`]. Mobility,
//! king safety, rook and bishop terms are skipped in pure endgames.

mod king_safety;
mod pawn_structure;
pub(crate) mod params;
mod pieces;
mod texel;

pub use params::{EvalParams, ENDING, OPENING};
pub use texel::{texel_error, GameResult, LabeledPosition};

use crate::pawn_hash::PawnHashTable;

use super::{Board, Color};

/// Blend an `[opening, ending]` pair with the opening weight `phase`.
#[inline]
#[must_use]
pub fn taper(pair: [i32; 2], phase: f32) -> i32 {
    (pair[OPENING] as f32 * phase + pair[ENDING] as f32 * (1.0 - phase)) as i32
}

impl Board {
    /// Material balance, White minus Black
    #[inline]
    fn material_balance(&self) -> i32 {
        self.material(Color::White) - self.material(Color::Black)
    }

    fn position_balance(&self, phase: f32) -> i32 {
        taper(self.position_score(Color::White), phase) - taper(self.position_score(Color::Black), phase)
    }

    fn pawn_structure_cached(&self, pawns: &mut PawnHashTable) -> [i32; 2] {
        let key = self.pawn_hash();
        if let Some(entry) = pawns.probe(key) {
            return [entry.opening, entry.ending];
        }
        let pair = self.eval_pawn_structure();
        pawns.store(key, pair[OPENING], pair[ENDING]);
        pair
    }

    fn evaluate_white_with(&self, pawn_structure: [i32; 2]) -> i32 {
        let phase = self.phase_ratio();
        let mut score = self.material_balance();
        score += taper(pawn_structure, phase);
        score += self.position_balance(phase);

        if phase > 0.0 {
            let mobility = self.eval_mobility();
            score += taper(mobility.score, phase);
            score += taper(self.eval_king_safety(&mobility.attacked), phase);
            score += taper(self.eval_rooks(), phase);
            score += taper(self.eval_bishops(), phase);
        }
        score
    }
}

/// Full evaluation from White's point of view.
#[must_use]
pub fn evaluate_white(board: &Board, pawns: &mut PawnHashTable) -> i32 {
    board.evaluate_white_with(board.pawn_structure_cached(pawns))
}

/// Full evaluation from the side to move's point of view.
#[must_use]
pub fn evaluate(board: &Board, pawns: &mut PawnHashTable) -> i32 {
    board.side_to_move().sign() * evaluate_white(board, pawns)
}

/// Same score as [`evaluate`] without reading or writing any cache.
#[must_use]
pub fn evaluate_without_cache(board: &Board) -> i32 {
    board.side_to_move().sign() * board.evaluate_white_with(board.eval_pawn_structure())
}

/// Material, pawn structure and piece-square terms only, side to move's point of view.
#[must_use]
pub fn fast_evaluate(board: &Board, pawns: &mut PawnHashTable) -> i32 {
    let phase = board.phase_ratio();
    let white = board.material_balance()
        + taper(board.pawn_structure_cached(pawns), phase)
        + board.position_balance(phase);
    board.side_to_move().sign() * white
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::tests::tables;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen, tables()).expect("valid FEN")
    }

    #[test]
    fn startpos_is_balanced() {
        let b = Board::startpos(tables());
        assert_eq!(evaluate_without_cache(&b), 0);
    }

    #[test]
    fn cached_matches_uncached() {
        let mut pawns = PawnHashTable::new(16);
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 b - - 0 1",
        ] {
            let b = board(fen);
            let cold = evaluate(&b, &mut pawns);
            let warm = evaluate(&b, &mut pawns);
            assert_eq!(cold, warm);
            assert_eq!(cold, evaluate_without_cache(&b));
        }
        assert_eq!(pawns.hits(), 2);
    }

    #[test]
    fn side_to_move_flips_sign() {
        let white = board("4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        let black = board("4k3/8/8/8/8/8/8/3QK3 b - - 0 1");
        let w = evaluate_without_cache(&white);
        assert!(w > 800);
        assert_eq!(w, -evaluate_without_cache(&black));
    }

    #[test]
    fn mirrored_positions_negate() {
        for fen in [
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            "r2qr1k1/p2n1p2/1pb3pp/2ppN1P1/1R1PpP2/BQP1n1PB/P4N1P/1R4K1 w - - 0 21",
            "7r/8/2k3P1/1p1p2Kp/1P6/2P5/7r/Q7 w - - 0 1",
        ] {
            let mut pawns = PawnHashTable::new(16);
            let b = board(fen);
            let m = b.mirror();
            assert_eq!(evaluate_white(&b, &mut pawns), -evaluate_white(&m, &mut pawns), "{fen}");
            // same situation seen by the mover
            assert_eq!(evaluate_without_cache(&b), evaluate_without_cache(&m), "{fen}");
        }
    }

    #[test]
    fn fast_evaluate_ignores_positional_extras() {
        let mut pawns = PawnHashTable::new(16);
        let b = board("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let fast = fast_evaluate(&b, &mut pawns);
        let full = evaluate(&b, &mut pawns);
        assert!(fast > 0 && full > 0);
    }

    #[test]
    fn taper_blends_linearly() {
        assert_eq!(taper([100, 0], 1.0), 100);
        assert_eq!(taper([100, 0], 0.0), 0);
        assert_eq!(taper([100, 50], 0.5), 75);
        assert_eq!(taper([-100, -50], 0.5), -75);
    }
}

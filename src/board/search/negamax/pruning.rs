use super::SearchContext;
use crate::board::eval::fast_evaluate;
use crate::board::search::constants::MATE_THRESHOLD;

impl SearchContext<'_> {
    /// Try null move pruning: give the opponent a free move and search the
    /// reduced tree with a null window around `beta`.
    ///
    /// Skipped when the mover has too little non-pawn material, where
    /// zugzwang makes passing unsound, and near mate bounds.
    pub(super) fn try_null_move_pruning(&mut self, depth: u32, beta: i32, ply: usize) -> Option<i32> {
        let params = *self.state.params();
        let us = self.board.side_to_move();

        if depth < params.null_min_depth
            || self.board.non_pawn_material(us) < params.null_min_material
            || beta.abs() >= MATE_THRESHOLD
        {
            return None;
        }

        self.stats.leafs += 1;
        if fast_evaluate(self.board, &mut self.state.pawns) < beta {
            return None;
        }

        let reduced_depth = depth.saturating_sub(1 + params.null_reduction);

        self.board.make_null_move();
        let score = -self.alphabeta(reduced_depth, -beta, -beta + 1, ply + 1, false);
        self.board.undo_null_move();

        if self.aborted {
            return None;
        }

        // unproven mates from a pass are not trusted
        if score >= beta {
            return Some(if score >= MATE_THRESHOLD { beta } else { score });
        }

        None
    }
}

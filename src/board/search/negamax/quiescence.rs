use super::SearchContext;
use crate::board::eval::fast_evaluate;
use crate::board::search::constants::{INFINITY, MATE_SCORE};
use crate::board::search::move_order::score_moves;
use crate::board::MAX_PLY;

impl SearchContext<'_> {
    /// Quiescence search for tactical stability with SEE pruning.
    ///
    /// Out of check only loud moves are searched on top of the stand-pat
    /// floor, and captures that lose material by SEE are skipped. In check
    /// every evasion is searched and having none is mate.
    pub(crate) fn quiesce(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.stats.q_nodes += 1;
        if self.poll() {
            return 0;
        }

        let in_check = self.board.is_in_check(self.board.side_to_move());
        if ply >= MAX_PLY - 1 {
            self.stats.leafs += 1;
            return fast_evaluate(self.board, &mut self.state.pawns);
        }

        let mut best_score;
        let moves = if in_check {
            let moves = self.board.generate_moves();
            if moves.is_empty() {
                return -MATE_SCORE + ply as i32;
            }
            best_score = -INFINITY;
            moves
        } else {
            self.stats.leafs += 1;
            let stand_pat = fast_evaluate(self.board, &mut self.state.pawns);
            if stand_pat >= beta {
                return stand_pat;
            }
            alpha = alpha.max(stand_pat);
            best_score = stand_pat;
            self.board.generate_legal_loud_moves()
        };

        let mut ordered = score_moves(self.board, &moves, None, &self.state.killers, ply);

        for i in 0..ordered.len() {
            let Some(mv) = ordered.pick_best(i).map(|scored| scored.mv) else {
                break;
            };
            if !in_check && mv.is_capture() && self.board.see(mv) < 0 {
                continue;
            }

            self.board.make_move(mv);
            let score = -self.quiesce(-beta, -alpha, ply + 1);
            self.board.undo_move(mv);

            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                alpha = alpha.max(score);
            }
            if alpha >= beta {
                break;
            }
        }

        best_score
    }
}

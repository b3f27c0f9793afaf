use std::sync::atomic::AtomicBool;

use log::{debug, info};

use super::SearchContext;
use crate::board::eval::evaluate;
use crate::board::search::constants::{DRAW_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD};
use crate::board::search::move_order::score_moves;
use crate::board::search::{mate_in, SearchConfig, SearchIterationInfo, SearchResult, SearchState};
use crate::board::{Board, Move, MoveList};
use crate::tt::BoundType;

/// Outcome of one finished root search
#[derive(Clone, Copy)]
struct Iteration {
    depth: u32,
    score: i32,
    best_move: Move,
}

impl SearchContext<'_> {
    /// Search every root move at `depth` inside `(alpha, beta)`.
    ///
    /// Returns the best fail-soft score and move. When the budget runs out
    /// part way, the move is the best one among those searched so far.
    fn search_root(
        &mut self,
        root_moves: &MoveList,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        previous_best: Option<Move>,
    ) -> (i32, Option<Move>) {
        let hash = self.board.hash();
        let mut ordered = score_moves(self.board, root_moves, previous_best, &self.state.killers, 0);
        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for i in 0..ordered.len() {
            let Some(mv) = ordered.pick_best(i).map(|scored| scored.mv) else {
                break;
            };

            self.board.make_move(mv);
            let score = -self.alphabeta(depth - 1, -beta, -alpha, 1, true);
            self.board.undo_move(mv);

            if self.aborted {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                alpha = alpha.max(score);
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                break;
            }
        }

        if !self.aborted {
            let bound = if best_score >= beta {
                BoundType::LowerBound
            } else if best_score > original_alpha {
                BoundType::Exact
            } else {
                BoundType::UpperBound
            };
            self.state.tt.store(hash, depth, best_score, bound, best_move, 0);
        }
        (best_score, best_move)
    }

    /// Root search with an aspiration window around `guess`, widened to the
    /// full window on either failure.
    fn search_with_aspiration(
        &mut self,
        root_moves: &MoveList,
        depth: u32,
        guess: Option<i32>,
        previous_best: Option<Move>,
    ) -> (i32, Option<Move>) {
        let window = self.state.params().aspiration_window;
        let (mut alpha, mut beta) = match guess {
            Some(score) if window > 0 && score.abs() < MATE_THRESHOLD => (score - window, score + window),
            _ => (-INFINITY, INFINITY),
        };

        loop {
            let (score, best_move) = self.search_root(root_moves, depth, alpha, beta, previous_best);
            if self.aborted {
                return (score, best_move);
            }
            if score <= alpha && alpha > -INFINITY {
                debug!("depth {depth} failed low at {score}, re-searching");
                alpha = -INFINITY;
            } else if score >= beta && beta < INFINITY {
                debug!("depth {depth} failed high at {score}, re-searching");
                beta = INFINITY;
            } else {
                return (score, best_move);
            }
        }
    }

    /// Whether the next iteration should start at all.
    fn can_start_iteration(&mut self) -> bool {
        self.check_budget();
        if self.aborted {
            return false;
        }
        // the next depth rarely finishes in less time than all previous ones
        !(self.time_limit_ms > 0 && self.elapsed_ms() * 2 >= self.time_limit_ms)
    }

    fn report(&mut self, config: &SearchConfig, iteration: Iteration) {
        let pv = self.extract_pv(iteration.best_move, iteration.depth as usize);
        let elapsed = self.start_time.elapsed();
        let nodes = self.stats.total_nodes();
        let micros = elapsed.as_micros().max(1);
        let info = SearchIterationInfo {
            depth: iteration.depth,
            score: iteration.score,
            mate_in: mate_in(iteration.score),
            nodes,
            nps: (u128::from(nodes) * 1_000_000 / micros) as u64,
            time_ms: elapsed.as_millis() as u64,
            hashfull: self.state.hashfull_per_mille(),
            pv,
        };

        info!(
            "depth {} score {} nodes {} nps {} time {}ms pv {}",
            info.depth,
            info.score,
            info.nodes,
            info.nps,
            info.time_ms,
            format_pv(&info.pv)
        );
        if let Some(cb) = &config.info_callback {
            cb(&info);
        }
    }

    /// Iterative deepening from depth 1 to `config.max_depth`.
    fn iterative_deepening(&mut self, config: &SearchConfig) -> SearchResult {
        let us = self.board.side_to_move();
        let root_moves = self.board.generate_moves();

        if root_moves.is_empty() {
            let score = if self.board.is_in_check(us) { -MATE_SCORE } else { DRAW_SCORE };
            return self.finish(None, score, 0);
        }

        if root_moves.len() == 1 {
            self.stats.leafs += 1;
            let score = evaluate(self.board, &mut self.state.pawns);
            return self.finish(Some(root_moves[0]), score, 0);
        }

        let mut completed: Option<Iteration> = None;
        let mut fallback = root_moves[0];

        for depth in 1..=config.max_depth.max(1) {
            if depth > 1 && !self.can_start_iteration() {
                break;
            }

            let guess = completed.map(|it| it.score);
            let previous_best = completed.map(|it| it.best_move);
            let (score, best_move) = self.search_with_aspiration(&root_moves, depth, guess, previous_best);

            if self.aborted {
                if completed.is_none() {
                    if let Some(mv) = best_move {
                        fallback = mv;
                    }
                }
                debug!("depth {depth} abandoned after {} nodes", self.stats.total_nodes());
                break;
            }

            let Some(best_move) = best_move else {
                break;
            };
            let iteration = Iteration {
                depth,
                score,
                best_move,
            };
            completed = Some(iteration);
            self.stats.depth_reached = depth;
            self.report(config, iteration);

            // a mate within the searched horizon cannot get any shorter
            if score.abs() >= MATE_THRESHOLD && (MATE_SCORE - score.abs()) as u32 <= depth {
                break;
            }
        }

        match completed {
            Some(it) => {
                let pv = self.extract_pv(it.best_move, it.depth as usize);
                let mut result = self.finish(Some(it.best_move), it.score, it.depth);
                result.pv = pv;
                result
            }
            None => {
                self.stats.leafs += 1;
                let score = evaluate(self.board, &mut self.state.pawns);
                self.finish(Some(fallback), score, 0)
            }
        }
    }

    fn finish(&mut self, best_move: Option<Move>, score: i32, depth: u32) -> SearchResult {
        self.stats.elapsed = self.start_time.elapsed();
        SearchResult {
            best_move,
            score,
            depth,
            stats: self.stats,
            pv: best_move.into_iter().collect(),
        }
    }
}

fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(std::string::ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the main search algorithm
pub(crate) fn run(
    board: &mut Board,
    state: &mut SearchState,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    state.new_search();
    let collisions_before = state.tt.collisions();

    let mut ctx = SearchContext::new(board, state, stop);
    ctx.time_limit_ms = config.time_limit_ms;
    ctx.node_limit = config.node_limit;

    let mut result = ctx.iterative_deepening(config);
    result.stats.tt_collisions = state.tt.collisions().saturating_sub(collisions_before);

    debug!(
        "search finished: depth {} nodes {} cutoffs {} tt hits {} branching {:.2}",
        result.depth,
        result.stats.total_nodes(),
        result.stats.beta_cutoffs,
        result.stats.tt_hits,
        result.stats.branching_factor()
    );
    result
}

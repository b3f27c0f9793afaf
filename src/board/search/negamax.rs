//! Core search implementation.
//!
//! This module implements:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta with transposition table cutoffs
//! - Null move pruning
//! - Repetition and fifty-move draw detection
//! - Quiescence search with SEE pruning
//! - Move ordering (hash move, promotions, SEE captures, killers)

mod iterative;
mod pruning;
mod quiescence;

pub(super) use iterative::run;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::tt::BoundType;

use super::constants::{CHECK_INTERVAL, DRAW_SCORE, INFINITY, MATE_SCORE};
use super::move_order::score_moves;
use super::{SearchState, SearchStats};
use crate::board::{Board, Move, MAX_PLY};

/// Search context for a single search
pub(crate) struct SearchContext<'a> {
    pub board: &'a mut Board,
    pub state: &'a mut SearchState,
    pub stop: &'a AtomicBool,
    pub start_time: Instant,
    pub time_limit_ms: u64,
    pub node_limit: u64,
    pub stats: SearchStats,
    /// Set once a budget runs out; every node then unwinds immediately
    pub aborted: bool,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(board: &'a mut Board, state: &'a mut SearchState, stop: &'a AtomicBool) -> Self {
        SearchContext {
            board,
            state,
            stop,
            start_time: Instant::now(),
            time_limit_ms: 0,
            node_limit: 0,
            stats: SearchStats::default(),
            aborted: false,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    fn check_budget(&mut self) {
        if self.stop.load(Ordering::Relaxed)
            || (self.time_limit_ms > 0 && self.elapsed_ms() >= self.time_limit_ms)
            || (self.node_limit > 0 && self.stats.total_nodes() >= self.node_limit)
        {
            self.aborted = true;
        }
    }

    /// Count a visited node, polling the budget at fixed intervals.
    /// Returns true when the search has to unwind.
    #[inline]
    fn poll(&mut self) -> bool {
        if self.stats.total_nodes() % CHECK_INTERVAL == 0 {
            self.check_budget();
        }
        self.aborted
    }

    /// Negamax alpha-beta search returning a fail-soft score for the side to move.
    pub(crate) fn alphabeta(
        &mut self,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
        allow_null: bool,
    ) -> i32 {
        if self.board.is_threefold_repetition() || self.board.is_fifty_move_draw() {
            return DRAW_SCORE;
        }
        if depth == 0 || ply >= MAX_PLY - 1 {
            return self.quiesce(alpha, beta, ply);
        }

        self.stats.nodes += 1;
        if self.poll() {
            return 0;
        }

        let hash = self.board.hash();
        let mut hash_move = None;
        if let Some(entry) = self.state.tt.probe(hash, ply) {
            self.stats.tt_hits += 1;
            hash_move = entry.best_move();
            if entry.depth() >= depth {
                let score = entry.score();
                match entry.bound_type() {
                    BoundType::Exact => return score,
                    BoundType::LowerBound => alpha = alpha.max(score),
                    BoundType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    return score;
                }
            }
        }

        let in_check = self.board.is_in_check(self.board.side_to_move());
        if allow_null && !in_check {
            if let Some(score) = self.try_null_move_pruning(depth, beta, ply) {
                return score;
            }
        }

        let moves = self.board.generate_moves();
        if moves.is_empty() {
            return if in_check { -MATE_SCORE + ply as i32 } else { DRAW_SCORE };
        }

        // a slot shared with another position can hold any bit pattern
        let hash_move = hash_move.filter(|mv| moves.contains(*mv));
        let mut ordered = score_moves(self.board, &moves, hash_move, &self.state.killers, ply);

        let original_alpha = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for i in 0..ordered.len() {
            let Some(mv) = ordered.pick_best(i).map(|scored| scored.mv) else {
                break;
            };

            self.board.make_move(mv);
            let score = -self.alphabeta(depth - 1, -beta, -alpha, ply + 1, true);
            self.board.undo_move(mv);

            if self.aborted {
                return 0;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
                alpha = alpha.max(score);
            }
            if alpha >= beta {
                self.stats.beta_cutoffs += 1;
                if mv.is_quiet() {
                    self.state.killers.update(ply, mv);
                }
                break;
            }
        }

        let bound = if best_score >= beta {
            BoundType::LowerBound
        } else if best_score > original_alpha {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.state.tt.store(hash, depth, best_score, bound, best_move, ply);

        best_score
    }

    /// Follow hash moves from the current position, starting with `first`.
    fn extract_pv(&mut self, first: Move, max_len: usize) -> Vec<Move> {
        let max_len = max_len.min(MAX_PLY);
        let mut pv = Vec::with_capacity(max_len);
        let mut seen = Vec::with_capacity(max_len);
        let mut next = Some(first);

        while let Some(mv) = next {
            if pv.len() >= max_len || seen.contains(&self.board.hash()) || !self.board.is_move_legal(mv) {
                break;
            }
            seen.push(self.board.hash());
            self.board.make_move(mv);
            pv.push(mv);
            next = self
                .state
                .tt
                .probe(self.board.hash(), pv.len())
                .and_then(|entry| entry.best_move());
        }

        for &mv in pv.iter().rev() {
            self.board.undo_move(mv);
        }
        pv
    }
}

//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta with null move pruning
//! - Quiescence search with stand-pat and SEE filtering
//! - Move ordering (hash move, promotions, SEE captures, killers)
//! - Transposition table for move ordering and cutoffs
//!
//! The search is single-threaded. Budgets are polled every
//! [`CHECK_INTERVAL`](constants::CHECK_INTERVAL) nodes and an abandoned
//! iteration never replaces the result of the last completed one.

mod constants;
mod move_order;
mod negamax;
mod params;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crate::pawn_hash::{PawnHashTable, DEFAULT_PAWN_HASH_KB};
use crate::tt::{TranspositionTable, DEFAULT_TT_MB};

use super::{Board, Move};
pub use constants::{DRAW_SCORE, MATE_SCORE, MATE_THRESHOLD};
pub use move_order::KillerTable;
pub use params::SearchParams;

#[cfg(test)]
pub(crate) use constants::INFINITY;
#[cfg(test)]
pub(crate) use negamax::SearchContext;

/// Default iterative deepening limit when none is configured
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// Result of a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// `None` only when the side to move has no legal move
    pub best_move: Option<Move>,
    /// Centipawns from the side to move's point of view
    pub score: i32,
    /// Depth of the last completed iteration
    pub depth: u32,
    pub stats: SearchStats,
    /// Principal variation starting with `best_move`
    pub pv: Vec<Move>,
}

impl SearchResult {
    /// Moves to mate, positive when the side to move mates.
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }
}

pub(crate) fn mate_in(score: i32) -> Option<i32> {
    if score.abs() < MATE_THRESHOLD {
        None
    } else if score > 0 {
        Some((MATE_SCORE - score + 1) / 2)
    } else {
        Some(-(MATE_SCORE + score + 1) / 2)
    }
}

/// Statistics tracked during search
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    /// Interior alpha-beta nodes
    pub nodes: u64,
    /// Quiescence nodes
    pub q_nodes: u64,
    /// Static evaluations
    pub leafs: u64,
    pub beta_cutoffs: u64,
    pub tt_hits: u64,
    pub tt_collisions: u64,
    pub depth_reached: u32,
    pub elapsed: Duration,
}

impl SearchStats {
    #[must_use]
    pub fn total_nodes(&self) -> u64 {
        self.nodes + self.q_nodes
    }

    /// Effective branching factor, the `depth_reached`-th root of all visited nodes.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.depth_reached == 0 {
            return 0.0;
        }
        (self.total_nodes() as f64).powf(1.0 / f64::from(self.depth_reached))
    }

    #[must_use]
    pub fn nodes_per_second(&self) -> u64 {
        let micros = self.elapsed.as_micros();
        if micros == 0 {
            return 0;
        }
        (u128::from(self.total_nodes()) * 1_000_000 / micros) as u64
    }
}

/// Tables that live across searches of one session.
pub struct SearchState {
    pub(crate) tt: TranspositionTable,
    pub(crate) pawns: PawnHashTable,
    pub(crate) killers: KillerTable,
    params: SearchParams,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_mb: usize, pawn_hash_kb: usize) -> Self {
        SearchState {
            tt: TranspositionTable::new(tt_mb),
            pawns: PawnHashTable::new(pawn_hash_kb),
            killers: KillerTable::new(),
            params: SearchParams::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SearchParams) {
        self.params = params;
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    #[must_use]
    pub fn pawns(&self) -> &PawnHashTable {
        &self.pawns
    }

    pub fn pawns_mut(&mut self) -> &mut PawnHashTable {
        &mut self.pawns
    }

    /// Age the transposition table and forget killers before a new search.
    pub fn new_search(&mut self) {
        self.tt.new_search();
        self.killers.reset();
    }

    /// Forget everything learned so far.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.pawns.clear();
        self.killers.reset();
    }

    #[must_use]
    pub fn hashfull_per_mille(&self) -> u32 {
        self.tt.hashfull_per_mille()
    }
}

impl Default for SearchState {
    fn default() -> Self {
        Self::new(DEFAULT_TT_MB, DEFAULT_PAWN_HASH_KB)
    }
}

impl std::fmt::Debug for SearchState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchState")
            .field("tt", &self.tt)
            .field("pawns", &self.pawns)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Configuration for a search operation.
#[derive(Clone)]
pub struct SearchConfig {
    /// Maximum depth to search
    pub max_depth: u32,
    /// Time limit in milliseconds (0 = unlimited)
    pub time_limit_ms: u64,
    /// Node limit (0 = unlimited)
    pub node_limit: u64,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            time_limit_ms: 0,
            node_limit: 0,
            info_callback: None,
        }
    }
}

impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("time_limit_ms", &self.time_limit_ms)
            .field("node_limit", &self.node_limit)
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth,
            ..Default::default()
        }
    }

    /// Create a time-limited search config
    #[must_use]
    pub fn time(time_limit_ms: u64) -> Self {
        SearchConfig {
            time_limit_ms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_time(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    /// Set node limit
    #[must_use]
    pub fn with_nodes(mut self, node_limit: u64) -> Self {
        self.node_limit = node_limit;
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct SearchIterationInfo {
    pub depth: u32,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub nps: u64,
    pub time_ms: u64,
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&SearchIterationInfo) + Send + Sync>;

/// Run an iterative deepening search on `board`.
///
/// The board is restored to its original position on return. `stop` may be
/// raised from another thread to end the search early.
pub fn search(
    board: &mut Board,
    state: &mut SearchState,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> SearchResult {
    negamax::run(board, state, config, stop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mate_distance_in_moves() {
        assert_eq!(mate_in(MATE_SCORE - 1), Some(1));
        assert_eq!(mate_in(MATE_SCORE - 3), Some(2));
        assert_eq!(mate_in(-(MATE_SCORE - 2)), Some(-1));
        assert_eq!(mate_in(150), None);
    }

    #[test]
    fn branching_factor_is_geometric_mean() {
        let stats = SearchStats {
            nodes: 600,
            q_nodes: 400,
            depth_reached: 3,
            ..SearchStats::default()
        };
        assert!((stats.branching_factor() - 10.0).abs() < 1e-9);
        assert_eq!(SearchStats::default().branching_factor(), 0.0);
    }

    #[test]
    fn config_builders() {
        let config = SearchConfig::depth(5).with_time(100).with_nodes(1000);
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.time_limit_ms, 100);
        assert_eq!(config.node_limit, 1000);
        assert_eq!(SearchConfig::time(50).max_depth, DEFAULT_MAX_DEPTH);
    }
}

//! Engine session: the lookup tables, the current position and the search
//! caches behind one handle.
//!
//! A front end (text protocol, tuning harness, benchmark) creates one
//! [`Engine`] with [`Engine::initialize`] and then drives it with positions,
//! searches, static evaluations and perft runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{
    evaluate, evaluate_white, search, Board, EvalParams, FenError, MagicError, MagicSource, MoveParseError,
    SearchConfig, SearchParams, SearchResult, SearchState,
};
use crate::pawn_hash::DEFAULT_PAWN_HASH_KB;
use crate::perft::PerftResult;
use crate::tables::Tables;
use crate::tt::DEFAULT_TT_MB;

/// Errors surfaced by [`Engine`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid position: {0}")]
    Fen(#[from] FenError),
    #[error("invalid move: {0}")]
    Move(#[from] MoveParseError),
    #[error("attack table construction failed: {0}")]
    Magic(#[from] MagicError),
}

/// Session-wide settings, fixed at [`Engine::initialize`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Transposition table size in megabytes
    pub tt_size_mb: usize,
    /// Pawn hash size in kilobytes
    pub pawn_hash_kb: usize,
    pub magic_source: MagicSource,
    pub eval_params: EvalParams,
    pub search_params: SearchParams,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            tt_size_mb: DEFAULT_TT_MB,
            pawn_hash_kb: DEFAULT_PAWN_HASH_KB,
            magic_source: MagicSource::default(),
            eval_params: EvalParams::default(),
            search_params: SearchParams::default(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn with_tt_size_mb(mut self, tt_size_mb: usize) -> Self {
        self.tt_size_mb = tt_size_mb;
        self
    }

    #[must_use]
    pub fn with_pawn_hash_kb(mut self, pawn_hash_kb: usize) -> Self {
        self.pawn_hash_kb = pawn_hash_kb;
        self
    }

    #[must_use]
    pub fn with_magic_source(mut self, magic_source: MagicSource) -> Self {
        self.magic_source = magic_source;
        self
    }

    #[must_use]
    pub fn with_eval_params(mut self, eval_params: EvalParams) -> Self {
        self.eval_params = eval_params;
        self
    }

    #[must_use]
    pub fn with_search_params(mut self, search_params: SearchParams) -> Self {
        self.search_params = search_params;
        self
    }
}

/// A single engine session.
pub struct Engine {
    config: EngineConfig,
    tables: Arc<Tables>,
    board: Board,
    state: SearchState,
    stop: Arc<AtomicBool>,
}

impl Engine {
    /// Build every table and size the caches. The position starts at the
    /// standard initial position.
    ///
    /// # Errors
    /// Returns [`EngineError::Magic`] when the configured magic constants are unusable.
    pub fn initialize(config: EngineConfig) -> Result<Self, EngineError> {
        let start = Instant::now();
        let tables = Arc::new(Tables::new(config.eval_params.clone(), &config.magic_source)?);
        let board = Board::startpos(Arc::clone(&tables));
        let state = SearchState::new(config.tt_size_mb, config.pawn_hash_kb).with_params(config.search_params);
        info!(
            "engine initialized in {:?} (tt {} MB, {} slots; pawn hash {} KB)",
            start.elapsed(),
            config.tt_size_mb,
            state.tt().len(),
            config.pawn_hash_kb
        );

        Ok(Engine {
            config,
            tables,
            board,
            state,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Set up `fen`, or the standard initial position when `None`.
    ///
    /// # Errors
    /// Returns [`EngineError::Fen`] and keeps the previous position when `fen` is malformed.
    pub fn set_position(&mut self, fen: Option<&str>) -> Result<(), EngineError> {
        self.board = match fen {
            Some(fen) => Board::from_fen(fen, Arc::clone(&self.tables))?,
            None => Board::startpos(Arc::clone(&self.tables)),
        };
        debug!("position set to {}", self.board.to_fen());
        Ok(())
    }

    /// Play long-algebraic moves (`e2e4`, `e7e8q`) from the current position.
    ///
    /// # Errors
    /// Returns [`EngineError::Move`] for the first unplayable move; the position
    /// is left as it was before the call.
    pub fn apply_moves(&mut self, moves: &[&str]) -> Result<(), EngineError> {
        let mut board = self.board.clone();
        for text in moves {
            board.make_move_text(text)?;
        }
        self.board = board;
        Ok(())
    }

    /// Search the current position. The position is unchanged on return.
    pub fn find_best_move(&mut self, config: &SearchConfig) -> SearchResult {
        self.stop.store(false, Ordering::Relaxed);
        search(&mut self.board, &mut self.state, config, &self.stop)
    }

    /// Flag that ends a running [`find_best_move`](Self::find_best_move) when raised
    /// from another thread.
    #[must_use]
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Static evaluation from the side to move's point of view.
    pub fn evaluate(&mut self) -> i32 {
        evaluate(&self.board, self.state.pawns_mut())
    }

    /// Static evaluation from White's point of view.
    pub fn evaluate_white(&mut self) -> i32 {
        evaluate_white(&self.board, self.state.pawns_mut())
    }

    pub fn run_perft(&mut self, depth: u32) -> PerftResult {
        let start = Instant::now();
        let result = self.board.perft(depth);
        info!(
            "perft {} of {}: {} leafs in {:?}",
            depth,
            self.board.to_fen(),
            result.leafs,
            start.elapsed()
        );
        result
    }

    /// Forget transposition table and pawn hash contents.
    pub fn clear_hash(&mut self) {
        self.state.clear();
    }

    /// Switch to new evaluation weights, keeping the current position.
    ///
    /// Game history is not carried over, so repetitions are counted afresh.
    ///
    /// # Errors
    /// Returns [`EngineError::Fen`] if the current position cannot be re-read,
    /// which only happens for boards built outside FEN parsing.
    pub fn set_eval_params(&mut self, params: EvalParams) -> Result<(), EngineError> {
        let tables = Arc::new(self.tables.with_params(params.clone()));
        let board = Board::from_fen(&self.board.to_fen(), Arc::clone(&tables))?;
        self.tables = tables;
        self.board = board;
        self.config.eval_params = params;
        // cached scores were computed with the old weights
        self.state.clear();
        Ok(())
    }

    pub fn set_search_params(&mut self, params: SearchParams) {
        self.config.search_params = params;
        self.state.set_params(params);
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn tables(&self) -> &Arc<Tables> {
        &self.tables
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn search_state(&self) -> &SearchState {
        &self.state
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("position", &self.board.to_fen())
            .field("config", &self.config)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{REPETITION_WINDOW, STARTPOS_FEN};

    fn engine() -> Engine {
        Engine::initialize(EngineConfig::default().with_tt_size_mb(1).with_pawn_hash_kb(64)).expect("engine")
    }

    #[test]
    fn starts_from_initial_position() {
        let mut engine = engine();
        assert_eq!(engine.board().to_fen(), STARTPOS_FEN);
        assert_eq!(engine.evaluate(), 0);
        assert_eq!(engine.run_perft(3).leafs, 8902);
    }

    #[test]
    fn bad_input_keeps_the_position() {
        let mut engine = engine();
        engine.apply_moves(&["e2e4"]).expect("legal");
        let before = engine.board().to_fen();

        let err = engine.set_position(Some("not a fen")).unwrap_err();
        assert!(matches!(err, EngineError::Fen(_)));
        assert_eq!(engine.board().to_fen(), before);

        let err = engine.apply_moves(&["e7e5", "e1e3"]).unwrap_err();
        assert!(matches!(err, EngineError::Move(MoveParseError::IllegalMove { .. })));
        assert_eq!(engine.board().to_fen(), before);
    }

    #[test]
    fn supplied_magics_must_fit_the_board() {
        let config = EngineConfig::default().with_magic_source(MagicSource::Supplied {
            rook: vec![1; 3],
            bishop: vec![1; 64],
        });
        let err = Engine::initialize(config).unwrap_err();
        assert!(matches!(err, EngineError::Magic(MagicError::WrongLength { .. })));
    }

    #[test]
    fn eval_params_change_the_score_not_the_position() {
        let mut engine = engine();
        engine.set_position(Some("4k3/8/8/8/8/8/8/3QK3 w - - 0 1")).expect("fen");
        let before = engine.evaluate_white();

        let mut params = EvalParams::default();
        params.material[4] += 100;
        engine.set_eval_params(params.clone()).expect("same position");

        assert_eq!(engine.board().to_fen(), "4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
        assert_eq!(engine.config().eval_params, params);
        assert!(engine.evaluate_white() > before);
    }

    #[test]
    fn replays_games_longer_than_the_undo_stack() {
        let shuffle = ["g1f3", "g8f6", "f3g1", "f6g8"];
        let game: Vec<&str> = shuffle.iter().cycle().take(1200).copied().collect();
        let mut engine = engine();
        engine.apply_moves(&game).expect("legal game");
        assert_eq!(engine.board().to_fen().split(' ').next(), STARTPOS_FEN.split(' ').next());

        let result = engine.find_best_move(&SearchConfig::depth(6));
        assert!(result.best_move.is_some());
        assert!(engine.board().history_len() <= REPETITION_WINDOW);

        let more: Vec<&str> = shuffle.iter().cycle().take(40).copied().collect();
        engine.apply_moves(&more).expect("legal continuation");
        assert!(engine.board().is_threefold_repetition());
    }

    #[test]
    fn search_leaves_position_untouched() {
        let mut engine = engine();
        engine.apply_moves(&["e2e4", "e7e5"]).expect("legal");
        let before = engine.board().to_fen();
        let result = engine.find_best_move(&SearchConfig::depth(3));
        assert!(result.best_move.is_some());
        assert_eq!(engine.board().to_fen(), before);

        engine.clear_hash();
        assert_eq!(engine.search_state().hashfull_per_mille(), 0);
    }
}

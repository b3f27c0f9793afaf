//! Chess board representation and game logic.
//!
//! Uses bitboards for move generation and position evaluation, with an
//! incremental make/undo protocol backed by a bounded undo stack.
//! Supports full chess rules including castling, en passant, and promotions.
//!
//! # Example
//! ```
//! use chess_core::board::Board;
//! use chess_core::Tables;
//!
//! let tables = Tables::shared_default().expect("tables");
//! let mut board = Board::startpos(tables);
//! let moves = board.generate_moves();
//! assert_eq!(moves.len(), 20);
//! ```

mod attack_tables;
mod error;
pub(crate) mod eval;
mod fen;
mod make_unmake;
mod movegen;
pub(crate) mod search;
mod see;
mod state;
mod types;

#[cfg(test)]
pub(crate) mod tests;

// Public API - types users need
pub use attack_tables::{AttackTables, MagicSource, DEFAULT_MAGIC_SEED};
pub use error::{FenError, MagicError, MoveParseError, SquareError};
pub use fen::STARTPOS_FEN;
pub use see::SeeTable;
pub use state::{Board, MAX_HISTORY, REPETITION_WINDOW};
pub use types::{
    Bitboard, BitboardIter, CastlingRights, Color, Move, MoveKind, MoveList, MoveListIntoIter, Piece, Square, MAX_PLY,
};

// Public API - evaluation
pub use eval::{
    evaluate, evaluate_white, evaluate_without_cache, fast_evaluate, taper, texel_error, EvalParams,
    GameResult, LabeledPosition, ENDING, OPENING,
};

// Public API - search functions and configuration
pub use search::{
    search, KillerTable, SearchConfig, SearchInfoCallback,
    SearchIterationInfo, SearchParams, SearchResult, SearchState, SearchStats, DEFAULT_MAX_DEPTH, DRAW_SCORE,
    MATE_SCORE, MATE_THRESHOLD,
};

pub(crate) use types::{ScoredMoveList, EMPTY_MOVE, PROMOTION_PIECES};

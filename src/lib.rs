//! Chess engine core: magic bitboard move generation, reversible make/undo,
//! tapered evaluation and an iterative deepening alpha-beta search.
//!
//! ```no_run
//! use chess_core::{Engine, EngineConfig, SearchConfig};
//!
//! let mut engine = Engine::initialize(EngineConfig::default())?;
//! engine.set_position(None)?;
//! engine.apply_moves(&["e2e4", "e7e5"])?;
//! let result = engine.find_best_move(&SearchConfig::depth(6));
//! println!("best {:?} score {}", result.best_move.map(|m| m.to_string()), result.score);
//! # Ok::<(), chess_core::EngineError>(())
//! ```

pub mod board;
pub mod engine;
pub mod pawn_hash;
pub mod perft;
pub mod tables;
pub mod tt;
pub mod zobrist;

pub use board::{
    Bitboard, Board, CastlingRights, Color, EvalParams, FenError, MagicError, MagicSource, Move, MoveKind, MoveList,
    MoveParseError, Piece, SearchConfig, SearchParams, SearchResult, SearchStats, Square, MATE_SCORE,
    STARTPOS_FEN,
};
pub use engine::{Engine, EngineConfig, EngineError};
pub use pawn_hash::PawnHashTable;
pub use perft::{PerftResult, VerificationResult};
pub use tables::Tables;
pub use tt::{BoundType, TranspositionTable};
pub use zobrist::ZobristKeys;
